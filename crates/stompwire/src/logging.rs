use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive that overrides `--log-level`,
/// e.g. `STOMPWIRE_LOG=stompwire_frame=trace`.
pub const LOG_ENV: &str = "STOMPWIRE_LOG";

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

fn build_filter(level: LogLevel, env_directive: Option<&str>) -> EnvFilter {
    let fallback = || EnvFilter::default().add_directive(LevelFilter::from(level).into());
    match env_directive {
        Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|_| fallback()),
        None => fallback(),
    }
}

/// Install the stderr subscriber. Decoded frames go to stdout, so the two
/// streams never interleave.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let env_directive = std::env::var(LOG_ENV).ok();
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(build_filter(level, env_directive.as_deref()))
        .with_ansi(false)
        .with_target(env_directive.is_some());

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}
