use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use stompwire_frame::Frame;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    command: &'a str,
    kind: &'static str,
    headers: Vec<[&'a str; 2]>,
    body_size: Option<usize>,
    body: Option<String>,
    source: &'a str,
    timestamp: String,
}

impl<'a> FrameOutput<'a> {
    fn new(frame: &'a Frame, source: &'a str) -> Self {
        Self {
            command: frame.command().as_str(),
            kind: frame_kind(frame),
            headers: frame
                .header()
                .headers()
                .iter()
                .map(|(name, value)| [name.as_str(), value.as_str()])
                .collect(),
            body_size: frame.body().map(|body| body.len()),
            body: frame.body().map(|body| body_preview(body)),
            source,
            timestamp: now_unix_seconds(),
        }
    }
}

pub fn print_frame(frame: &Frame, source: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", render_json(frame, source));
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COMMAND", "HEADERS", "BODY", "SOURCE"])
                .add_row(vec![
                    frame.command().to_string(),
                    header_lines(frame),
                    frame
                        .body()
                        .map_or_else(|| "-".to_string(), |body| body_preview(body)),
                    source.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{} ({}) headers={} body={} source={}",
                frame.command(),
                frame_kind(frame),
                frame.header().headers().len(),
                frame
                    .body()
                    .map_or_else(|| "none".to_string(), |body| body_preview(body)),
                source
            );
            for (name, value) in frame.header().headers() {
                println!("  {name}:{value}");
            }
        }
        OutputFormat::Raw => {
            if let Some(body) = frame.body() {
                print_raw(body);
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn render_json(frame: &Frame, source: &str) -> String {
    serde_json::to_string(&FrameOutput::new(frame, source)).unwrap_or_else(|_| "{}".to_string())
}

fn frame_kind(frame: &Frame) -> &'static str {
    if frame.is_content() {
        "content"
    } else {
        "control"
    }
}

fn header_lines(frame: &Frame) -> String {
    frame
        .header()
        .headers()
        .iter()
        .map(|(name, value)| format!("{name}:{value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn body_preview(body: &[u8]) -> String {
    match std::str::from_utf8(body) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", body.len()),
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
