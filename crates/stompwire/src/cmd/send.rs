use std::fs;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use bytes::Bytes;
use stompwire_frame::{Command, Frame, FrameConfig, FrameHeader, FrameWriter, CONTENT_LENGTH, NUL};

use crate::cmd::{parse_duration, SendArgs};
use crate::exit::{frame_error, io_error, CliError, CliResult, SUCCESS, USAGE};

pub fn run(args: SendArgs) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let frame = build_frame(&args)?;

    let stream = connect(&args.addr, timeout)?;
    let config = FrameConfig {
        write_timeout: Some(timeout),
        ..FrameConfig::default()
    };
    let mut writer = FrameWriter::with_config_tcp(stream, config)
        .map_err(|err| frame_error("configure connection failed", err))?;
    writer
        .write_frame(&frame)
        .map_err(|err| frame_error("send failed", err))?;

    tracing::info!(command = %frame.command(), addr = %args.addr, "frame sent");
    Ok(SUCCESS)
}

fn build_frame(args: &SendArgs) -> CliResult<Frame> {
    let command: Command = args
        .command
        .parse()
        .map_err(|err| CliError::new(USAGE, format!("invalid command: {err}")))?;

    let mut header = FrameHeader::new(command);
    for raw in &args.headers {
        let (name, value) = split_header_arg(raw)?;
        header.push(name, value);
    }

    let body = resolve_body(args)?;
    if !command.has_body() && !body.is_empty() {
        return Err(CliError::new(USAGE, format!("{command} frames carry no body")));
    }
    // A marker-delimited body ends at its first NUL.
    let needs_length = body.contains(&NUL) && header.get(CONTENT_LENGTH).is_none();
    if needs_length && !args.content_length {
        tracing::debug!(body = body.len(), "body contains NUL, adding content-length");
    }
    if args.content_length || needs_length {
        header = header.with_content_length(body.len());
    }

    Ok(Frame::new(header, body))
}

fn split_header_arg(raw: &str) -> CliResult<(&str, &str)> {
    if raw.contains('\n') {
        return Err(CliError::new(
            USAGE,
            format!("header must not contain a line feed, got {raw:?}"),
        ));
    }
    match raw.split_once(':') {
        Some((name, value)) if !name.is_empty() => Ok((name, value)),
        _ => Err(CliError::new(
            USAGE,
            format!("header must be NAME:VALUE, got {raw:?}"),
        )),
    }
}

fn resolve_body(args: &SendArgs) -> CliResult<Bytes> {
    if let Some(body) = &args.body {
        return Ok(Bytes::copy_from_slice(body.as_bytes()));
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map(Bytes::from)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Ok(Bytes::new())
}

fn connect(addr: &str, timeout: Duration) -> CliResult<TcpStream> {
    let addrs: Vec<SocketAddr> = addr
        .to_socket_addrs()
        .map_err(|err| io_error(&format!("resolve {addr} failed"), err))?
        .collect();

    let mut last_err = None;
    for candidate in addrs {
        match TcpStream::connect_timeout(&candidate, timeout) {
            Ok(stream) => return Ok(stream),
            Err(err) => last_err = Some(err),
        }
    }

    Err(match last_err {
        Some(err) => io_error(&format!("connect {addr} failed"), err),
        None => CliError::new(USAGE, format!("{addr} did not resolve to any address")),
    })
}
