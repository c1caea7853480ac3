use std::io::ErrorKind;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use stompwire_frame::{FrameConfig, FrameError, FrameReader};

use crate::cmd::{parse_duration, ListenArgs};
use crate::exit::{frame_error, io_error, CliError, CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let config = FrameConfig {
        read_timeout: args.idle_timeout.as_deref().map(parse_duration).transpose()?,
        ..FrameConfig::default()
    };

    let listener = TcpListener::bind(&args.addr)
        .map_err(|err| io_error(&format!("bind {} failed", args.addr), err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| io_error("configure listener failed", err))?;
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "listening");
    }

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;

    while let Some((stream, peer)) = accept(&listener, &running)? {
        let peer = peer.to_string();
        tracing::info!(%peer, "connection accepted");

        let mut reader = FrameReader::with_config_tcp(stream, config.clone())
            .map_err(|err| frame_error("configure connection failed", err))?;

        while running.load(Ordering::SeqCst) {
            let frame = match reader.read_frame() {
                Ok(frame) => frame,
                Err(err) => {
                    close_connection(&peer, reader.get_ref(), err);
                    break;
                }
            };

            print_frame(&frame, &peer, format);
            printed = printed.saturating_add(1);

            if let Some(count) = args.count {
                if printed >= count {
                    return Ok(SUCCESS);
                }
            }
        }
    }

    tracing::info!("interrupted, stopping listener");
    Ok(SUCCESS)
}

/// Wait for the next connection, polling so a Ctrl-C stops an idle listener.
///
/// Returns `None` once the stop flag is cleared. Accepted streams are put
/// back into blocking mode.
fn accept(
    listener: &TcpListener,
    running: &AtomicBool,
) -> CliResult<Option<(TcpStream, SocketAddr)>> {
    while running.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, peer)) => {
                stream
                    .set_nonblocking(false)
                    .map_err(|err| io_error("configure connection failed", err))?;
                return Ok(Some((stream, peer)));
            }
            Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                thread::sleep(ACCEPT_POLL_INTERVAL);
            }
            Err(err) => return Err(io_error("accept failed", err)),
        }
    }
    Ok(None)
}

/// Log why a connection ended. Decode errors are fatal for the connection
/// only; the listener keeps accepting.
fn close_connection(peer: &str, stream: &TcpStream, err: FrameError) {
    match err {
        FrameError::ConnectionClosed => tracing::info!(%peer, "connection closed"),
        FrameError::Io(ref io)
            if matches!(io.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
        {
            tracing::warn!(%peer, "connection idle, closing");
        }
        other => tracing::warn!(%peer, error = %other, "dropping connection"),
    }
    let _ = stream.shutdown(Shutdown::Both);
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn accept_returns_none_once_stopped() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let running = Arc::new(AtomicBool::new(true));

        let stopper = {
            let running = running.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(100));
                running.store(false, Ordering::SeqCst);
            })
        };

        assert!(accept(&listener, &running).unwrap().is_none());
        stopper.join().unwrap();
    }

    #[test]
    fn accepted_stream_is_blocking() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();
        let running = AtomicBool::new(true);

        let mut client = TcpStream::connect(addr).unwrap();
        let (stream, _) = accept(&listener, &running).unwrap().unwrap();
        client.write_all(b"CONNECT\n\n\0").unwrap();

        let mut reader = FrameReader::new(stream);
        assert_eq!(
            reader.read_frame().unwrap().command(),
            stompwire_frame::Command::Connect
        );
    }
}
