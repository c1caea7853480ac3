use std::fs::File;
use std::io::{self, Read};

use stompwire_frame::{FrameError, FrameReader};

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let (source, input): (String, Box<dyn Read>) = match &args.file {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
            (path.display().to_string(), Box::new(file))
        }
        _ => ("stdin".to_string(), Box::new(io::stdin().lock())),
    };

    let input = match args.chunk_size {
        Some(0) => return Err(CliError::new(USAGE, "--chunk-size must be greater than zero")),
        Some(size) => ChunkedRead::new(input, size),
        None => ChunkedRead::new(input, usize::MAX),
    };

    let decoded = decode_all(FrameReader::new(input), |frame| {
        print_frame(frame, &source, format);
    })?;
    tracing::info!(frames = decoded, source = %source, "decode finished");
    Ok(SUCCESS)
}

/// Print every frame in the stream; returns the number of frames decoded.
fn decode_all<R: Read>(
    reader: FrameReader<R>,
    mut on_frame: impl FnMut(&stompwire_frame::Frame),
) -> CliResult<usize> {
    let mut decoded = 0usize;
    for frame in reader {
        match frame {
            Ok(frame) => {
                on_frame(&frame);
                decoded += 1;
            }
            Err(FrameError::ConnectionClosed) => {
                return Err(CliError::new(
                    DATA_INVALID,
                    format!("input ends inside a frame after {decoded} complete frame(s)"),
                ));
            }
            Err(err) => return Err(frame_error("decode failed", err)),
        }
    }
    Ok(decoded)
}

/// Caps every read at `chunk` bytes to replay a fragmented transport.
struct ChunkedRead<R> {
    inner: R,
    chunk: usize,
}

impl<R> ChunkedRead<R> {
    fn new(inner: R, chunk: usize) -> Self {
        Self { inner, chunk }
    }
}

impl<R: Read> Read for ChunkedRead<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(self.chunk);
        self.inner.read(&mut buf[..len])
    }
}
