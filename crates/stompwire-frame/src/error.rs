/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The command line does not name a known STOMP command.
    #[error("unrecognized command: {0:?}")]
    UnrecognizedCommand(String),

    /// The `content-length` header is not an integer, or does not fit in memory.
    #[error("invalid content-length: {0:?}")]
    InvalidContentLength(String),

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
