use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::body::{BodyFraming, NUL};
use crate::command::Command;
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::header::{leading_blank_lines, parse_header, FrameHeader};

/// A decoded STOMP frame.
///
/// The variant follows from the command: commands that carry a body always
/// decode to [`Frame::Content`], all others to [`Frame::Control`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A frame without a body.
    Control(FrameHeader),
    /// A frame with a body, which may be present but empty.
    Content { header: FrameHeader, body: Bytes },
}

impl Frame {
    /// Create a frame, classifying it by the header's command.
    ///
    /// The body is discarded when the command never carries one.
    pub fn new(header: FrameHeader, body: impl Into<Bytes>) -> Self {
        if header.command().has_body() {
            Frame::Content {
                header,
                body: body.into(),
            }
        } else {
            Frame::Control(header)
        }
    }

    pub fn header(&self) -> &FrameHeader {
        match self {
            Frame::Control(header) | Frame::Content { header, .. } => header,
        }
    }

    pub fn command(&self) -> Command {
        self.header().command()
    }

    /// The body of a content frame; `None` for control frames.
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Frame::Control(_) => None,
            Frame::Content { body, .. } => Some(body),
        }
    }

    pub fn is_content(&self) -> bool {
        matches!(self, Frame::Content { .. })
    }

    /// The number of bytes [`encode_frame`] writes for this frame.
    pub fn wire_size(&self) -> usize {
        let header = self.header();
        let lines: usize = header
            .headers()
            .iter()
            .map(|(name, value)| name.len() + value.len() + 2)
            .sum();
        let body = self.body().map_or(0, Bytes::len);
        header.command().as_str().len() + 1 + lines + 1 + body + 1
    }
}

impl From<FrameHeader> for Frame {
    fn from(header: FrameHeader) -> Self {
        Frame::new(header, Bytes::new())
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// COMMAND\n
/// name:value\n      (zero or more, verbatim, in order)
/// \n
/// body              (content frames only)
/// \0
/// ```
///
/// Headers are written as given. A body containing NUL bytes only survives
/// decoding if the header declares a matching `content-length`.
pub fn encode_frame(frame: &Frame, dst: &mut BytesMut) {
    let header = frame.header();
    dst.reserve(frame.wire_size());
    dst.put_slice(header.command().as_str().as_bytes());
    dst.put_u8(b'\n');
    for (name, value) in header.headers() {
        dst.put_slice(name.as_bytes());
        dst.put_u8(b':');
        dst.put_slice(value.as_bytes());
        dst.put_u8(b'\n');
    }
    dst.put_u8(b'\n');
    if let Some(body) = frame.body() {
        dst.put_slice(body);
    }
    dst.put_u8(NUL);
}

/// Decode a frame from a buffer.
///
/// Blank lines ahead of a frame (heart-beats, or the EOL peers send after a
/// frame's NUL) are dropped from the buffer first, so a stream that ends on
/// them drains completely.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet; the
/// frame bytes are left exactly as they were and the whole attempt is
/// repeated on the next call. On success, consumes the frame bytes from the
/// buffer. Bytes after the frame are left in place.
///
/// Errors are fatal for the stream: no resynchronization is attempted.
pub fn decode_frame(src: &mut BytesMut) -> Result<Option<Frame>> {
    let blank = leading_blank_lines(src);
    if blank > 0 {
        tracing::trace!(blank, "skipped blank lines");
        src.advance(blank);
    }

    let mut cursor = ByteCursor::new(&src[..]);

    let Some(header) = parse_header(&mut cursor)? else {
        return Ok(None); // Need more data
    };

    let framing = BodyFraming::for_content_length(header.content_length()?);
    let Some(body) = framing.read(&mut cursor) else {
        return Ok(None); // Need more data
    };

    let consumed = cursor.position();
    let wire = src.split_to(consumed).freeze();
    let frame = Frame::new(header, wire.slice(body));

    tracing::trace!(
        command = %frame.command(),
        headers = frame.header().headers().len(),
        body = frame.body().map(Bytes::len),
        consumed,
        "decoded frame"
    );

    Ok(Some(frame))
}

/// Configuration for blocking frame readers and writers.
///
/// Timeouts are applied to TCP streams only; the decoder itself never times
/// out.
#[derive(Debug, Clone, Default)]
pub struct FrameConfig {
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}
