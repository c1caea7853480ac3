//! Tokio codec adapter (requires the `async` feature).

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode_frame, encode_frame, Frame};
use crate::error::FrameError;

/// STOMP codec for `tokio_util::codec::{FramedRead, FramedWrite, Framed}`.
///
/// Holds no state between calls: an incomplete frame is decoded again from
/// the start once more bytes are buffered.
#[derive(Debug, Clone, Copy, Default)]
pub struct StompCodec;

impl Decoder for StompCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        decode_frame(src)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        match decode_frame(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => Err(FrameError::ConnectionClosed),
        }
    }
}

impl Encoder<Frame> for StompCodec {
    type Error = FrameError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), FrameError> {
        encode_frame(&frame, dst);
        Ok(())
    }
}

impl Encoder<&Frame> for StompCodec {
    type Error = FrameError;

    fn encode(&mut self, frame: &Frame, dst: &mut BytesMut) -> Result<(), FrameError> {
        encode_frame(frame, dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use futures_util::{SinkExt, StreamExt};
    use tokio_util::codec::{FramedRead, FramedWrite};

    use super::*;
    use crate::command::Command;
    use crate::header::FrameHeader;

    #[tokio::test]
    async fn framed_read_yields_frames() {
        let wire: &[u8] = b"CONNECTED\nversion:1.2\n\n\0MESSAGE\ncontent-length:3\n\na\0b\0";
        let mut framed = FramedRead::new(wire, StompCodec);

        let first = framed.next().await.unwrap().unwrap();
        assert_eq!(first.command(), Command::Connected);
        assert_eq!(first.header().get("version"), Some("1.2"));

        let second = framed.next().await.unwrap().unwrap();
        assert_eq!(second.body().unwrap().as_ref(), b"a\0b");

        assert!(framed.next().await.is_none());
    }

    #[tokio::test]
    async fn framed_read_ends_cleanly_after_trailing_eol() {
        let wire: &[u8] = b"\nCONNECTED\nversion:1.2\n\n\0\n\n";
        let mut framed = FramedRead::new(wire, StompCodec);

        let frame = framed.next().await.unwrap().unwrap();
        assert_eq!(frame.command(), Command::Connected);
        assert!(framed.next().await.is_none());
    }

    #[tokio::test]
    async fn framed_read_reports_truncated_stream() {
        let wire: &[u8] = b"SEND\n\nunterminated";
        let mut framed = FramedRead::new(wire, StompCodec);
        let err = framed.next().await.unwrap().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[tokio::test]
    async fn framed_write_then_read() {
        let frame = Frame::new(
            FrameHeader::new(Command::Send)
                .with("destination", "/queue/x")
                .with_content_length(4),
            Bytes::from_static(b"\0\0\0\0"),
        );

        let mut sink = FramedWrite::new(Vec::new(), StompCodec);
        sink.send(&frame).await.unwrap();
        let wire = sink.into_inner();

        let mut framed = FramedRead::new(wire.as_slice(), StompCodec);
        assert_eq!(framed.next().await.unwrap().unwrap(), frame);
    }
}
