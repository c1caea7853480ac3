//! Body framing strategies.
//!
//! Both readers return the body as a byte range into the input the cursor
//! views, so the caller can split the body off its buffer without copying.
//! On success the cursor sits just past the frame terminator.

use std::ops::Range;

use crate::cursor::ByteCursor;

/// Frame terminator byte.
pub const NUL: u8 = 0x00;

/// How the body of a frame is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFraming {
    /// Exactly this many body bytes, followed by one terminator byte.
    Length(usize),
    /// Every byte up to the next [`NUL`].
    Marker,
}

impl BodyFraming {
    /// Select the strategy for an optional declared content length.
    pub fn for_content_length(len: Option<usize>) -> Self {
        match len {
            Some(len) if len > 0 => BodyFraming::Length(len),
            _ => BodyFraming::Marker,
        }
    }

    /// Read a body using this strategy.
    ///
    /// Returns `None`, leaving the cursor where it was, when the available
    /// bytes do not yet contain the whole body and its terminator.
    pub fn read(self, cursor: &mut ByteCursor<'_>) -> Option<Range<usize>> {
        match self {
            BodyFraming::Length(len) => read_length_delimited(cursor, len),
            BodyFraming::Marker => read_marker_delimited(cursor),
        }
    }
}

/// Read `len` body bytes plus a terminator byte whose value is not checked.
///
/// [`FrameHeader::content_length`](crate::FrameHeader::content_length) never
/// yields a `len` for which `len + 1` overflows.
pub fn read_length_delimited(cursor: &mut ByteCursor<'_>, len: usize) -> Option<Range<usize>> {
    let needed = len.saturating_add(1);
    if cursor.remaining() < needed {
        tracing::trace!(
            needed,
            remaining = cursor.remaining(),
            "length-delimited body incomplete"
        );
        return None;
    }

    let start = cursor.position();
    cursor.read(len)?;
    let body = start..cursor.position();
    cursor.read_byte()?;
    Some(body)
}

/// Read every byte up to the next [`NUL`], then consume the [`NUL`].
///
/// A terminator at the current position yields an empty range, which is a
/// present but empty body.
pub fn read_marker_delimited(cursor: &mut ByteCursor<'_>) -> Option<Range<usize>> {
    let Some(len) = cursor.bytes_before(NUL) else {
        tracing::trace!(remaining = cursor.remaining(), "body terminator not found");
        return None;
    };

    let start = cursor.position();
    cursor.read(len)?;
    let body = start..cursor.position();
    cursor.read_byte()?;
    Some(body)
}
