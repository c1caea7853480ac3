//! Read-only cursor over the bytes received so far.
//!
//! A decode attempt reads through a `ByteCursor` instead of the caller's
//! buffer. The cursor position is local to the attempt, so abandoning an
//! attempt leaves the caller's buffer untouched.

/// Borrowed view over unconsumed input with a private read position.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes read so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes still readable.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Number of readable bytes before the next `marker`, or `None` if the
    /// marker is not present in the available bytes.
    pub fn bytes_before(&self, marker: u8) -> Option<usize> {
        self.buf[self.pos..].iter().position(|&b| b == marker)
    }

    /// Read exactly `len` bytes, or `None` if fewer are available.
    pub fn read(&mut self, len: usize) -> Option<&'a [u8]> {
        if self.remaining() < len {
            return None;
        }
        let start = self.pos;
        self.pos += len;
        Some(&self.buf[start..self.pos])
    }

    /// Read a single byte, or `None` if the cursor is exhausted.
    pub fn read_byte(&mut self) -> Option<u8> {
        let byte = *self.buf.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }
}
