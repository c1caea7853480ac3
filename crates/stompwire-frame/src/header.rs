//! Frame header model and the header-block parser.

use crate::command::Command;
use crate::cursor::ByteCursor;
use crate::error::{FrameError, Result};

/// Reserved header carrying the body length in bytes.
pub const CONTENT_LENGTH: &str = "content-length";

const LINE_FEED: u8 = b'\n';

/// A frame command plus its header pairs in arrival order.
///
/// Duplicate names are kept; nothing is overwritten or deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    command: Command,
    headers: Vec<(String, String)>,
}

impl FrameHeader {
    /// Create a header with no pairs.
    pub fn new(command: Command) -> Self {
        Self {
            command,
            headers: Vec::new(),
        }
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// Append a `content-length` pair declaring `len` body bytes.
    pub fn with_content_length(self, len: usize) -> Self {
        self.with(CONTENT_LENGTH, len.to_string())
    }

    pub fn command(&self) -> Command {
        self.command
    }

    /// All pairs in arrival order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Append a pair.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Value of the first pair named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Values of every pair named `name`, in arrival order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Declared body length, taken from the first `content-length` pair.
    ///
    /// Returns `Ok(None)` when the header is absent or the value is zero or
    /// negative; both select marker-delimited body framing. A value that is
    /// not a decimal integer, or too large to frame (`len + 1` must fit in a
    /// `usize`), is an error.
    pub fn content_length(&self) -> Result<Option<usize>> {
        let Some(raw) = self.get(CONTENT_LENGTH) else {
            return Ok(None);
        };
        let invalid = || FrameError::InvalidContentLength(raw.to_string());
        let len: i128 = raw.parse().map_err(|_| invalid())?;
        if len <= 0 {
            return Ok(None);
        }
        match usize::try_from(len) {
            Ok(len) if len.checked_add(1).is_some() => Ok(Some(len)),
            _ => Err(invalid()),
        }
    }
}

/// Number of blank lines at the start of `buf`.
///
/// They belong to no frame and can be dropped without waiting for more data.
pub fn leading_blank_lines(buf: &[u8]) -> usize {
    buf.iter().take_while(|&&b| b == LINE_FEED).count()
}

/// Parse a header block from the cursor.
///
/// Returns `Ok(None)` when the available bytes end before the blank line that
/// closes the block. The caller discards the cursor in that case and retries
/// from the same starting point once more bytes arrive.
pub fn parse_header(cursor: &mut ByteCursor<'_>) -> Result<Option<FrameHeader>> {
    let mut header: Option<FrameHeader> = None;

    loop {
        let Some(line_len) = cursor.bytes_before(LINE_FEED) else {
            tracing::trace!(remaining = cursor.remaining(), "header line incomplete");
            return Ok(None);
        };
        let line = cursor.read(line_len).unwrap_or_default();
        cursor.read_byte();

        let Some(current) = header.as_mut() else {
            // Blank lines ahead of the command line are skipped.
            if !line.is_empty() {
                let command = parse_command_line(line)?;
                tracing::trace!(%command, "command line");
                header = Some(FrameHeader::new(command));
            }
            continue;
        };

        if line.is_empty() {
            return Ok(header);
        }
        parse_header_line(current, line);
    }
}

fn parse_command_line(line: &[u8]) -> Result<Command> {
    match std::str::from_utf8(line) {
        Ok(text) => text.parse(),
        Err(_) => Err(FrameError::UnrecognizedCommand(
            String::from_utf8_lossy(line).into_owned(),
        )),
    }
}

fn parse_header_line(header: &mut FrameHeader, line: &[u8]) {
    let line = String::from_utf8_lossy(line);
    match line.find(':') {
        Some(colon) if colon > 0 => {
            header.push(&line[..colon], &line[colon + 1..]);
        }
        _ => {
            tracing::debug!(line = %line, "dropping malformed header line");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &[u8]) -> (Result<Option<FrameHeader>>, usize) {
        let mut cursor = ByteCursor::new(input);
        let result = parse_header(&mut cursor);
        (result, cursor.position())
    }

    #[test]
    fn parses_command_and_ordered_pairs() {
        let (result, consumed) = parse(b"SEND\ndestination:/queue/a\nreceipt:1\n\nbody");
        let header = result.unwrap().unwrap();

        assert_eq!(header.command(), Command::Send);
        assert_eq!(
            header.headers(),
            &[
                ("destination".to_string(), "/queue/a".to_string()),
                ("receipt".to_string(), "1".to_string()),
            ]
        );
        assert_eq!(consumed, b"SEND\ndestination:/queue/a\nreceipt:1\n\n".len());
    }

    #[test]
    fn empty_input_needs_more_data() {
        let (result, _) = parse(b"");
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn unterminated_block_needs_more_data() {
        for input in [
            &b"SEND"[..],
            &b"SEND\n"[..],
            &b"SEND\nfoo:bar"[..],
            &b"SEND\nfoo:bar\n"[..],
        ] {
            let (result, _) = parse(input);
            assert!(result.unwrap().is_none(), "input {input:?}");
        }
    }

    #[test]
    fn leading_blank_lines_are_skipped() {
        let (result, _) = parse(b"\n\n\nCONNECT\n\n");
        assert_eq!(result.unwrap().unwrap().command(), Command::Connect);
    }

    #[test]
    fn unknown_command_is_fatal() {
        let (result, _) = parse(b"BOGUS\n\n");
        assert!(matches!(result, Err(FrameError::UnrecognizedCommand(ref c)) if c == "BOGUS"));
    }

    #[test]
    fn non_utf8_command_is_fatal() {
        let (result, _) = parse(b"SE\xffND\n\n");
        assert!(matches!(result, Err(FrameError::UnrecognizedCommand(_))));
    }

    #[test]
    fn carriage_return_is_part_of_the_command() {
        let (result, _) = parse(b"SEND\r\n\n");
        assert!(matches!(result, Err(FrameError::UnrecognizedCommand(ref c)) if c == "SEND\r"));
    }

    #[test]
    fn malformed_lines_are_dropped() {
        let (result, _) = parse(b"SEND\na:1\ngarbage\n:leading\nb:2\n\n");
        let header = result.unwrap().unwrap();
        assert_eq!(
            header.headers(),
            &[
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn values_are_split_on_first_colon_without_trimming() {
        let (result, _) = parse(b"SEND\nurl: http://x:80/ \nempty:\n\n");
        let header = result.unwrap().unwrap();
        assert_eq!(header.get("url"), Some(" http://x:80/ "));
        assert_eq!(header.get("empty"), Some(""));
    }

    #[test]
    fn duplicates_are_preserved_in_order() {
        let (result, _) = parse(b"MESSAGE\nfoo:1\nfoo:2\nbar:x\nfoo:3\n\n");
        let header = result.unwrap().unwrap();
        assert_eq!(header.get("foo"), Some("1"));
        assert_eq!(header.get_all("foo").collect::<Vec<_>>(), vec!["1", "2", "3"]);
        assert_eq!(header.headers().len(), 4);
    }

    #[test]
    fn content_length_uses_first_occurrence() {
        let header = FrameHeader::new(Command::Send)
            .with(CONTENT_LENGTH, "5")
            .with(CONTENT_LENGTH, "9");
        assert_eq!(header.content_length().unwrap(), Some(5));
    }

    #[test]
    fn non_positive_content_length_is_absent() {
        for value in ["0", "-3"] {
            let header = FrameHeader::new(Command::Send).with(CONTENT_LENGTH, value);
            assert_eq!(header.content_length().unwrap(), None, "value {value}");
        }
        assert_eq!(FrameHeader::new(Command::Send).content_length().unwrap(), None);
    }

    #[test]
    fn oversized_content_length_is_an_error() {
        let huge = [usize::MAX.to_string(), u128::MAX.to_string(), "1".repeat(60)];
        for value in huge {
            let header = FrameHeader::new(Command::Send).with(CONTENT_LENGTH, value.as_str());
            assert!(
                matches!(header.content_length(), Err(FrameError::InvalidContentLength(_))),
                "value {value}"
            );
        }
        let largest = (usize::MAX - 1).to_string();
        let header = FrameHeader::new(Command::Send).with(CONTENT_LENGTH, largest);
        assert_eq!(header.content_length().unwrap(), Some(usize::MAX - 1));
    }

    #[test]
    fn counts_leading_blank_lines() {
        assert_eq!(leading_blank_lines(b""), 0);
        assert_eq!(leading_blank_lines(b"\n\n\nSEND\n"), 3);
        assert_eq!(leading_blank_lines(b"SEND\n\n"), 0);
    }

    #[test]
    fn unparseable_content_length_is_an_error() {
        for value in ["abc", " 5", "5 ", ""] {
            let header = FrameHeader::new(Command::Send).with(CONTENT_LENGTH, value);
            assert!(
                matches!(header.content_length(), Err(FrameError::InvalidContentLength(_))),
                "value {value:?}"
            );
        }
    }
}
