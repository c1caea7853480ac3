//! Incremental STOMP frame decoding.
//!
//! Bytes may arrive in any fragmentation. [`decode_frame`] either returns one
//! complete frame and consumes its bytes, or returns `Ok(None)` and leaves the
//! buffer untouched so the attempt can be repeated once more bytes arrive.
//!
//! Every frame is:
//! - A command line naming one of the closed set of [`Command`]s
//! - Zero or more `name:value` header lines, then a blank line
//! - A body, delimited either by a positive `content-length` header or by the
//!   next NUL byte, followed by the NUL terminator
//!
//! Header values are exposed verbatim and bodies as opaque bytes.

pub mod body;
pub mod codec;
pub mod command;
pub mod cursor;
pub mod error;
#[cfg(feature = "async")]
pub mod framed;
pub mod header;
pub mod reader;
pub mod writer;

pub use body::{BodyFraming, NUL};
pub use codec::{decode_frame, encode_frame, Frame, FrameConfig};
pub use command::Command;
pub use cursor::ByteCursor;
pub use error::{FrameError, Result};
#[cfg(feature = "async")]
pub use framed::StompCodec;
pub use header::{parse_header, FrameHeader, CONTENT_LENGTH};
pub use reader::FrameReader;
pub use writer::FrameWriter;
