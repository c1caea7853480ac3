//! STOMP frame decoding for arbitrarily chunked byte streams.
//!
//! # Crate Structure
//!
//! - [`frame`]: incremental frame decoder, encoder and blocking stream adapters
//!
//! Enable the `async` feature for a `tokio_util` codec (`frame::StompCodec`).

/// Re-export frame types.
pub mod frame {
    pub use stompwire_frame::*;
}
