//! The closed STOMP command vocabulary.

use std::fmt;
use std::str::FromStr;

use crate::error::FrameError;

/// A STOMP frame command.
///
/// Only the exact, case-sensitive names below are recognized. The command line
/// is never trimmed, so `"SEND\r"` or `" SEND"` do not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Stomp,
    Connect,
    Connected,
    Disconnect,
    Send,
    Message,
    Subscribe,
    Unsubscribe,
    Begin,
    Commit,
    Ack,
    Nack,
    Abort,
    Receipt,
    Error,
}

impl Command {
    /// Every recognized command, in table order.
    pub const ALL: [Command; 15] = [
        Command::Stomp,
        Command::Connect,
        Command::Connected,
        Command::Disconnect,
        Command::Send,
        Command::Message,
        Command::Subscribe,
        Command::Unsubscribe,
        Command::Begin,
        Command::Commit,
        Command::Ack,
        Command::Nack,
        Command::Abort,
        Command::Receipt,
        Command::Error,
    ];

    /// Wire name of the command.
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Stomp => "STOMP",
            Command::Connect => "CONNECT",
            Command::Connected => "CONNECTED",
            Command::Disconnect => "DISCONNECT",
            Command::Send => "SEND",
            Command::Message => "MESSAGE",
            Command::Subscribe => "SUBSCRIBE",
            Command::Unsubscribe => "UNSUBSCRIBE",
            Command::Begin => "BEGIN",
            Command::Commit => "COMMIT",
            Command::Ack => "ACK",
            Command::Nack => "NACK",
            Command::Abort => "ABORT",
            Command::Receipt => "RECEIPT",
            Command::Error => "ERROR",
        }
    }

    /// Returns true if frames with this command carry a body payload.
    ///
    /// This decides whether a decoded frame is a content frame or a control
    /// frame, independently of whether any body bytes were present on the wire.
    pub fn has_body(self) -> bool {
        matches!(self, Command::Send | Command::Message | Command::Error)
    }

    /// Look up a command by its exact wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.as_str() == name)
    }
}

impl FromStr for Command {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| FrameError::UnrecognizedCommand(s.to_string()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
