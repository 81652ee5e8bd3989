//! Client-side IRC protocol layer for talkback.
//!
//! Provides just enough of the wire protocol for a bot that registers,
//! joins a channel and exchanges `PRIVMSG`s:
//!
//! - [`Message`], [`Command`], [`Prefix`], [`Response`]: owned message model
//! - [`LineCodec`] / [`IrcCodec`]: tokio codecs for newline framed lines
//! - [`transport::Transport`]: framed TCP or client TLS connection

#![deny(clippy::all)]

pub mod command;
pub mod error;
pub mod format;
pub mod irc;
pub mod line;
pub mod message;
pub mod prefix;
pub mod response;
pub mod transport;

pub use self::command::Command;
pub use self::error::{MessageParseError, ProtocolError};
pub use self::irc::IrcCodec;
pub use self::line::LineCodec;
pub use self::message::Message;
pub use self::prefix::Prefix;
pub use self::response::Response;
