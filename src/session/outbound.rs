//! The outbound half of the protocol seam.
//!
//! Session logic only ever calls these operations; the runner turns them
//! into wire messages.

use crate::error::TalkbackError;
use talkback_proto::{Command, Message};

/// Protocol operations a session may request.
pub trait Outbound {
    /// Send NICK and USER.
    fn register(&mut self, nickname: &str, realname: &str) -> Result<(), TalkbackError>;

    /// Request to join a channel.
    fn join(&mut self, channel: &str) -> Result<(), TalkbackError>;

    /// Send a PRIVMSG to a nickname or channel.
    fn send_message(&mut self, target: &str, text: &str) -> Result<(), TalkbackError>;

    /// Ask the server to close the connection.
    fn disconnect(&mut self, reason: Option<&str>) -> Result<(), TalkbackError>;
}

/// Nothing may be queued behind a QUIT.
fn ensure_open(queue: &[Message]) -> Result<(), TalkbackError> {
    if queue.iter().any(|m| matches!(m.command, Command::QUIT(_))) {
        return Err(TalkbackError::Outbound);
    }
    Ok(())
}

/// Buffers requests as wire messages. The runner flushes the buffer after
/// every inbound event, so replies leave in order.
impl Outbound for Vec<Message> {
    fn register(&mut self, nickname: &str, realname: &str) -> Result<(), TalkbackError> {
        ensure_open(self)?;
        self.push(Message::nick(nickname));
        self.push(Message::user(nickname, realname));
        Ok(())
    }

    fn join(&mut self, channel: &str) -> Result<(), TalkbackError> {
        ensure_open(self)?;
        self.push(Message::join(channel));
        Ok(())
    }

    fn send_message(&mut self, target: &str, text: &str) -> Result<(), TalkbackError> {
        ensure_open(self)?;
        self.push(Message::privmsg(target, text));
        Ok(())
    }

    fn disconnect(&mut self, reason: Option<&str>) -> Result<(), TalkbackError> {
        ensure_open(self)?;
        self.push(Message::quit(reason.map(str::to_owned)));
        Ok(())
    }
}
