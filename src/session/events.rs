//! Lifecycle events.
//!
//! The `Display` output of each event is the exact log line, so log
//! scrapers and tests can grep for it.

use std::fmt;

/// Something observable happened to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    ConnectionMade,
    SignedOn {
        nickname: String,
    },
    /// The server confirmed a different nickname than the one requested.
    NicknameOccupied {
        requested: String,
        actual: String,
    },
    Joined {
        nickname: String,
        channel: String,
    },
    MessageSent {
        receiver: String,
        sender: String,
        response: String,
    },
    ConnectionLost {
        reason: String,
    },
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionMade => f.write_str("connectionMade"),
            Self::SignedOn { .. } => f.write_str("Signed on"),
            Self::NicknameOccupied { actual, .. } => write!(
                f,
                "Your nickname was already occupied, actual nickname is \"{}\".",
                actual
            ),
            Self::Joined { nickname, channel } => {
                write!(f, "[{} has joined {}]", nickname, channel)
            }
            Self::MessageSent {
                receiver,
                sender,
                response,
            } => write!(
                f,
                "Sent message to {}, triggered by {}: \n\t{}",
                receiver, sender, response
            ),
            Self::ConnectionLost { reason } => write!(f, "connectionLost {:?}", reason),
        }
    }
}
