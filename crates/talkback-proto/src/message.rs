//! Owned IRC messages: parsing and serialization.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::command::Command;
use crate::error::{MessageParseError, ProtocolError};
use crate::prefix::Prefix;

/// An owned IRC message.
///
/// IRCv3 tags are accepted on input and discarded; the client never needs
/// them and never sends them.
///
/// ```
/// use talkback_proto::{Command, Message};
///
/// let msg: Message = ":alice!u@h PRIVMSG #chan :hello".parse().unwrap();
/// assert_eq!(msg.source_nickname(), Some("alice"));
/// assert!(matches!(msg.command, Command::PRIVMSG(_, _)));
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct Message {
    /// Message source (e.g., `nick!user@host`).
    pub prefix: Option<Prefix>,
    /// The command and its parameters.
    pub command: Command,
}

impl Message {
    /// Create a message from raw components.
    pub fn new(
        prefix: Option<&str>,
        command: &str,
        args: Vec<&str>,
    ) -> Result<Message, MessageParseError> {
        let prefix = match prefix {
            Some("") => return Err(MessageParseError::InvalidPrefix(String::new())),
            Some(p) => Some(Prefix::new_from_str(p)),
            None => None,
        };

        Ok(Message {
            prefix,
            command: Command::new(command, args)?,
        })
    }

    /// Attach a source prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Nickname from the prefix, if it is a user prefix.
    pub fn source_nickname(&self) -> Option<&str> {
        self.prefix.as_ref().and_then(Prefix::nick)
    }

    /// `PRIVMSG <target> :<text>`
    #[must_use]
    pub fn privmsg<T, M>(target: T, text: M) -> Self
    where
        T: Into<String>,
        M: Into<String>,
    {
        Command::PRIVMSG(target.into(), text.into()).into()
    }

    /// `JOIN <channel>`
    #[must_use]
    pub fn join<C>(channel: C) -> Self
    where
        C: Into<String>,
    {
        Command::JOIN(channel.into()).into()
    }

    /// `NICK <nickname>`
    #[must_use]
    pub fn nick<N>(nickname: N) -> Self
    where
        N: Into<String>,
    {
        Command::NICK(nickname.into()).into()
    }

    /// `USER <username> 0 * :<realname>`
    #[must_use]
    pub fn user<U, R>(username: U, realname: R) -> Self
    where
        U: Into<String>,
        R: Into<String>,
    {
        Command::USER(username.into(), "0".into(), realname.into()).into()
    }

    /// `PONG <server> [<token>]`
    #[must_use]
    pub fn pong<S>(server: S, token: Option<String>) -> Self
    where
        S: Into<String>,
    {
        Command::PONG(server.into(), token).into()
    }

    /// `QUIT [:<reason>]`
    #[must_use]
    pub fn quit(reason: Option<String>) -> Self {
        Command::QUIT(reason).into()
    }
}

impl From<Command> for Message {
    fn from(command: Command) -> Self {
        Message {
            prefix: None,
            command,
        }
    }
}

/// Split off the next space-delimited token, skipping leading spaces.
fn next_token(s: &str) -> (&str, &str) {
    let s = s.trim_start_matches(' ');
    match s.find(' ') {
        Some(i) => (&s[..i], &s[i + 1..]),
        None => (s, ""),
    }
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        let invalid = |cause| ProtocolError::InvalidMessage {
            string: s.to_owned(),
            cause,
        };

        let line = s.trim_end_matches(&['\r', '\n'][..]);
        if line.trim().is_empty() {
            return Err(invalid(MessageParseError::EmptyMessage));
        }

        let mut rest = line;

        if rest.starts_with('@') {
            rest = next_token(rest).1;
        }

        let mut prefix = None;
        if let Some(stripped) = rest.strip_prefix(':') {
            let (p, tail) = next_token(stripped);
            if p.is_empty() || stripped.starts_with(' ') {
                return Err(invalid(MessageParseError::InvalidPrefix(p.to_owned())));
            }
            prefix = Some(p);
            rest = tail;
        }

        let (command, mut rest) = next_token(rest);
        if command.is_empty() {
            return Err(invalid(MessageParseError::MissingCommand));
        }

        let mut params = Vec::new();
        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }
            if let Some(trailing) = rest.strip_prefix(':') {
                params.push(trailing);
                break;
            }
            let (param, tail) = next_token(rest);
            params.push(param);
            rest = tail;
        }

        Message::new(prefix, command, params).map_err(invalid)
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(ref prefix) = self.prefix {
            write!(f, ":{} ", prefix)?;
        }

        write!(f, "{}\r\n", self.command)
    }
}
