//! IRC commands understood by the client.

use std::fmt::{self, Write as _};

use crate::error::MessageParseError;
use crate::response::Response;

/// An IRC command with its parameters.
///
/// Commands outside the client's vocabulary, or ones whose arity does not
/// match, are kept as [`Command::Raw`] so nothing is dropped on the floor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `NICK <nickname>`
    NICK(String),
    /// `USER <user> <mode> * :<realname>`
    USER(String, String, String),
    /// `JOIN <channel>`
    JOIN(String),
    /// `PART <channel> [:<message>]`
    PART(String, Option<String>),
    /// `PRIVMSG <target> :<text>`
    PRIVMSG(String, String),
    /// `NOTICE <target> :<text>`
    NOTICE(String, String),
    /// `PING <server> [<server2>]`
    PING(String, Option<String>),
    /// `PONG <server> [<server2>]`
    PONG(String, Option<String>),
    /// `QUIT [:<reason>]`
    QUIT(Option<String>),
    /// `ERROR :<reason>`
    ERROR(String),
    /// Three-digit numeric reply.
    Response(Response, Vec<String>),
    /// Anything else.
    Raw(String, Vec<String>),
}

impl Command {
    /// Build a command from its name and parameters.
    pub fn new(cmd: &str, args: Vec<&str>) -> Result<Command, MessageParseError> {
        if cmd.is_empty() {
            return Err(MessageParseError::MissingCommand);
        }

        if cmd.len() == 3 && cmd.bytes().all(|b| b.is_ascii_digit()) {
            let code = cmd
                .parse::<u16>()
                .map_err(|_| MessageParseError::InvalidCommand(cmd.to_owned()))?;
            return Ok(Command::Response(
                Response::from_code(code),
                args.into_iter().map(str::to_owned).collect(),
            ));
        }

        if !cmd.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(MessageParseError::InvalidCommand(cmd.to_owned()));
        }

        fn owned(s: &str) -> String {
            s.to_owned()
        }

        let upper = cmd.to_ascii_uppercase();

        let command = match (upper.as_str(), args.as_slice()) {
            ("NICK", [nick, ..]) => Command::NICK(owned(nick)),
            ("USER", [user, mode, _, realname]) => {
                Command::USER(owned(user), owned(mode), owned(realname))
            }
            ("JOIN", [channel, ..]) => Command::JOIN(owned(channel)),
            ("PART", [channel]) => Command::PART(owned(channel), None),
            ("PART", [channel, msg]) => Command::PART(owned(channel), Some(owned(msg))),
            ("PRIVMSG", [target, text]) => Command::PRIVMSG(owned(target), owned(text)),
            ("NOTICE", [target, text]) => Command::NOTICE(owned(target), owned(text)),
            ("PING", [server]) => Command::PING(owned(server), None),
            ("PING", [server, other]) => Command::PING(owned(server), Some(owned(other))),
            ("PONG", [server]) => Command::PONG(owned(server), None),
            ("PONG", [server, other]) => Command::PONG(owned(server), Some(owned(other))),
            ("QUIT", []) => Command::QUIT(None),
            ("QUIT", [reason]) => Command::QUIT(Some(owned(reason))),
            ("ERROR", [reason]) => Command::ERROR(owned(reason)),
            _ => Command::Raw(upper.clone(), args.iter().map(|s| owned(s)).collect()),
        };

        Ok(command)
    }

    /// The command name as it appears on the wire.
    pub fn name(&self) -> String {
        match self {
            Command::NICK(_) => "NICK".into(),
            Command::USER(..) => "USER".into(),
            Command::JOIN(_) => "JOIN".into(),
            Command::PART(..) => "PART".into(),
            Command::PRIVMSG(..) => "PRIVMSG".into(),
            Command::NOTICE(..) => "NOTICE".into(),
            Command::PING(..) => "PING".into(),
            Command::PONG(..) => "PONG".into(),
            Command::QUIT(_) => "QUIT".into(),
            Command::ERROR(_) => "ERROR".into(),
            Command::Response(resp, _) => resp.to_string(),
            Command::Raw(name, _) => name.clone(),
        }
    }
}

/// Trailing parameters need a colon when empty, spaced or colon-led.
fn needs_colon_prefix(param: &str) -> bool {
    param.is_empty() || param.contains(' ') || param.starts_with(':')
}

/// Write a command, adding a colon to the last parameter only when required.
fn write_cmd(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    f.write_str(cmd)?;
    let Some((trailing, middle)) = args.split_last() else {
        return Ok(());
    };
    for param in middle {
        f.write_char(' ')?;
        f.write_str(param)?;
    }
    f.write_char(' ')?;
    if needs_colon_prefix(trailing) {
        f.write_char(':')?;
    }
    f.write_str(trailing)
}

/// Write a command whose last parameter is always free-form text.
fn write_cmd_freeform(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    f.write_str(cmd)?;
    let Some((suffix, middle)) = args.split_last() else {
        return Ok(());
    };
    for arg in middle {
        f.write_char(' ')?;
        f.write_str(arg)?;
    }
    f.write_str(" :")?;
    f.write_str(suffix)
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::NICK(n) => write_cmd(f, "NICK", &[n]),
            Command::USER(u, m, r) => write_cmd_freeform(f, "USER", &[u, m, "*", r]),
            Command::JOIN(c) => write_cmd(f, "JOIN", &[c]),
            Command::PART(c, Some(m)) => write_cmd_freeform(f, "PART", &[c, m]),
            Command::PART(c, None) => write_cmd(f, "PART", &[c]),
            Command::PRIVMSG(t, m) => write_cmd_freeform(f, "PRIVMSG", &[t, m]),
            Command::NOTICE(t, m) => write_cmd_freeform(f, "NOTICE", &[t, m]),
            Command::PING(s, Some(o)) => write_cmd(f, "PING", &[s, o]),
            Command::PING(s, None) => write_cmd(f, "PING", &[s]),
            Command::PONG(s, Some(o)) => write_cmd(f, "PONG", &[s, o]),
            Command::PONG(s, None) => write_cmd(f, "PONG", &[s]),
            Command::QUIT(Some(m)) => write_cmd_freeform(f, "QUIT", &[m]),
            Command::QUIT(None) => f.write_str("QUIT"),
            Command::ERROR(m) => write_cmd_freeform(f, "ERROR", &[m]),
            Command::Response(resp, args) => {
                let code = resp.to_string();
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                write_cmd(f, &code, &args)
            }
            Command::Raw(name, args) => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                write_cmd(f, name, &args)
            }
        }
    }
}
