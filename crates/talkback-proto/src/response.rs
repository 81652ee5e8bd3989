//! Numeric replies a registering client cares about.

use std::fmt;

/// Three-digit server numerics.
///
/// Only the replies that drive client registration are named; anything
/// else is carried as [`Response::Other`].
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Response {
    /// 001 - registration accepted; first parameter is the confirmed nick.
    RPL_WELCOME,
    /// 002
    RPL_YOURHOST,
    /// 376
    RPL_ENDOFMOTD,
    /// 422
    ERR_NOMOTD,
    /// 432
    ERR_ERRONEUSNICKNAME,
    /// 433
    ERR_NICKNAMEINUSE,
    /// 436
    ERR_NICKCOLLISION,
    /// Any other numeric.
    Other(u16),
}

impl Response {
    /// Map a numeric code to a response.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::RPL_WELCOME,
            2 => Self::RPL_YOURHOST,
            376 => Self::RPL_ENDOFMOTD,
            422 => Self::ERR_NOMOTD,
            432 => Self::ERR_ERRONEUSNICKNAME,
            433 => Self::ERR_NICKNAMEINUSE,
            436 => Self::ERR_NICKCOLLISION,
            other => Self::Other(other),
        }
    }

    /// The numeric code.
    pub fn code(&self) -> u16 {
        match self {
            Self::RPL_WELCOME => 1,
            Self::RPL_YOURHOST => 2,
            Self::RPL_ENDOFMOTD => 376,
            Self::ERR_NOMOTD => 422,
            Self::ERR_ERRONEUSNICKNAME => 432,
            Self::ERR_NICKNAMEINUSE => 433,
            Self::ERR_NICKCOLLISION => 436,
            Self::Other(code) => *code,
        }
    }

    /// Error numerics live in the 400-599 range.
    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.code())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}
