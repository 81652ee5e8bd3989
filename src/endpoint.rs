//! Client endpoint strings.
//!
//! Accepted forms:
//! - `tcp:HOST:PORT` and `tls:HOST:PORT` (`ssl:` is an alias for `tls:`)
//! - keyword form, e.g. `tcp:host=irc.libera.chat:port=6667`
//! - bare `HOST:PORT`, which means plain TCP
//!
//! IPv6 hosts go in brackets: `tcp:[::1]:6667`, `tcp:host=[::1]:port=6667`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Endpoint parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("endpoint is empty")]
    Empty,
    #[error("unknown endpoint scheme: {0}")]
    UnknownScheme(String),
    #[error("endpoint is missing a host: {0}")]
    MissingHost(String),
    #[error("invalid host {host:?} in endpoint {endpoint}")]
    InvalidHost { endpoint: String, host: String },
    #[error("endpoint is missing a port: {0}")]
    MissingPort(String),
    #[error("invalid port {port:?} in endpoint {endpoint}")]
    InvalidPort { endpoint: String, port: String },
    #[error("unknown endpoint option {key:?} in {endpoint}")]
    UnknownOption { endpoint: String, key: String },
}

/// Where to connect and whether to wrap the socket in TLS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub tls: bool,
}

impl Endpoint {
    /// `host:port` for `TcpStream::connect`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.bracketed_host(), self.port)
    }

    fn bracketed_host(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        }
    }
}

/// Split on `:` outside of `[...]`, so bracketed IPv6 hosts stay whole.
fn split_fields(s: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut in_brackets = false;
    let mut start = 0;

    for (i, ch) in s.char_indices() {
        match ch {
            '[' => in_brackets = true,
            ']' => in_brackets = false,
            ':' if !in_brackets => {
                fields.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(&s[start..]);
    fields
}

/// Strip IPv6 brackets. Anything else bracket-shaped is rejected.
fn unbracket<'a>(host: &'a str, raw: &str) -> Result<&'a str, EndpointError> {
    let invalid = || EndpointError::InvalidHost {
        endpoint: raw.to_owned(),
        host: host.to_owned(),
    };

    match host.strip_prefix('[') {
        Some(rest) => match rest.strip_suffix(']') {
            Some(inner) if inner.contains(':') && !inner.contains(['[', ']']) => Ok(inner),
            _ => Err(invalid()),
        },
        None if host.contains(['[', ']', ':']) => Err(invalid()),
        None => Ok(host),
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(EndpointError::Empty);
        }

        let mut parts = split_fields(raw);
        let tls = match parts[0] {
            "tcp" => {
                parts.remove(0);
                false
            }
            "tls" | "ssl" => {
                parts.remove(0);
                true
            }
            // Bare HOST:PORT
            _ if parts.len() == 2 => false,
            other => return Err(EndpointError::UnknownScheme(other.to_owned())),
        };

        let mut host = None;
        let mut port = None;
        let mut positional = Vec::new();

        for part in parts {
            match part.split_once('=') {
                Some(("host", value)) => host = Some(value),
                Some(("port", value)) => port = Some(value),
                Some((key, _)) => {
                    return Err(EndpointError::UnknownOption {
                        endpoint: raw.to_owned(),
                        key: key.to_owned(),
                    })
                }
                None => positional.push(part),
            }
        }

        let mut positional = positional.into_iter();
        let host = host
            .or_else(|| positional.next())
            .filter(|h| !h.is_empty())
            .ok_or_else(|| EndpointError::MissingHost(raw.to_owned()))?;
        let host = unbracket(host, raw)?;
        let port = port
            .or_else(|| positional.next())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| EndpointError::MissingPort(raw.to_owned()))?;
        let port = port.parse::<u16>().map_err(|_| EndpointError::InvalidPort {
            endpoint: raw.to_owned(),
            port: port.to_owned(),
        })?;

        Ok(Endpoint {
            host: host.to_owned(),
            port,
            tls,
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = if self.tls { "tls" } else { "tcp" };
        write!(f, "{}:{}:{}", scheme, self.bracketed_host(), self.port)
    }
}
