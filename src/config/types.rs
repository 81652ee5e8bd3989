//! Core configuration types and loading.

use serde::{Deserialize, Deserializer};
use std::path::Path;
use thiserror::Error;

use super::defaults::default_responses;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server connection and identity.
    pub irc: IrcConfig,
    /// Reply behaviour.
    #[serde(default)]
    pub talkback: TalkbackConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// `[irc]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct IrcConfig {
    /// Client endpoint string, e.g. `tcp:irc.libera.chat:6667`.
    pub endpoint: String,
    /// Channel to join, e.g. `#newcoder`.
    pub channel: String,
    /// Requested nickname. The server may hand back a different one.
    pub nickname: String,
    /// Realname sent with USER.
    pub realname: String,
}

/// `[talkback]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TalkbackConfig {
    /// Keywords that can cause a public reply. Either a TOML array or a
    /// single newline-separated string.
    #[serde(deserialize_with = "deserialize_triggers")]
    pub triggers: Vec<String>,
    /// Candidate replies.
    pub responses: Vec<String>,
}

impl Default for TalkbackConfig {
    fn default() -> Self {
        Self {
            triggers: Vec::new(),
            responses: default_responses(),
        }
    }
}

/// Trim every entry and drop the ones left empty, keeping order.
pub fn normalize_triggers<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .map(|t| t.as_ref().trim().to_owned())
        .filter(|t| !t.is_empty())
        .collect()
}

fn deserialize_triggers<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTriggers {
        Lines(String),
        List(Vec<String>),
    }

    Ok(match RawTriggers::deserialize(deserializer)? {
        RawTriggers::Lines(text) => normalize_triggers(text.lines()),
        RawTriggers::List(list) => normalize_triggers(list),
    })
}
