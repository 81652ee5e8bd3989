//! The immutable per-session configuration value.

use super::types::Config;

/// Everything a session needs, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub endpoint: String,
    pub channel: String,
    pub nickname: String,
    pub realname: String,
    /// Lower-cased keywords, in configured order.
    pub triggers: Vec<String>,
}

impl SessionConfig {
    pub fn new(
        endpoint: impl Into<String>,
        channel: impl Into<String>,
        nickname: impl Into<String>,
        realname: impl Into<String>,
        triggers: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            channel: channel.into(),
            nickname: nickname.into(),
            realname: realname.into(),
            triggers: triggers
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .collect(),
        }
    }
}

impl From<&Config> for SessionConfig {
    fn from(config: &Config) -> Self {
        Self::new(
            config.irc.endpoint.clone(),
            config.irc.channel.clone(),
            config.irc.nickname.clone(),
            config.irc.realname.clone(),
            &config.talkback.triggers,
        )
    }
}
