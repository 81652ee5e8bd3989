//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use crate::endpoint::{Endpoint, EndpointError};
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("irc.endpoint is invalid: {0}")]
    InvalidEndpoint(#[from] EndpointError),
    #[error("irc.channel is required")]
    MissingChannel,
    #[error("irc.channel must start with '#' or '&', got '{0}'")]
    InvalidChannel(String),
    #[error("irc.nickname is required")]
    MissingNickname,
    #[error("irc.nickname must not contain spaces, got '{0}'")]
    InvalidNickname(String),
    #[error("irc.realname is required")]
    MissingRealname,
    #[error("talkback.responses must contain at least one entry")]
    EmptyResponses,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let irc = &config.irc;

    if let Err(e) = irc.endpoint.parse::<Endpoint>() {
        errors.push(ValidationError::from(e));
    }

    let channel = irc.channel.trim();
    if channel.is_empty() {
        errors.push(ValidationError::MissingChannel);
    } else if !channel.starts_with(['#', '&']) || channel.contains([' ', ',']) {
        errors.push(ValidationError::InvalidChannel(irc.channel.clone()));
    }

    let nickname = irc.nickname.trim();
    if nickname.is_empty() {
        errors.push(ValidationError::MissingNickname);
    } else if irc.nickname.contains(char::is_whitespace) {
        errors.push(ValidationError::InvalidNickname(irc.nickname.clone()));
    }

    if irc.realname.trim().is_empty() {
        errors.push(ValidationError::MissingRealname);
    }

    if config.talkback.responses.is_empty() {
        errors.push(ValidationError::EmptyResponses);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
