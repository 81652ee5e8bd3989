//! Configuration loading and management.
//!
//! - [`types`]: file-level structs (`Config`, `IrcConfig`, `TalkbackConfig`)
//! - [`session`]: the immutable [`SessionConfig`] handed to a session
//! - [`validation`]: startup checks that report every problem at once
//! - [`defaults`]: built-in values for optional settings

mod defaults;
mod session;
mod types;
mod validation;

pub use defaults::{default_responses, DEFAULT_CONFIG_PATH};
pub use session::SessionConfig;
pub use types::{normalize_triggers, Config, ConfigError, IrcConfig, TalkbackConfig};
pub use validation::{validate, ValidationError};
