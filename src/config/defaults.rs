//! Built-in configuration values.

/// Replies used when the config file does not list any.
pub fn default_responses() -> Vec<String> {
    ["test1", "test2", "test3", "test4"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Config path used when none is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "talkback.toml";
