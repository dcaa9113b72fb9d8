//! Configuration loading from TOML files

mod settings;
mod shared;

pub use settings::{BreakExponent, Settings};
pub use shared::SharedSettings;

use crate::types::KeywordId;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Resolves keyword editor ids named in the `[Materials]` section
pub trait KeywordLookup {
    fn lookup(&self, editor_id: &str) -> Option<KeywordId>;
}

impl<F> KeywordLookup for F
where
    F: Fn(&str) -> Option<KeywordId>,
{
    fn lookup(&self, editor_id: &str) -> Option<KeywordId> {
        self(editor_id)
    }
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_toml(&content)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}
