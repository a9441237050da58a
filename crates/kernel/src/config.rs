//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Default manifest file name, relative to the project root.
pub const DEFAULT_MANIFEST_FILE: &str = "telaio.toml";

/// Kernel configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the project manifest (default: ./telaio.toml).
    pub manifest_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an explicit variable lookup. Keeps the
    /// parsing independent of the process environment.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let manifest_path = lookup("TELAIO_MANIFEST")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST_FILE));

        Ok(Self { manifest_path })
    }
}
