//! Project manifest scanning.
//!
//! The manifest (`telaio.toml`) declares the project's dependencies in a
//! `[dependencies]` table. The scanner reads only the table's keys, in
//! declaration order, and ignores every other section. An absent or
//! malformed manifest means a project with no plugins, never a failure.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::plugin::matcher;

/// A manifest dependency that matched the plugin naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDependency {
    /// Package name as declared in the manifest.
    pub package: String,
    /// Canonical plugin name (package name minus the prefix).
    pub name: String,
}

/// The project's dependency manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectManifest {
    /// Declared dependencies; only the keys matter here. The table keeps
    /// declaration order, which later becomes aggregation order.
    #[serde(default)]
    dependencies: toml::Table,
}

impl ProjectManifest {
    /// Read a manifest from disk, blocking.
    ///
    /// An unreadable file yields an empty manifest.
    pub fn read(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse_str(&content, path),
            Err(e) => {
                info!(
                    path = %path.display(),
                    error = %e,
                    "manifest not readable, treating project as plugin-free"
                );
                Self::default()
            }
        }
    }

    /// Read a manifest from disk without blocking the caller's task.
    ///
    /// Identical output to [`ProjectManifest::read`] for identical content;
    /// only the scheduling of the file read differs.
    pub async fn read_async(path: &Path) -> Self {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Self::parse_str(&content, path),
            Err(e) => {
                info!(
                    path = %path.display(),
                    error = %e,
                    "manifest not readable, treating project as plugin-free"
                );
                Self::default()
            }
        }
    }

    /// Parse manifest content. Malformed TOML yields an empty manifest.
    pub fn parse_str(content: &str, path: &Path) -> Self {
        match toml::from_str(content) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "manifest is not valid TOML, treating project as plugin-free"
                );
                Self::default()
            }
        }
    }

    /// All declared dependency names, in declaration order.
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies.keys().map(String::as_str)
    }

    /// The dependencies that satisfy the plugin naming convention, in
    /// declaration order.
    pub fn plugin_dependencies(&self) -> Vec<PluginDependency> {
        self.dependency_names()
            .filter_map(|package| {
                matcher::plugin_name(package).map(|name| PluginDependency {
                    package: package.to_string(),
                    name: name.to_string(),
                })
            })
            .collect()
    }
}
