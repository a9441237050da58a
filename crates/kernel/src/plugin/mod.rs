//! Plugin system for Telaio.
//!
//! This module handles:
//! - Matching manifest dependencies against the plugin naming convention
//! - Resolving matched packages through a host-supplied resolver
//! - Instantiating plugin drivers and aggregating their lifecycle hooks
//! - Converting plugin failures into fatal, plugin-naming diagnostics

mod error;
mod fatal;
mod loader;
pub mod matcher;
mod resolver;

pub use error::PluginError;
pub use fatal::{abort, render};
pub use loader::{PluginLoader, collect_runtime_contributions, collect_workflow_hooks};
pub use matcher::{PLUGIN_PACKAGE_PREFIX, plugin_name};
pub use resolver::{PackageExports, PluginResolver};
