//! Plugin loading error types with clear, actionable messages.
//!
//! Every error names the offending plugin. Once a dependency has matched
//! the plugin naming convention, any subsequent problem is an environment
//! or configuration error that must stop the whole load; a partially
//! loaded plugin set could silently change build or runtime behavior.

use thiserror::Error;

/// Errors that can occur while loading plugins.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The plugin's package could not be resolved.
    #[error(
        "plugin '{plugin}': failed to resolve package '{package}': {details}\ninstall it with: telaio add {package}"
    )]
    ResolutionFailed {
        plugin: String,
        package: String,
        details: String,
    },

    /// The package resolved but does not export a creation capability.
    #[error(
        "plugin '{plugin}': package '{package}' does not export a create capability\nexpected `pub fn create() -> DriverCreator` built with telaio_sdk::create"
    )]
    MissingCreateExport { plugin: String, package: String },

    /// The creation capability failed when applied to the plugin name.
    #[error("plugin '{plugin}': failed to instantiate: {details}")]
    InstantiationFailed { plugin: String, details: String },

    /// Two manifest dependencies map to the same plugin name.
    #[error(
        "plugin '{plugin}': declared more than once (packages '{first}' and '{second}' both map to it)"
    )]
    DuplicateName {
        plugin: String,
        first: String,
        second: String,
    },

    /// The plugin's workflow definer failed during aggregation.
    #[error("plugin '{plugin}': failed to load workflow hooks: {details}")]
    WorkflowLoadFailed { plugin: String, details: String },

    /// The plugin's runtime producer failed during aggregation.
    #[error("plugin '{plugin}': failed to load runtime contributions: {details}")]
    RuntimeLoadFailed { plugin: String, details: String },
}

impl PluginError {
    /// Create a resolution failure, flattening the error chain.
    pub fn resolution_failed(
        plugin: impl Into<String>,
        package: impl Into<String>,
        err: &anyhow::Error,
    ) -> Self {
        Self::ResolutionFailed {
            plugin: plugin.into(),
            package: package.into(),
            details: format!("{err:#}"),
        }
    }

    /// Create a missing create-export error.
    pub fn missing_create_export(plugin: impl Into<String>, package: impl Into<String>) -> Self {
        Self::MissingCreateExport {
            plugin: plugin.into(),
            package: package.into(),
        }
    }

    /// Create an instantiation failure, flattening the error chain.
    pub fn instantiation_failed(plugin: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::InstantiationFailed {
            plugin: plugin.into(),
            details: format!("{err:#}"),
        }
    }

    /// Create a workflow load failure, flattening the error chain.
    pub fn workflow_load_failed(plugin: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::WorkflowLoadFailed {
            plugin: plugin.into(),
            details: format!("{err:#}"),
        }
    }

    /// Create a runtime load failure, flattening the error chain.
    pub fn runtime_load_failed(plugin: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::RuntimeLoadFailed {
            plugin: plugin.into(),
            details: format!("{err:#}"),
        }
    }

    /// The name of the plugin this error concerns.
    pub fn plugin(&self) -> &str {
        match self {
            Self::ResolutionFailed { plugin, .. }
            | Self::MissingCreateExport { plugin, .. }
            | Self::InstantiationFailed { plugin, .. }
            | Self::DuplicateName { plugin, .. }
            | Self::WorkflowLoadFailed { plugin, .. }
            | Self::RuntimeLoadFailed { plugin, .. } => plugin,
        }
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn resolution_error_suggests_install_command() {
        let underlying = anyhow::anyhow!("package 'telaio-plugin-auth' is not installed");
        let err = PluginError::resolution_failed("auth", "telaio-plugin-auth", &underlying);
        let msg = err.to_string();
        assert!(msg.contains("auth"));
        assert!(msg.contains("telaio add telaio-plugin-auth"));
        assert!(msg.contains("not installed"));
    }

    #[test]
    fn missing_export_names_the_expected_signature() {
        let err = PluginError::missing_create_export("auth", "telaio-plugin-auth");
        let msg = err.to_string();
        assert!(msg.contains("create capability"));
        assert!(msg.contains("telaio_sdk::create"));
    }

    #[test]
    fn details_include_the_full_error_chain() {
        let underlying = anyhow::anyhow!("io error").context("reading credentials");
        let err = PluginError::instantiation_failed("auth", &underlying);
        let msg = err.to_string();
        assert!(msg.contains("reading credentials"));
        assert!(msg.contains("io error"));
    }

    #[test]
    fn every_variant_names_its_plugin() {
        let err = PluginError::DuplicateName {
            plugin: "auth".to_string(),
            first: "telaio-plugin-auth".to_string(),
            second: "telaio-plugin-auth".to_string(),
        };
        assert_eq!(err.plugin(), "auth");
        assert!(err.to_string().contains("declared more than once"));
    }
}
