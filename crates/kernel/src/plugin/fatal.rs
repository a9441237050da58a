//! Fatal diagnostic boundary.
//!
//! Everything below this module reports plugin failures as typed
//! [`PluginError`] values; only the host binary, through [`abort`], turns
//! one into process termination. Keeping the exit here leaves the loading
//! and aggregation code side-effect-free and unit-testable.

use tracing::error;

use super::error::PluginError;

/// Render the multi-line diagnostic shown to the user for a fatal error.
pub fn render(err: &PluginError) -> String {
    format!(
        "error: {err}\n\n\
         plugin loading aborted: no plugins were activated.\n\
         fix plugin '{plugin}' and run the command again.",
        plugin = err.plugin()
    )
}

/// Log the failure and terminate the process.
///
/// The load is all-or-nothing: a single misbehaving plugin stops the tool
/// rather than producing a working-looking but semantically wrong build.
pub fn abort(err: &PluginError) -> ! {
    error!(plugin = %err.plugin(), error = %err, "plugin load failed");
    eprintln!("{}", render(err));
    std::process::exit(1);
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn rendered_diagnostic_names_plugin_and_cause() {
        let underlying = anyhow::anyhow!("definer exploded");
        let err = PluginError::instantiation_failed("auth", &underlying);
        let rendered = render(&err);

        assert!(rendered.starts_with("error: plugin 'auth'"));
        assert!(rendered.contains("definer exploded"));
        assert!(rendered.contains("no plugins were activated"));
        assert!(rendered.contains("fix plugin 'auth'"));
    }

    #[test]
    fn rendered_diagnostic_is_multi_line() {
        let err = PluginError::missing_create_export("auth", "telaio-plugin-auth");
        assert!(render(&err).lines().count() >= 3);
    }
}
