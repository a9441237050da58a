//! Plugin package naming convention.
//!
//! A project dependency is a Telaio plugin when its package name is
//! `telaio-plugin-<name>`. Everything else is excluded silently; a
//! non-matching dependency is ordinary, not an error.

/// Package-name prefix that marks a dependency as a plugin.
pub const PLUGIN_PACKAGE_PREFIX: &str = "telaio-plugin-";

/// Extract the canonical plugin name from a dependency identifier.
///
/// Returns `None` for non-plugin dependencies and for the degenerate case
/// of the bare prefix with nothing after it.
pub fn plugin_name(dependency: &str) -> Option<&str> {
    match dependency.strip_prefix(PLUGIN_PACKAGE_PREFIX) {
        Some("") | None => None,
        Some(name) => Some(name),
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn extracts_name_from_plugin_package() {
        assert_eq!(plugin_name("telaio-plugin-auth"), Some("auth"));
        assert_eq!(plugin_name("telaio-plugin-dotenv"), Some("dotenv"));
        assert_eq!(
            plugin_name("telaio-plugin-schema-relay"),
            Some("schema-relay")
        );
    }

    #[test]
    fn excludes_ordinary_dependencies() {
        assert_eq!(plugin_name("lodash"), None);
        assert_eq!(plugin_name("serde"), None);
        assert_eq!(plugin_name("telaio"), None);
        assert_eq!(plugin_name("telaio-sdk"), None);
    }

    #[test]
    fn excludes_bare_prefix() {
        assert_eq!(plugin_name("telaio-plugin-"), None);
    }

    #[test]
    fn prefix_must_be_at_the_start() {
        assert_eq!(plugin_name("my-telaio-plugin-auth"), None);
    }
}
