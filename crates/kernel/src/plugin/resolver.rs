//! Plugin package resolution.
//!
//! Resolving a package name to its exports is a capability the host passes
//! in rather than something this crate does itself; that keeps driver
//! loading and hook aggregation testable without any real package-loading
//! machinery. `telaio-test-utils` provides an in-memory implementation.

use anyhow::Result;
use telaio_sdk::DriverCreator;

/// The exports a resolved plugin package offers the kernel.
///
/// A package can resolve and still lack the creation capability; the two
/// failures carry distinct diagnostics.
#[derive(Debug, Clone, Default)]
pub struct PackageExports {
    create: Option<DriverCreator>,
}

impl PackageExports {
    /// Exports with no creation capability.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exports carrying a creation capability.
    pub fn with_create(creator: DriverCreator) -> Self {
        Self {
            create: Some(creator),
        }
    }

    /// The package's creation capability, if it exports one.
    pub fn create(&self) -> Option<&DriverCreator> {
        self.create.as_ref()
    }
}

/// Resolves a plugin package name to its exports.
///
/// Implementations decide what "resolving" means: the host binary binds it
/// to installed packages, tests bind it to an in-memory map. Failure means
/// the package could not be loaded at all.
pub trait PluginResolver: Send + Sync {
    /// Resolve a package by its manifest name.
    fn resolve(&self, package: &str) -> Result<PackageExports>;
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_exports_have_no_create_capability() {
        assert!(PackageExports::new().create().is_none());
    }

    #[test]
    fn exports_carry_the_creator() {
        let creator = telaio_sdk::create(|_lens| Ok(()));
        let exports = PackageExports::with_create(creator);
        assert!(exports.create().is_some());
    }
}
