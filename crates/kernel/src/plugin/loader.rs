//! Driver loading and lifecycle hook aggregation.
//!
//! The loader walks the manifest's plugin dependencies in declaration
//! order, turns each into a driver through the resolver, and aggregates the
//! hook sets of whichever drivers opted into a lifecycle. Any per-plugin
//! failure fails the whole load: callers get either the complete plugin set
//! or a [`PluginError`] naming the offender, never a partial list.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use telaio_sdk::Driver;
use telaio_sdk::host::HostUtilities;
use telaio_sdk::runtime::RuntimeContributions;
use telaio_sdk::workflow::{Layout, WorkflowHooks};

use super::error::PluginError;
use super::resolver::PluginResolver;
use crate::manifest::{PluginDependency, ProjectManifest};

/// Loads plugin drivers from the project manifest and aggregates their
/// lifecycle hooks.
pub struct PluginLoader {
    manifest_path: PathBuf,
    resolver: Arc<dyn PluginResolver>,
    host: Arc<HostUtilities>,
}

impl PluginLoader {
    /// Create a loader for the given manifest, resolving packages through
    /// the supplied resolver. Host utilities default to the standard
    /// non-interactive set.
    pub fn new(manifest_path: impl Into<PathBuf>, resolver: Arc<dyn PluginResolver>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            resolver,
            host: Arc::new(HostUtilities::default()),
        }
    }

    /// Replace the host utilities handed to plugins.
    pub fn with_host(mut self, host: Arc<HostUtilities>) -> Self {
        self.host = host;
        self
    }

    /// The manifest path this loader reads.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Load every plugin driver, in manifest declaration order.
    pub async fn load_drivers(&self) -> Result<Vec<Driver>, PluginError> {
        let manifest = ProjectManifest::read_async(&self.manifest_path).await;
        self.drivers_from(&manifest)
    }

    /// Blocking twin of [`PluginLoader::load_drivers`].
    pub fn load_drivers_blocking(&self) -> Result<Vec<Driver>, PluginError> {
        let manifest = ProjectManifest::read(&self.manifest_path);
        self.drivers_from(&manifest)
    }

    /// Aggregate workflow hooks from every driver extending the workflow
    /// lifecycle, in manifest declaration order.
    pub async fn load_all_workflow_hooks(
        &self,
        layout: &Layout,
    ) -> Result<Vec<WorkflowHooks>, PluginError> {
        let drivers = self.load_drivers().await?;
        collect_workflow_hooks(&drivers, layout)
    }

    /// Blocking twin of [`PluginLoader::load_all_workflow_hooks`].
    pub fn load_all_workflow_hooks_blocking(
        &self,
        layout: &Layout,
    ) -> Result<Vec<WorkflowHooks>, PluginError> {
        let drivers = self.load_drivers_blocking()?;
        collect_workflow_hooks(&drivers, layout)
    }

    /// Aggregate runtime contributions from every driver extending the
    /// runtime lifecycle, in manifest declaration order.
    pub async fn load_all_runtime_contributions(
        &self,
    ) -> Result<Vec<RuntimeContributions>, PluginError> {
        let drivers = self.load_drivers().await?;
        collect_runtime_contributions(&drivers)
    }

    /// Blocking twin of [`PluginLoader::load_all_runtime_contributions`].
    pub fn load_all_runtime_contributions_blocking(
        &self,
    ) -> Result<Vec<RuntimeContributions>, PluginError> {
        let drivers = self.load_drivers_blocking()?;
        collect_runtime_contributions(&drivers)
    }

    fn drivers_from(&self, manifest: &ProjectManifest) -> Result<Vec<Driver>, PluginError> {
        let dependencies = manifest.plugin_dependencies();
        reject_name_collisions(&dependencies)?;

        let mut drivers = Vec::with_capacity(dependencies.len());
        for dep in &dependencies {
            drivers.push(self.instantiate(dep)?);
        }

        debug!(count = drivers.len(), "loaded plugin drivers");
        Ok(drivers)
    }

    /// Resolve, validate, and instantiate one plugin.
    ///
    /// This is the trust boundary for third-party code: each step has its
    /// own error variant and any failure aborts the whole load.
    fn instantiate(&self, dep: &PluginDependency) -> Result<Driver, PluginError> {
        let exports = self
            .resolver
            .resolve(&dep.package)
            .map_err(|e| PluginError::resolution_failed(&dep.name, &dep.package, &e))?;

        let creator = exports
            .create()
            .ok_or_else(|| PluginError::missing_create_export(&dep.name, &dep.package))?;

        let driver = creator
            .instantiate(&dep.name, Arc::clone(&self.host))
            .map_err(|e| PluginError::instantiation_failed(&dep.name, &e))?;

        debug!(
            plugin = %driver.name(),
            workflow = driver.extends_workflow(),
            runtime = driver.extends_runtime(),
            "loaded plugin driver"
        );

        Ok(driver)
    }
}

/// Two packages collapsing to one plugin name would make their diagnostics
/// indistinguishable, so reject the collision up front.
fn reject_name_collisions(dependencies: &[PluginDependency]) -> Result<(), PluginError> {
    let mut seen: HashMap<String, String> = HashMap::new();
    for dep in dependencies {
        if let Some(first) = seen.insert(dep.name.clone(), dep.package.clone()) {
            return Err(PluginError::DuplicateName {
                plugin: dep.name.clone(),
                first,
                second: dep.package.clone(),
            });
        }
    }
    Ok(())
}

/// Collect workflow hooks from already-loaded drivers, preserving order and
/// skipping drivers that do not extend the workflow lifecycle.
pub fn collect_workflow_hooks(
    drivers: &[Driver],
    layout: &Layout,
) -> Result<Vec<WorkflowHooks>, PluginError> {
    drivers
        .iter()
        .filter(|driver| driver.extends_workflow())
        .map(|driver| {
            driver
                .load_workflow_hooks(layout)
                .map_err(|e| PluginError::workflow_load_failed(driver.name(), &e))
        })
        .collect()
}

/// Collect runtime contributions from already-loaded drivers, preserving
/// order and skipping drivers that do not extend the runtime lifecycle.
pub fn collect_runtime_contributions(
    drivers: &[Driver],
) -> Result<Vec<RuntimeContributions>, PluginError> {
    let mut contributions = Vec::new();
    for driver in drivers.iter().filter(|driver| driver.extends_runtime()) {
        let loaded = driver
            .load_runtime_contributions()
            .map_err(|e| PluginError::runtime_load_failed(driver.name(), &e))?;
        if let Some(c) = loaded {
            contributions.push(c);
        }
    }
    Ok(contributions)
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use telaio_sdk::create;

    fn layout() -> Layout {
        Layout::new("/proj", "/proj/src", "/proj/target")
    }

    fn driver(name: &str, workflow: bool, runtime: bool) -> Driver {
        let creator = create(move |lens| {
            let plugin = lens.name().to_string();
            if workflow {
                lens.workflow(move |hooks, _ctx| {
                    hooks
                        .dev
                        .add_to_settings
                        .watch_file_patterns
                        .push(format!("./{plugin}/**/*"));
                    Ok(())
                });
            }
            if runtime {
                lens.runtime(|| Ok(RuntimeContributions::default()));
            }
            Ok(())
        });
        creator
            .instantiate(name, Arc::new(HostUtilities::default()))
            .unwrap()
    }

    #[test]
    fn workflow_collection_filters_and_preserves_order() {
        let drivers = vec![
            driver("a", true, false),
            driver("b", false, true),
            driver("c", true, true),
        ];
        let hooks = collect_workflow_hooks(&drivers, &layout()).unwrap();

        assert_eq!(hooks.len(), 2);
        assert_eq!(
            hooks[0].dev.add_to_settings.watch_file_patterns,
            vec!["./a/**/*".to_string()]
        );
        assert_eq!(
            hooks[1].dev.add_to_settings.watch_file_patterns,
            vec!["./c/**/*".to_string()]
        );
    }

    #[test]
    fn runtime_collection_filters_and_preserves_order() {
        let drivers = vec![
            driver("a", false, true),
            driver("b", true, false),
            driver("c", false, true),
        ];
        let contributions = collect_runtime_contributions(&drivers).unwrap();
        assert_eq!(contributions.len(), 2);
    }

    fn dependency(package: &str, name: &str) -> PluginDependency {
        PluginDependency {
            package: package.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn distinct_plugin_names_pass_the_collision_check() {
        let deps = vec![
            dependency("telaio-plugin-auth", "auth"),
            dependency("telaio-plugin-dotenv", "dotenv"),
        ];
        assert!(reject_name_collisions(&deps).is_ok());
    }

    #[test]
    fn colliding_plugin_names_are_rejected_naming_both_packages() {
        let deps = vec![
            dependency("telaio-plugin-auth", "auth"),
            dependency("vendored-telaio-plugin-auth", "auth"),
        ];

        let err = reject_name_collisions(&deps).unwrap_err();
        assert!(matches!(err, PluginError::DuplicateName { .. }));
        assert_eq!(err.plugin(), "auth");
        let msg = err.to_string();
        assert!(msg.contains("telaio-plugin-auth"));
        assert!(msg.contains("vendored-telaio-plugin-auth"));
    }

    #[test]
    fn failing_workflow_definer_fails_the_collection() {
        let creator = create(|lens| {
            lens.workflow(|_hooks, _ctx| anyhow::bail!("watch pattern conflict"));
            Ok(())
        });
        let bad = creator
            .instantiate("flaky", Arc::new(HostUtilities::default()))
            .unwrap();
        let drivers = vec![driver("a", true, false), bad];

        let err = collect_workflow_hooks(&drivers, &layout()).unwrap_err();
        assert!(matches!(err, PluginError::WorkflowLoadFailed { .. }));
        assert_eq!(err.plugin(), "flaky");
        assert!(err.to_string().contains("watch pattern conflict"));
    }

    #[test]
    fn failing_runtime_producer_fails_the_collection() {
        let creator = create(|lens| {
            lens.runtime(|| anyhow::bail!("schema conflict"));
            Ok(())
        });
        let bad = creator
            .instantiate("flaky", Arc::new(HostUtilities::default()))
            .unwrap();

        let err = collect_runtime_contributions(&[bad]).unwrap_err();
        assert!(matches!(err, PluginError::RuntimeLoadFailed { .. }));
        assert!(err.to_string().contains("schema conflict"));
    }
}
