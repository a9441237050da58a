//! Driver construction: `create()`, the registration lens, and the driver.
//!
//! A plugin package exports a creation capability built with [`create`].
//! The kernel applies the resulting [`DriverCreator`] to the plugin's
//! canonical name, which runs the plugin's defining function exactly once
//! against a fresh [`Lens`]. Registrations land in an explicit builder and
//! are snapshotted immutably when the definer returns; the [`Driver`]'s two
//! loaders only ever read that snapshot, so calling them repeatedly is safe.

use std::fmt;
use std::sync::Arc;

use anyhow::{Result, bail};
use tracing::debug;

use crate::host::{
    AsyncCommandRunner, CommandRunner, DebugChannel, HostUtilities, PluginLog, Prompter,
};
use crate::runtime::{RuntimeContributions, RuntimeProducer};
use crate::workflow::{Layout, WorkflowContext, WorkflowDefiner, WorkflowHooks};

/// A plugin's defining function, invoked once per driver instantiation.
pub type Definer = dyn Fn(&mut Lens<'_>) -> Result<()> + Send + Sync;

/// Wrap a defining function into a creation capability.
///
/// This is the only constructor a plugin author uses; the driver shape is
/// never built by hand.
pub fn create<F>(definer: F) -> DriverCreator
where
    F: Fn(&mut Lens<'_>) -> Result<()> + Send + Sync + 'static,
{
    DriverCreator {
        definer: Arc::new(definer),
    }
}

/// The creation capability a plugin package exports: a function from a
/// canonical plugin name to a [`Driver`].
#[derive(Clone)]
pub struct DriverCreator {
    definer: Arc<Definer>,
}

impl DriverCreator {
    /// Instantiate a driver bound to the given plugin name.
    ///
    /// Runs the defining function once. Fails if the definer itself fails
    /// or registers the same lifecycle more than once.
    pub fn instantiate(&self, name: &str, host: Arc<HostUtilities>) -> Result<Driver> {
        let mut builder = RegistrationBuilder::default();
        {
            let mut lens = Lens {
                plugin_name: name,
                host: &host,
                builder: &mut builder,
            };
            (self.definer)(&mut lens)?;
        }
        let registrations = builder.snapshot(name)?;

        debug!(
            plugin = %name,
            workflow = registrations.workflow.is_some(),
            runtime = registrations.runtime.is_some(),
            "instantiated plugin driver"
        );

        Ok(Driver {
            name: name.to_string(),
            registrations,
        })
    }
}

impl fmt::Debug for DriverCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverCreator").finish_non_exhaustive()
    }
}

/// Accumulates at most one workflow definer and one runtime producer while
/// the defining function runs.
#[derive(Default)]
struct RegistrationBuilder {
    workflow: Option<Arc<WorkflowDefiner>>,
    runtime: Option<Arc<RuntimeProducer>>,
    duplicates: Vec<&'static str>,
}

impl RegistrationBuilder {
    fn set_workflow(&mut self, definer: Arc<WorkflowDefiner>) {
        if self.workflow.is_some() {
            self.record_duplicate("workflow");
            return;
        }
        self.workflow = Some(definer);
    }

    fn set_runtime(&mut self, producer: Arc<RuntimeProducer>) {
        if self.runtime.is_some() {
            self.record_duplicate("runtime");
            return;
        }
        self.runtime = Some(producer);
    }

    fn record_duplicate(&mut self, lifecycle: &'static str) {
        if !self.duplicates.contains(&lifecycle) {
            self.duplicates.push(lifecycle);
        }
    }

    /// Freeze the registrations. A doubly registered lifecycle is an error,
    /// not a silent last-write-wins; the diagnostic names every lifecycle
    /// the definer registered more than once.
    fn snapshot(self, plugin: &str) -> Result<Registrations> {
        if !self.duplicates.is_empty() {
            let lifecycles = self
                .duplicates
                .iter()
                .map(|lifecycle| format!("'{lifecycle}'"))
                .collect::<Vec<_>>()
                .join(" and ");
            bail!("plugin '{plugin}': {lifecycles} registered more than once");
        }
        Ok(Registrations {
            workflow: self.workflow,
            runtime: self.runtime,
        })
    }
}

/// Immutable snapshot of what a plugin registered.
struct Registrations {
    workflow: Option<Arc<WorkflowDefiner>>,
    runtime: Option<Arc<RuntimeProducer>>,
}

/// Registration surface passed to a plugin's defining function.
///
/// Single-use: valid only for the duration of that call.
pub struct Lens<'a> {
    plugin_name: &'a str,
    host: &'a HostUtilities,
    builder: &'a mut RegistrationBuilder,
}

impl Lens<'_> {
    /// The plugin's canonical name.
    pub fn name(&self) -> &str {
        self.plugin_name
    }

    /// Register the plugin's workflow definer.
    pub fn workflow<F>(&mut self, definer: F)
    where
        F: Fn(&mut WorkflowHooks, &WorkflowContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.builder.set_workflow(Arc::new(definer));
    }

    /// Register the plugin's runtime producer.
    pub fn runtime<F>(&mut self, producer: F)
    where
        F: Fn() -> Result<RuntimeContributions> + Send + Sync + 'static,
    {
        self.builder.set_runtime(Arc::new(producer));
    }

    /// Structured log handle namespaced by this plugin's name.
    pub fn log(&self) -> PluginLog {
        PluginLog::new(self.plugin_name)
    }

    /// Debug channel namespaced by this plugin's name.
    pub fn debug(&self) -> DebugChannel {
        DebugChannel::new(self.plugin_name)
    }

    /// Synchronous command runner supplied by the host.
    pub fn runner(&self) -> Arc<dyn CommandRunner> {
        Arc::clone(&self.host.runner)
    }

    /// Asynchronous command runner supplied by the host.
    pub fn runner_async(&self) -> Arc<dyn AsyncCommandRunner> {
        Arc::clone(&self.host.runner_async)
    }

    /// Interactive prompter supplied by the host.
    pub fn prompter(&self) -> Arc<dyn Prompter> {
        Arc::clone(&self.host.prompter)
    }
}

/// One loaded plugin: capability flags plus lazy lifecycle loaders.
pub struct Driver {
    name: String,
    registrations: Registrations,
}

impl Driver {
    /// The plugin's canonical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the plugin registered a workflow definer.
    pub fn extends_workflow(&self) -> bool {
        self.registrations.workflow.is_some()
    }

    /// Whether the plugin registered a runtime producer.
    pub fn extends_runtime(&self) -> bool {
        self.registrations.runtime.is_some()
    }

    /// Materialize the plugin's workflow hooks.
    ///
    /// Builds the fully shaped default record and hands it to the
    /// registered workflow definer, if any, along with a context holding
    /// the project layout. Without a registered definer the untouched
    /// default record is returned.
    pub fn load_workflow_hooks(&self, layout: &Layout) -> Result<WorkflowHooks> {
        let mut hooks = WorkflowHooks::default();
        if let Some(definer) = &self.registrations.workflow {
            let context = WorkflowContext { layout };
            definer(&mut hooks, &context)?;
        }
        Ok(hooks)
    }

    /// Materialize the plugin's runtime contributions, or `None` when no
    /// runtime producer was registered.
    pub fn load_runtime_contributions(&self) -> Result<Option<RuntimeContributions>> {
        match &self.registrations.runtime {
            Some(producer) => Ok(Some(producer()?)),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("name", &self.name)
            .field("extends_workflow", &self.extends_workflow())
            .field("extends_runtime", &self.extends_runtime())
            .finish()
    }
}
