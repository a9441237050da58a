//! Workflow lifecycle types.
//!
//! The workflow lifecycle covers the host tool's own phases: project
//! creation, the dev loop, code generation, and build. A plugin's workflow
//! definer receives a fully shaped [`WorkflowHooks`] record and mutates the
//! phases it cares about; the record always carries all four phases so
//! consumers never have to check for missing keys.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;

/// Read-only handle to the project's directory structure.
///
/// Supplied by the host tool; plugins receive it through the
/// [`WorkflowContext`] and must not mutate the directories it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    project_root: PathBuf,
    source_root: PathBuf,
    build_output: PathBuf,
}

impl Layout {
    /// Create a layout rooted at the given project directory.
    pub fn new(
        project_root: impl Into<PathBuf>,
        source_root: impl Into<PathBuf>,
        build_output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            source_root: source_root.into(),
            build_output: build_output.into(),
        }
    }

    /// The project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// The directory containing the project's source files.
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// The directory build artifacts are written to.
    pub fn build_output(&self) -> &Path {
        &self.build_output
    }
}

/// Context handed to workflow definers and phase hooks.
#[derive(Debug, Clone, Copy)]
pub struct WorkflowContext<'a> {
    /// The project layout, read-only from the plugin's perspective.
    pub layout: &'a Layout,
}

/// A hook attached to a workflow phase.
pub type PhaseHook = Box<dyn Fn(&WorkflowContext<'_>) -> Result<()> + Send + Sync>;

/// A hook invoked for each file-watcher event during the dev loop.
pub type WatcherHook = Box<dyn Fn(&Path) -> Result<()> + Send + Sync>;

/// A plugin's workflow definer: mutates the hook record it is handed.
pub type WorkflowDefiner =
    dyn Fn(&mut WorkflowHooks, &WorkflowContext<'_>) -> Result<()> + Send + Sync;

/// Hooks for every workflow phase.
///
/// Always fully shaped: all four phases are present even when the plugin
/// registered nothing, with absent hooks as `None` rather than missing keys.
#[derive(Default)]
pub struct WorkflowHooks {
    /// Project-creation phase.
    pub create: CreateHooks,
    /// Dev-loop phase.
    pub dev: DevHooks,
    /// Code-generation phase.
    pub generate: GenerateHooks,
    /// Build phase.
    pub build: BuildHooks,
}

/// Hooks for the project-creation phase.
#[derive(Default)]
pub struct CreateHooks {
    /// Runs after the host tool has scaffolded the base project.
    pub on_after_base_setup: Option<PhaseHook>,
}

/// Hooks and settings for the dev-loop phase.
#[derive(Default)]
pub struct DevHooks {
    /// Runs when the dev loop starts.
    pub on_start: Option<PhaseHook>,
    /// Runs for every file-watcher event.
    pub on_file_watcher_event: Option<WatcherHook>,
    /// Settings the plugin contributes to the dev loop.
    pub add_to_settings: DevSettings,
}

/// Hooks for the code-generation phase.
#[derive(Default)]
pub struct GenerateHooks {
    /// Runs when generation starts.
    pub on_start: Option<PhaseHook>,
}

/// Hooks for the build phase.
#[derive(Default)]
pub struct BuildHooks {
    /// Runs when the build starts.
    pub on_start: Option<PhaseHook>,
}

/// File-watcher settings contributed by a plugin's dev hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevSettings {
    /// Glob patterns the file watcher should additionally watch.
    pub watch_file_patterns: Vec<String>,
    /// Glob patterns the file watcher should ignore.
    pub ignore_file_patterns: Vec<String>,
}

impl fmt::Debug for WorkflowHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowHooks")
            .field("create.on_after_base_setup", &self.create.on_after_base_setup.is_some())
            .field("dev.on_start", &self.dev.on_start.is_some())
            .field(
                "dev.on_file_watcher_event",
                &self.dev.on_file_watcher_event.is_some(),
            )
            .field("dev.add_to_settings", &self.dev.add_to_settings)
            .field("generate.on_start", &self.generate.on_start.is_some())
            .field("build.on_start", &self.build.on_start.is_some())
            .finish()
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn default_hooks_are_fully_shaped() {
        let hooks = WorkflowHooks::default();
        assert!(hooks.create.on_after_base_setup.is_none());
        assert!(hooks.dev.on_start.is_none());
        assert!(hooks.dev.on_file_watcher_event.is_none());
        assert!(hooks.dev.add_to_settings.watch_file_patterns.is_empty());
        assert!(hooks.dev.add_to_settings.ignore_file_patterns.is_empty());
        assert!(hooks.generate.on_start.is_none());
        assert!(hooks.build.on_start.is_none());
    }

    #[test]
    fn layout_accessors() {
        let layout = Layout::new("/proj", "/proj/src", "/proj/target");
        assert_eq!(layout.project_root(), Path::new("/proj"));
        assert_eq!(layout.source_root(), Path::new("/proj/src"));
        assert_eq!(layout.build_output(), Path::new("/proj/target"));
    }

    #[test]
    fn debug_shows_which_hooks_are_set() {
        let mut hooks = WorkflowHooks::default();
        hooks.build.on_start = Some(Box::new(|_ctx: &WorkflowContext<'_>| Ok(())));
        let rendered = format!("{hooks:?}");
        assert!(rendered.contains("build.on_start: true"));
        assert!(rendered.contains("dev.on_start: false"));
    }
}
