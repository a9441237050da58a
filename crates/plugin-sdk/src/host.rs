//! Host utilities exposed to plugins through the lens.
//!
//! The host tool supplies these; plugins consume them and never construct
//! them. Command execution and prompting sit behind traits so the kernel's
//! tests can substitute recording or scripted implementations.

use std::process::Command;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;

/// Output of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Process exit code (-1 when terminated by signal).
    pub status: i32,
    /// Captured stdout, lossily decoded.
    pub stdout: String,
    /// Captured stderr, lossily decoded.
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the command exited with status 0.
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Synchronous command execution.
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion, capturing its output.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Asynchronous command execution.
#[async_trait]
pub trait AsyncCommandRunner: Send + Sync {
    /// Run a command to completion, capturing its output.
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Interactive prompting, supplied by the host's terminal layer.
pub trait Prompter: Send + Sync {
    /// Ask a yes/no question.
    fn confirm(&self, message: &str) -> Result<bool>;

    /// Ask for a line of input.
    fn input(&self, message: &str) -> Result<String>;
}

/// Default synchronous runner backed by `std::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to spawn '{program}'"))?;

        Ok(CommandOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Default asynchronous runner backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioRunner;

#[async_trait]
impl AsyncCommandRunner for TokioRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let output = tokio::process::Command::new(program)
            .args(args)
            .output()
            .await
            .with_context(|| format!("failed to spawn '{program}'"))?;

        Ok(CommandOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Prompter for non-interactive contexts: declines every confirmation and
/// refuses free-form input.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclineAllPrompter;

impl Prompter for DeclineAllPrompter {
    fn confirm(&self, _message: &str) -> Result<bool> {
        Ok(false)
    }

    fn input(&self, message: &str) -> Result<String> {
        bail!("input requested in a non-interactive context: {message}");
    }
}

/// Structured log handle namespaced by plugin name.
///
/// Events carry `plugin = <name>` so host log output attributes every line
/// to the plugin that emitted it.
#[derive(Debug, Clone)]
pub struct PluginLog {
    plugin: String,
}

impl PluginLog {
    /// Create a log handle for the given plugin.
    pub fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
        }
    }

    /// Emit an info event.
    pub fn info(&self, message: &str) {
        tracing::info!(plugin = %self.plugin, "{message}");
    }

    /// Emit a warning event.
    pub fn warn(&self, message: &str) {
        tracing::warn!(plugin = %self.plugin, "{message}");
    }

    /// Emit an error event.
    pub fn error(&self, message: &str) {
        tracing::error!(plugin = %self.plugin, "{message}");
    }
}

/// Debug channel namespaced by plugin name.
///
/// Events carry `plugin = <name>` so log filtering can isolate one plugin's
/// output.
#[derive(Debug, Clone)]
pub struct DebugChannel {
    namespace: String,
}

impl DebugChannel {
    /// Create a channel for the given namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// The channel's namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Emit a debug event on this channel.
    pub fn log(&self, message: &str) {
        tracing::debug!(plugin = %self.namespace, "{message}");
    }
}

/// Bundle of host-supplied utilities handed to plugins via the lens.
#[derive(Clone)]
pub struct HostUtilities {
    /// Synchronous command runner.
    pub runner: Arc<dyn CommandRunner>,
    /// Asynchronous command runner.
    pub runner_async: Arc<dyn AsyncCommandRunner>,
    /// Interactive prompting facility.
    pub prompter: Arc<dyn Prompter>,
}

impl Default for HostUtilities {
    fn default() -> Self {
        Self {
            runner: Arc::new(ShellRunner),
            runner_async: Arc::new(TokioRunner),
            prompter: Arc::new(DeclineAllPrompter),
        }
    }
}

impl std::fmt::Debug for HostUtilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostUtilities").finish_non_exhaustive()
    }
}
