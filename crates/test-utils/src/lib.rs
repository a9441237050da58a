//! Telaio test utilities.
//!
//! Helpers for integration testing: an in-memory plugin resolver, manifest
//! fixtures on disk, and scripted/recording host utilities.

// Test-support crate: panicking on broken fixtures is the desired behavior.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow, bail};
use parking_lot::Mutex;
use tempfile::TempDir;

use telaio_kernel::plugin::{PackageExports, PluginResolver};
use telaio_sdk::DriverCreator;
use telaio_sdk::host::{AsyncCommandRunner, CommandOutput, CommandRunner, Prompter};

/// In-memory plugin resolver backed by a package map.
///
/// Packages can be present (with or without a create export), simulated as
/// broken at load time, or absent entirely.
#[derive(Default)]
pub struct StaticResolver {
    packages: HashMap<String, PackageExports>,
    broken: HashMap<String, String>,
}

impl StaticResolver {
    /// An empty resolver: every package is "not installed."
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package exporting the given creation capability.
    pub fn with_plugin(mut self, package: &str, creator: DriverCreator) -> Self {
        self.packages
            .insert(package.to_string(), PackageExports::with_create(creator));
        self
    }

    /// Register a package that resolves but exports no create capability.
    pub fn with_createless_package(mut self, package: &str) -> Self {
        self.packages
            .insert(package.to_string(), PackageExports::new());
        self
    }

    /// Register a package that fails at load time with the given message.
    pub fn with_broken_package(mut self, package: &str, details: &str) -> Self {
        self.broken
            .insert(package.to_string(), details.to_string());
        self
    }
}

impl PluginResolver for StaticResolver {
    fn resolve(&self, package: &str) -> Result<PackageExports> {
        if let Some(details) = self.broken.get(package) {
            bail!("{details}");
        }
        self.packages
            .get(package)
            .cloned()
            .ok_or_else(|| anyhow!("package '{package}' is not installed"))
    }
}

/// A manifest written to a temporary directory.
///
/// The directory lives as long as the fixture; keep it bound for the whole
/// test.
#[derive(Debug)]
pub struct ManifestFixture {
    dir: TempDir,
    path: PathBuf,
}

impl ManifestFixture {
    /// Path to the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path to the fixture's project directory.
    pub fn project_dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Write a `telaio.toml` declaring the given dependencies, in order.
pub fn manifest_file(dependencies: &[&str]) -> ManifestFixture {
    let mut content = String::from("name = \"fixture\"\n\n[dependencies]\n");
    for dep in dependencies {
        content.push_str(&format!("\"{dep}\" = \"*\"\n"));
    }

    let dir = tempfile::tempdir().expect("failed to create fixture dir");
    let path = dir.path().join("telaio.toml");
    std::fs::write(&path, content).expect("failed to write fixture manifest");

    ManifestFixture { dir, path }
}

/// Prompter that replays scripted answers.
#[derive(Default)]
pub struct ScriptedPrompter {
    confirms: Mutex<VecDeque<bool>>,
    inputs: Mutex<VecDeque<String>>,
}

impl ScriptedPrompter {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a confirmation answer.
    pub fn with_confirm(self, answer: bool) -> Self {
        self.confirms.lock().push_back(answer);
        self
    }

    /// Queue an input answer.
    pub fn with_input(self, answer: &str) -> Self {
        self.inputs.lock().push_back(answer.to_string());
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, message: &str) -> Result<bool> {
        self.confirms
            .lock()
            .pop_front()
            .ok_or_else(|| anyhow!("unscripted confirm: {message}"))
    }

    fn input(&self, message: &str) -> Result<String> {
        self.inputs
            .lock()
            .pop_front()
            .ok_or_else(|| anyhow!("unscripted input: {message}"))
    }
}

/// Command runner that records invocations and returns a fixed output.
#[derive(Default)]
pub struct RecordingRunner {
    invocations: Mutex<Vec<Vec<String>>>,
}

impl RecordingRunner {
    /// Create a runner with no recorded invocations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands run so far, each as `[program, args...]`.
    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.lock().clone()
    }

    fn record(&self, program: &str, args: &[&str]) -> CommandOutput {
        let mut invocation = vec![program.to_string()];
        invocation.extend(args.iter().map(|a| a.to_string()));
        self.invocations.lock().push(invocation);
        CommandOutput {
            status: 0,
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        Ok(self.record(program, args))
    }
}

#[async_trait::async_trait]
impl AsyncCommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        Ok(self.record(program, args))
    }
}
