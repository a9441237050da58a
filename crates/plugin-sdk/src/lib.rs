//! Telaio Plugin SDK
//!
//! Types, traits, and the `create()` helper for Telaio plugins.
//! Plugin packages depend on this crate and export a creation capability
//! built with [`create`]; the kernel discovers the package through the
//! project manifest and turns that capability into a [`Driver`].

pub mod driver;
pub mod host;
pub mod runtime;
pub mod workflow;

pub use driver::{Driver, DriverCreator, Lens, create};

pub mod prelude {
    pub use crate::driver::{Driver, DriverCreator, Lens, create};
    pub use crate::host::{
        AsyncCommandRunner, CommandOutput, CommandRunner, DebugChannel, HostUtilities, PluginLog,
        Prompter,
    };
    pub use crate::runtime::{
        ContextContribution, ContextField, RuntimeContributions, SchemaContribution,
        SchemaExtension,
    };
    pub use crate::workflow::{DevSettings, Layout, WorkflowContext, WorkflowHooks};
}
