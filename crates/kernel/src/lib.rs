//! Telaio Kernel Library
//!
//! Plugin discovery and lifecycle composition for the Telaio scaffolding
//! tool: scans the project manifest for packages following the plugin
//! naming convention, instantiates each as a driver, and aggregates the
//! workflow hooks and runtime contributions the drivers expose. The host
//! binary drives these APIs; this crate never starts the dev loop or the
//! produced application itself.

pub mod config;
pub mod manifest;
pub mod plugin;
