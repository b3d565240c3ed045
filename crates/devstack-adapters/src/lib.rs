//! Infrastructure adapters for Devstack.
//!
//! This crate implements the ports defined in
//! `devstack-core::application::ports`. It contains all external
//! dependencies and I/O operations: YAML parsing, filesystem access, and
//! process execution against the container runtime.

pub mod catalog;
pub mod config_loader;
pub mod filesystem;
pub mod manifest;
pub mod renderer;
pub mod runtime;

// Re-export commonly used adapters
pub use catalog::BuiltinCatalog;
pub use config_loader::{CONFIG_ENV_VAR, ConfigLoader, DEFAULT_CONFIG_FILE, SAMPLE_CONFIG};
pub use filesystem::LocalFilesystem;
pub use manifest::load_stack;
pub use renderer::ComposeRenderer;
pub use runtime::DockerComposeRuntime;
