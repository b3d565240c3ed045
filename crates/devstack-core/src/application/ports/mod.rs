//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `devstack-adapters` implement
//! these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: file operations with all-or-nothing writes
//!   - `ManifestRenderer`: IR → manifest text (single serialization step)
//!   - `ContainerRuntime`: start/stop/status/exec-capture against the runtime
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    CapturedOutput, ContainerRuntime, FileMode, Filesystem, ManifestRenderer, StackRef,
};
