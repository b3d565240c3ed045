//! Application layer for Devstack.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ApplyService, LifecycleService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    ApplyOptions, ApplyOutcome, ApplyService, ArtifactPaths, LifecycleService, ManifestService,
    OperationReport, ServiceStatus, StackContext,
};

// Re-export port traits (for adapter implementation)
pub use ports::{CapturedOutput, ContainerRuntime, FileMode, Filesystem, ManifestRenderer, StackRef};

pub use error::{ApplicationError, RuntimeError};
