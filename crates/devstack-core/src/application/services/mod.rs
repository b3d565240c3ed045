//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "apply the configuration" or "back up a
//! service".

pub mod apply_service;
pub mod lifecycle_service;

pub use apply_service::{ApplyOptions, ApplyOutcome, ApplyService, ArtifactPaths};
pub use lifecycle_service::{
    LifecycleService, ManifestService, OperationReport, ServiceStatus, StackContext,
};
