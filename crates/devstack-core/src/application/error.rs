//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ServiceState;
use crate::error::ErrorCategory;

/// A failure talking to the container runtime.
///
/// Kept separate from [`ApplicationError`] because the runtime port returns
/// it directly; the lifecycle service attaches the service context.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// The runtime binary could not be invoked at all.
    #[error("container runtime unavailable: {message}")]
    Unavailable { message: String },

    /// The invocation exceeded its bounded timeout and was killed.
    #[error("container runtime call timed out after {seconds}s")]
    TimedOut { seconds: u64 },

    /// The invocation could not be driven (pipe/wait failure).
    #[error("container runtime I/O failure: {message}")]
    Io { message: String },
}

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A runtime failure, optionally scoped to one service of a batch.
    #[error("{source}")]
    Runtime {
        #[from]
        source: RuntimeError,
    },

    /// A lifecycle operation targeted a service the manifest does not know.
    #[error("unknown service '{service}': not present in the generated manifest")]
    UnknownService { service: String },

    /// No manifest has been generated yet.
    #[error("no generated manifest at {}; run 'devstack apply' first", .path.display())]
    ManifestMissing { path: PathBuf },

    /// The operation requires a running service.
    #[error("service '{service}' is not running")]
    ServiceNotRunning { service: String },

    /// The service kind has no backup procedure.
    #[error("service '{service}' ({kind}) does not support backup")]
    BackupNotSupported { service: String, kind: String },

    /// A failed service must be stopped before it can start again.
    #[error("service '{service}' is in a failed state; stop it before starting again")]
    FailedServiceNeedsStop { service: String },

    /// The requested transition is illegal from the current state.
    #[error("service '{service}' cannot {operation} while {state}")]
    InvalidTransition {
        service: String,
        operation: &'static str,
        state: ServiceState,
    },

    /// A restore artifact is absent.
    #[error("restore artifact not found: {}", .path.display())]
    ArtifactMissing { path: PathBuf },

    /// A restore artifact exists but is empty.
    #[error("restore artifact is empty: {}", .path.display())]
    ArtifactEmpty { path: PathBuf },

    /// A command inside a service container exited non-zero.
    #[error("command in service '{service}' exited with status {status}: {stderr}")]
    CommandFailed {
        service: String,
        status: i32,
        stderr: String,
    },

    /// Filesystem operation failed.
    #[error("filesystem error at {}: {reason}", .path.display())]
    FilesystemError { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Runtime { source } => match source {
                RuntimeError::Unavailable { .. } => vec![
                    "Check that the container runtime is installed and on PATH".into(),
                    "Check that the runtime daemon is running".into(),
                ],
                RuntimeError::TimedOut { .. } => vec![
                    "The runtime did not answer in time".into(),
                    "Raise the timeout in the devstack tool configuration".into(),
                ],
                RuntimeError::Io { .. } => {
                    vec!["Inspect the runtime daemon logs for details".into()]
                }
            },
            Self::UnknownService { service } => vec![
                format!("'{service}' is not part of the generated stack"),
                "Check 'services.enabled' in your configuration".into(),
                "Re-run 'devstack apply' after editing the configuration".into(),
            ],
            Self::ManifestMissing { .. } => vec![
                "Generate the stack artifacts first: devstack apply".into(),
            ],
            Self::ServiceNotRunning { service } => vec![
                format!("Start it first: devstack manage start {service}"),
            ],
            Self::BackupNotSupported { .. } => vec![
                "Only database services (postgres, mysql, redis, mongodb) can be backed up".into(),
            ],
            Self::FailedServiceNeedsStop { service } => vec![
                format!("Stop it first: devstack manage stop {service}"),
                format!("Then start again: devstack manage start {service}"),
            ],
            Self::InvalidTransition { .. } => vec![
                "Wait for the in-flight transition to settle, then retry".into(),
            ],
            Self::ArtifactMissing { path } => vec![
                format!("No file at {}", path.display()),
                "Check the artifact path; backups default to ./backups".into(),
            ],
            Self::ArtifactEmpty { .. } => vec![
                "The artifact contains no data; restore was not attempted".into(),
            ],
            Self::CommandFailed { .. } => vec![
                "Inspect the command output above".into(),
                "Check the service logs: devstack manage logs".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Runtime { .. }
            | Self::ServiceNotRunning { .. }
            | Self::FailedServiceNeedsStop { .. }
            | Self::InvalidTransition { .. }
            | Self::CommandFailed { .. } => ErrorCategory::Runtime,
            Self::UnknownService { .. } | Self::ArtifactMissing { .. } => ErrorCategory::NotFound,
            Self::ManifestMissing { .. } => ErrorCategory::Configuration,
            Self::BackupNotSupported { .. } | Self::ArtifactEmpty { .. } => {
                ErrorCategory::Validation
            }
            Self::FilesystemError { .. } => ErrorCategory::Internal,
        }
    }
}
