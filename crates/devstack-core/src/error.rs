//! Unified error handling for Devstack Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::{ApplicationError, RuntimeError};
use crate::domain::DomainError;

/// Root error type for Devstack Core operations.
///
/// This enum wraps all possible errors that can occur when using
/// devstack-core, providing a unified interface for error handling.
#[derive(Debug, Error, Clone)]
pub enum DevstackError {
    /// Errors from the domain layer (business logic violations).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors (unreadable or unparsable input).
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl DevstackError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Run 'devstack init' to scaffold a fresh sample configuration".into(),
                "Check the YAML syntax of your configuration file".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Devstack".into(),
                "Please report this issue at: https://github.com/devstack-tools/devstack/issues"
                    .into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category(),
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Runtime,
    Configuration,
    Internal,
}

// Runtime failures bubble through the application layer.
impl From<RuntimeError> for DevstackError {
    fn from(e: RuntimeError) -> Self {
        Self::Application(ApplicationError::from(e))
    }
}

/// Convenient result type alias.
pub type DevstackResult<T> = Result<T, DevstackError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> DevstackResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> DevstackResult<T> {
        self.map_err(|e| DevstackError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
