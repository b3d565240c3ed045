// ============================================================================
// domain/error.rs - DOMAIN ERROR TYPES
// ============================================================================

use std::fmt;
use thiserror::Error;

use crate::error::ErrorCategory;

/// A single validation violation.
///
/// Violations are collected, never short-circuited: a rejected configuration
/// reports every problem it contains in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The configuration has no `services` section at all.
    ///
    /// Deliberately distinct from an empty `enabled` list, which is valid.
    MissingServicesSection,

    /// One or more enabled identifiers do not exist in the catalog.
    /// Carries every offending identifier, not just the first.
    UnknownServices { names: Vec<String> },

    /// The project name cannot be used to namespace generated resources.
    InvalidProjectName { name: String, reason: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingServicesSection => {
                write!(f, "missing 'services' section in configuration")
            }
            Self::UnknownServices { names } => {
                write!(f, "unknown services: {}", names.join(", "))
            }
            Self::InvalidProjectName { name, reason } => {
                write!(f, "invalid project name '{name}': {reason}")
            }
        }
    }
}

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for reporting across layers)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// The configuration failed semantic validation.
    ///
    /// Carries the full ordered violation list; the Display form names every
    /// offending identifier so callers never need to dig for details.
    #[error("invalid configuration: {}", format_violations(.violations))]
    InvalidConfig { violations: Vec<Violation> },

    /// A service identifier was not found in the catalog at resolution time.
    ///
    /// Reachable only when validation was explicitly skipped; the resolver
    /// still refuses to guess.
    #[error("unknown services: {}", .names.join(", "))]
    UnknownServices { names: Vec<String> },

    /// A catalog entry is malformed (bad port binding, empty image, ...).
    #[error("invalid catalog entry for '{service}': {reason}")]
    InvalidCatalogEntry { service: String, reason: String },

    /// A value failed to parse into a domain type.
    #[error("invalid {what}: '{value}': {reason}")]
    InvalidValue {
        what: &'static str,
        value: String,
        reason: String,
    },
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidConfig { violations } => {
                let mut out = Vec::new();
                for v in violations {
                    match v {
                        Violation::MissingServicesSection => {
                            out.push("Add a 'services:' section with an 'enabled:' list".into());
                            out.push("Run 'devstack init' to see a complete example".into());
                        }
                        Violation::UnknownServices { names } => {
                            out.push(format!("Not in the catalog: {}", names.join(", ")));
                            out.push("Run 'devstack list' to see supported services".into());
                        }
                        Violation::InvalidProjectName { .. } => {
                            out.push(
                                "Use lowercase letters, digits, hyphens, and underscores".into(),
                            );
                        }
                    }
                }
                out
            }
            Self::UnknownServices { names } => vec![
                format!("Not in the catalog: {}", names.join(", ")),
                "Run 'devstack list' to see supported services".into(),
            ],
            Self::InvalidCatalogEntry { .. } => vec![
                "The built-in catalog appears corrupted".into(),
                "Please report this issue".into(),
            ],
            Self::InvalidValue { .. } => vec!["Check the value format and try again".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfig { .. } | Self::InvalidValue { .. } => ErrorCategory::Validation,
            Self::UnknownServices { .. } => ErrorCategory::Validation,
            Self::InvalidCatalogEntry { .. } => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_message_names_every_unknown_service() {
        let err = DomainError::InvalidConfig {
            violations: vec![Violation::UnknownServices {
                names: vec!["not_a_real_service".into(), "fake_service".into()],
            }],
        };
        let msg = err.to_string();
        assert!(msg.contains("not_a_real_service"));
        assert!(msg.contains("fake_service"));
    }

    #[test]
    fn missing_section_violation_is_distinct_from_unknown() {
        let missing = Violation::MissingServicesSection;
        let unknown = Violation::UnknownServices { names: vec!["x".into()] };
        assert_ne!(missing, unknown);
        assert!(missing.to_string().contains("services"));
    }

    #[test]
    fn unknown_services_suggests_catalog_listing() {
        let err = DomainError::UnknownServices { names: vec!["foo".into()] };
        assert!(err.suggestions().iter().any(|s| s.contains("devstack list")));
    }
}
