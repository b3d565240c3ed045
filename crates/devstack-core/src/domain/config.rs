//! The operator's configuration: service selection plus overrides.
//!
//! # Design
//!
//! The serde model deliberately distinguishes a *missing* `services` section
//! (`None`) from an *empty* `enabled` list (`Some` with no entries): the
//! validator treats the former as a violation and the latter as a valid
//! "no services requested". Parsing happens in the adapters crate; this file
//! only defines the shape.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ── UserConfig ───────────────────────────────────────────────────────────────

/// Top-level user configuration document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub project: ProjectInfo,

    /// `None` means the section is absent — a validation violation, not an
    /// empty selection.
    #[serde(default)]
    pub services: Option<ServicesSection>,

    #[serde(default)]
    pub overrides: BTreeMap<String, ServiceOverride>,

    #[serde(default)]
    pub validation: ValidationFlags,
}

impl UserConfig {
    /// The enabled list, if the `services` section exists.
    pub fn enabled(&self) -> Option<&[String]> {
        self.services.as_ref().map(|s| s.enabled.as_slice())
    }

    pub fn skip_warnings(&self) -> bool {
        self.validation.skip_warnings
    }
}

/// Project metadata used to namespace generated resources.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectInfo {
    #[serde(default = "default_project_name")]
    pub name: String,

    /// Environment tag, e.g. `local`, `ci`. Informational.
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self {
            name: default_project_name(),
            environment: default_environment(),
        }
    }
}

fn default_project_name() -> String {
    "devstack".into()
}

fn default_environment() -> String {
    "local".into()
}

/// The `services` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServicesSection {
    /// Ordered service selection. Duplicates are tolerated and collapse
    /// during resolution.
    #[serde(default)]
    pub enabled: Vec<String>,
}

/// Validation behavior flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct ValidationFlags {
    /// Suppress non-fatal resolution warnings.
    #[serde(default)]
    pub skip_warnings: bool,
}

// ── ServiceOverride ──────────────────────────────────────────────────────────

/// A partial, per-service override record.
///
/// Every field is optional; the resolver merges field-by-field against the
/// catalog default. Keys the schema does not know are captured in `extra`
/// and carried through verbatim into the resolved option set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceOverride {
    /// Host-side port for the service's primary binding.
    pub port: Option<u16>,

    /// Container memory limit, e.g. `"512m"`.
    pub memory: Option<String>,

    pub username: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,

    /// Unknown keys, kept for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, ScalarValue>,
}

impl ServiceOverride {
    pub fn is_empty(&self) -> bool {
        self.port.is_none()
            && self.memory.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.database.is_none()
            && self.extra.is_empty()
    }
}

/// A scalar YAML value as it appears in an override record.
///
/// Keeps the domain model independent of any particular parser: the adapters
/// crate deserializes into this via serde's untagged representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_services_section() {
        let config = UserConfig::default();
        assert!(config.enabled().is_none());
        assert_eq!(config.project.name, "devstack");
        assert_eq!(config.project.environment, "local");
    }

    #[test]
    fn empty_enabled_is_distinct_from_missing_section() {
        let with_section = UserConfig {
            services: Some(ServicesSection::default()),
            ..Default::default()
        };
        assert_eq!(with_section.enabled(), Some(&[][..]));
        assert_eq!(UserConfig::default().enabled(), None);
    }

    #[test]
    fn empty_override_reports_empty() {
        assert!(ServiceOverride::default().is_empty());

        let with_port = ServiceOverride {
            port: Some(5432),
            ..Default::default()
        };
        assert!(!with_port.is_empty());
    }

    #[test]
    fn scalar_values_display_verbatim() {
        assert_eq!(ScalarValue::Int(5432).to_string(), "5432");
        assert_eq!(ScalarValue::Bool(true).to_string(), "true");
        assert_eq!(ScalarValue::String("abc".into()).to_string(), "abc");
    }
}
