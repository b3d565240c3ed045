//! The resolver/merger: catalog defaults ⊕ per-service overrides.
//!
//! # Merge policy
//!
//! Field-granular, override wins: for each field of a catalog definition, an
//! override value replaces the default *for that field only*. Overriding a
//! port never disturbs default volumes. Unknown override keys are carried
//! verbatim into the resolved option set. Duplicate enabled entries collapse
//! to one spec; overrides for services that are not enabled are ignored.
//! Both conditions surface as suppressible warnings, never errors.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::domain::{
    catalog::{ServiceCatalog, ServiceDefinition},
    config::{ServiceOverride, UserConfig},
    error::DomainError,
    service::{EnvVar, PortBinding, ServiceKind, VolumeMount},
};

// ── ResolvedServiceSpec ──────────────────────────────────────────────────────

/// The fully merged, null-free specification for one enabled service.
///
/// Invariant: every field has a defined value after resolution. Absent
/// overrides fall back to catalog defaults deterministically.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedServiceSpec {
    pub name: String,
    pub kind: ServiceKind,
    pub image: String,
    pub ports: Vec<PortBinding>,
    pub volumes: Vec<VolumeMount>,
    pub env: Vec<EnvVar>,
    pub options: Vec<String>,
    /// `None` means "no limit", which is itself a defined value.
    pub memory_limit: Option<String>,
}

impl ResolvedServiceSpec {
    /// The primary host port, if the service exposes one.
    pub fn primary_host_port(&self) -> Option<u16> {
        self.ports.first().map(|p| p.host)
    }

    /// Value of an environment variable in the resolved template.
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }
}

// ── Warnings ─────────────────────────────────────────────────────────────────

/// Non-fatal resolution findings, surfaced unless warnings are suppressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionWarning {
    /// The same identifier appears more than once in `enabled`.
    DuplicateEnabled { name: String },
    /// An override exists for a service that is not enabled.
    OverrideForDisabled { name: String },
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateEnabled { name } => {
                write!(f, "service '{name}' is enabled more than once; using one instance")
            }
            Self::OverrideForDisabled { name } => {
                write!(f, "override for '{name}' ignored: service is not enabled")
            }
        }
    }
}

/// The result of resolving a validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionOutcome {
    /// One spec per distinct enabled identifier, in `enabled` order.
    pub specs: Vec<ResolvedServiceSpec>,
    pub warnings: Vec<ResolutionWarning>,
}

// ── Resolution ───────────────────────────────────────────────────────────────

/// Resolve a configuration into one spec per distinct enabled service.
///
/// Expects a validated config; if validation was explicitly skipped and an
/// unknown identifier slips through, resolution refuses with
/// [`DomainError::UnknownServices`] rather than guessing.
pub fn resolve(
    config: &UserConfig,
    catalog: &ServiceCatalog,
) -> Result<ResolutionOutcome, DomainError> {
    let enabled = config.enabled().unwrap_or(&[]);
    let mut warnings = Vec::new();

    // Collapse duplicates, preserving first-occurrence order.
    let mut distinct: Vec<String> = Vec::new();
    for name in enabled {
        if distinct.iter().any(|n| n == name) {
            warnings.push(ResolutionWarning::DuplicateEnabled { name: name.clone() });
        } else {
            distinct.push(name.clone());
        }
    }

    // Refuse unknown identifiers even when validation was skipped.
    let unknown: Vec<String> = distinct
        .iter()
        .filter(|n| !catalog.contains(n.as_str()))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(DomainError::UnknownServices { names: unknown });
    }

    // Overrides for services that are not enabled are tolerated and ignored.
    for name in config.overrides.keys() {
        if !distinct.iter().any(|n| n == name) {
            warnings.push(ResolutionWarning::OverrideForDisabled { name: name.clone() });
        }
    }

    let specs = distinct
        .iter()
        .map(|name| {
            let def = catalog.get(name).expect("membership checked above");
            merge(def, config.overrides.get(name.as_str()))
        })
        .collect();

    debug!(
        enabled = enabled.len(),
        resolved = distinct.len(),
        warnings = warnings.len(),
        "configuration resolved"
    );

    Ok(ResolutionOutcome { specs, warnings })
}

/// Merge one definition with its (possibly absent) override, field by field.
fn merge(def: &ServiceDefinition, over: Option<&ServiceOverride>) -> ResolvedServiceSpec {
    let mut spec = ResolvedServiceSpec {
        name: def.name.clone(),
        kind: def.kind,
        image: def.image.clone(),
        ports: def.ports.clone(),
        volumes: def.volumes.clone(),
        env: def.env.clone(),
        options: def.options.clone(),
        memory_limit: None,
    };

    let Some(over) = over else {
        return spec;
    };

    if let Some(port) = over.port {
        match spec.ports.first_mut() {
            Some(primary) => *primary = primary.with_host(port),
            // A port override on a service with no default binding exposes
            // the same port on both sides.
            None => spec.ports.push(PortBinding::new(port, port)),
        }
    }

    if let Some(memory) = &over.memory {
        spec.memory_limit = Some(memory.clone());
    }

    apply_credential(&mut spec, def.kind.username_env_key(), over.username.as_deref(), "username");
    apply_credential(&mut spec, def.kind.password_env_key(), over.password.as_deref(), "password");
    apply_credential(&mut spec, def.kind.database_env_key(), over.database.as_deref(), "database");

    // Unknown override keys ride along verbatim as options.
    for (key, value) in &over.extra {
        spec.options.push(format!("{key}={value}"));
    }

    spec
}

/// Set a credential env var through the kind-specific key, or fall back to
/// the option list when the kind has no such key.
fn apply_credential(
    spec: &mut ResolvedServiceSpec,
    env_key: Option<&'static str>,
    value: Option<&str>,
    label: &str,
) {
    let Some(value) = value else { return };
    match env_key {
        Some(key) => set_env(&mut spec.env, key, value),
        None => spec.options.push(format!("{label}={value}")),
    }
}

/// Replace an existing env entry in place, or append while preserving
/// template order.
fn set_env(env: &mut Vec<EnvVar>, key: &str, value: &str) {
    match env.iter_mut().find(|e| e.key == key) {
        Some(entry) => entry.value = value.into(),
        None => env.push(EnvVar::new(key, value)),
    }
}
