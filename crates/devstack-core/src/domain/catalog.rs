//! The service catalog: the static registry of supported services.
//!
//! The catalog is loaded fresh on every invocation from a structured YAML
//! document (see `devstack-adapters`), is immutable afterwards, and is never
//! treated as configuration: it only describes the *default shape* of every
//! supported service.

use serde::Deserialize;

use crate::domain::error::DomainError;
use crate::domain::service::{EnvVar, PortBinding, ServiceKind, VolumeMount};

// ── ServiceDefinition ────────────────────────────────────────────────────────

/// One catalog entry: the default shape of a supported service.
///
/// Immutable once loaded. Overrides never mutate a definition; they are
/// merged into a separate [`ResolvedServiceSpec`](crate::domain::resolve::ResolvedServiceSpec).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceDefinition {
    /// Unique identifier, e.g. `"redis"`. Also the manifest service name.
    pub name: String,

    /// Backup-relevant family. Defaults to `generic`.
    #[serde(default)]
    pub kind: ServiceKind,

    /// Default image reference.
    pub image: String,

    /// Default host:container port bindings, ordered. The first entry is the
    /// service's primary port.
    #[serde(default)]
    pub ports: Vec<PortBinding>,

    /// Default named volumes.
    #[serde(default)]
    pub volumes: Vec<VolumeMount>,

    /// Default container environment template, ordered.
    #[serde(default)]
    pub env: Vec<EnvVar>,

    /// Free-form option list.
    #[serde(default)]
    pub options: Vec<String>,

    /// Documentation metadata, consumed by `devstack list` and the docs
    /// generator.
    #[serde(default)]
    pub docs: ServiceDocs,
}

impl ServiceDefinition {
    /// Validate internal consistency of a loaded entry.
    pub fn validate(&self) -> Result<(), DomainError> {
        let invalid = |reason: &str| DomainError::InvalidCatalogEntry {
            service: self.name.clone(),
            reason: reason.into(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("empty service name"));
        }
        if !self
            .name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(invalid(
                "name must be lowercase alphanumeric with '-' or '_'",
            ));
        }
        if self.image.trim().is_empty() {
            return Err(invalid("empty image reference"));
        }
        Ok(())
    }

    /// The primary (first) port binding, if the service exposes one.
    pub fn primary_port(&self) -> Option<PortBinding> {
        self.ports.first().copied()
    }
}

/// Documentation metadata attached to a catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceDocs {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub usage_notes: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

// ── ServiceCatalog ───────────────────────────────────────────────────────────

/// The full ordered registry of supported services.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceCatalog {
    services: Vec<ServiceDefinition>,
}

impl ServiceCatalog {
    /// Build a catalog from loaded definitions, rejecting duplicates and
    /// malformed entries.
    pub fn new(services: Vec<ServiceDefinition>) -> Result<Self, DomainError> {
        let catalog = Self { services };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check every entry and the uniqueness invariant.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = std::collections::BTreeSet::new();
        for def in &self.services {
            def.validate()?;
            if !seen.insert(def.name.as_str()) {
                return Err(DomainError::InvalidCatalogEntry {
                    service: def.name.clone(),
                    reason: "duplicate catalog entry".into(),
                });
            }
        }
        Ok(())
    }

    /// Look up a definition by identifier.
    pub fn get(&self, name: &str) -> Option<&ServiceDefinition> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All identifiers, in catalog order.
    pub fn names(&self) -> Vec<&str> {
        self.services.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceDefinition> {
        self.services.iter()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
