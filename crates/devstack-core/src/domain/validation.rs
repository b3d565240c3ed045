use tracing::debug;

use crate::domain::{
    catalog::ServiceCatalog,
    config::UserConfig,
    error::{DomainError, Violation},
};

/// Centralized semantic validation of a user configuration against the
/// catalog.
///
/// Pure check: no I/O, no mutation, no auto-correction. Violations are
/// collected in order and reported together — never one at a time.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate `config` against `catalog`.
    ///
    /// Returns `Ok(())` or a [`DomainError::InvalidConfig`] carrying every
    /// violation found. An empty `enabled` list is valid; a missing
    /// `services` section is not.
    pub fn validate(config: &UserConfig, catalog: &ServiceCatalog) -> Result<(), DomainError> {
        let mut violations = Vec::new();

        if let Err(v) = Self::check_project_name(&config.project.name) {
            violations.push(v);
        }

        match config.enabled() {
            None => violations.push(Violation::MissingServicesSection),
            Some(enabled) => {
                let unknown = Self::collect_unknown(enabled, catalog);
                if !unknown.is_empty() {
                    violations.push(Violation::UnknownServices { names: unknown });
                }
            }
        }

        if violations.is_empty() {
            debug!(
                services = config.enabled().map(|e| e.len()).unwrap_or(0),
                "configuration validated"
            );
            Ok(())
        } else {
            Err(DomainError::InvalidConfig { violations })
        }
    }

    /// All enabled identifiers absent from the catalog, first occurrence
    /// order, de-duplicated.
    fn collect_unknown(enabled: &[String], catalog: &ServiceCatalog) -> Vec<String> {
        let mut unknown: Vec<String> = Vec::new();
        for name in enabled {
            if !catalog.contains(name) && !unknown.iter().any(|n| n == name) {
                unknown.push(name.clone());
            }
        }
        unknown
    }

    fn check_project_name(name: &str) -> Result<(), Violation> {
        if name.trim().is_empty() {
            return Err(Violation::InvalidProjectName {
                name: name.into(),
                reason: "name cannot be empty".into(),
            });
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Violation::InvalidProjectName {
                name: name.into(),
                reason: "only alphanumeric characters, '-' and '_' are allowed".into(),
            });
        }
        Ok(())
    }
}
