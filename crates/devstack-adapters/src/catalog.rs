//! The built-in service catalog, embedded at compile time.
//!
//! The catalog is a structured YAML document compiled into the binary and
//! parsed fresh on every invocation — read-only at run time, never mutated,
//! never written back.

use devstack_core::domain::ServiceCatalog;
use devstack_core::error::{DevstackError, DevstackResult};
use tracing::debug;

/// Embedded catalog document.
const BUILTIN_CATALOG: &str = include_str!("../assets/services.yaml");

/// Loader for the embedded catalog.
pub struct BuiltinCatalog;

impl BuiltinCatalog {
    /// Parse and validate the embedded catalog.
    pub fn load() -> DevstackResult<ServiceCatalog> {
        Self::parse(BUILTIN_CATALOG)
    }

    /// Parse a catalog document from YAML text.
    pub fn parse(text: &str) -> DevstackResult<ServiceCatalog> {
        let catalog: ServiceCatalog =
            serde_yaml::from_str(text).map_err(|e| DevstackError::Internal {
                message: format!("built-in catalog is not valid YAML: {e}"),
            })?;
        catalog.validate()?;
        debug!(services = catalog.len(), "catalog loaded");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devstack_core::domain::ServiceKind;

    #[test]
    fn builtin_catalog_parses_and_validates() {
        let catalog = BuiltinCatalog::load().unwrap();
        assert!(!catalog.is_empty());
    }

    #[test]
    fn catalog_contains_the_core_databases() {
        let catalog = BuiltinCatalog::load().unwrap();
        for name in ["redis", "postgres", "mysql", "mongodb"] {
            assert!(catalog.contains(name), "missing catalog entry: {name}");
        }
    }

    #[test]
    fn kinds_drive_backup_capability() {
        let catalog = BuiltinCatalog::load().unwrap();
        assert_eq!(catalog.get("postgres").unwrap().kind, ServiceKind::Postgres);
        assert_eq!(catalog.get("kafka").unwrap().kind, ServiceKind::Generic);
        assert!(!catalog.get("jaeger").unwrap().kind.supports_backup());
    }

    #[test]
    fn every_entry_has_an_image_and_description() {
        let catalog = BuiltinCatalog::load().unwrap();
        for def in catalog.iter() {
            assert!(!def.image.is_empty(), "{} has no image", def.name);
            assert!(
                !def.docs.description.is_empty(),
                "{} has no description",
                def.name
            );
        }
    }

    #[test]
    fn postgres_defaults_match_the_official_image_keys() {
        let catalog = BuiltinCatalog::load().unwrap();
        let pg = catalog.get("postgres").unwrap();
        assert!(pg.env.iter().any(|e| e.key == "POSTGRES_USER"));
        assert!(pg.env.iter().any(|e| e.key == "POSTGRES_DB"));
        assert_eq!(pg.primary_port().unwrap().host, 5432);
    }

    #[test]
    fn malformed_catalog_text_is_rejected() {
        assert!(BuiltinCatalog::parse("services: [not: [valid").is_err());
    }
}
