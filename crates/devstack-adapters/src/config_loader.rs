//! Discovery and parsing of the project configuration file.
//!
//! Resolution order for the config path (highest priority first):
//!
//! 1. An explicit `--config` path from the CLI
//! 2. The `DEVSTACK_CONFIG` environment variable
//! 3. `devstack.yaml` in the project root
//! 4. Alternate spellings (`devstack.yml`, `.devstack.yaml`, `.devstack.yml`)
//!
//! A file that exists but does not parse is a *structural* error, reported
//! as [`DevstackError::Configuration`] — a different failure class from
//! semantic validation, which happens later in the core.

use std::path::{Path, PathBuf};

use devstack_core::domain::UserConfig;
use devstack_core::error::{DevstackError, DevstackResult};
use tracing::debug;

/// Environment variable redirecting to an alternate config path.
pub const CONFIG_ENV_VAR: &str = "DEVSTACK_CONFIG";

/// Default configuration filename in the project root.
pub const DEFAULT_CONFIG_FILE: &str = "devstack.yaml";

const ALTERNATE_CONFIG_FILES: &[&str] = &["devstack.yml", ".devstack.yaml", ".devstack.yml"];

/// Sample configuration scaffolded by `devstack init`.
///
/// Must always parse and validate against the built-in catalog; a test
/// below keeps it honest.
pub const SAMPLE_CONFIG: &str = r#"# devstack configuration
#
# Select the services your project needs, then run `devstack apply`.
# Run `devstack list` to see every supported service.

project:
  name: my-project
  environment: local

services:
  enabled:
    - redis
    - postgres

# Per-service overrides. Only the fields you set change; every other field
# keeps its catalog default.
#
# overrides:
#   postgres:
#     port: 15432
#     database: my_project

validation:
  skip_warnings: false
"#;

/// Locates and parses the project configuration.
pub struct ConfigLoader {
    root: PathBuf,
}

impl ConfigLoader {
    /// Create a loader rooted at the given project directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The path a fresh `devstack init` would write to.
    pub fn default_path(&self) -> PathBuf {
        self.root.join(DEFAULT_CONFIG_FILE)
    }

    /// Find the active configuration file, if any.
    pub fn discover(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        let default = self.default_path();
        if default.exists() {
            return Some(default);
        }
        ALTERNATE_CONFIG_FILES
            .iter()
            .map(|name| self.root.join(name))
            .find(|path| path.exists())
    }

    /// Discover, read, and parse the configuration.
    pub fn load(&self, explicit: Option<&Path>) -> DevstackResult<(PathBuf, UserConfig)> {
        let path = self
            .discover(explicit)
            .ok_or_else(|| DevstackError::Configuration {
                message: format!(
                    "no configuration file found ({DEFAULT_CONFIG_FILE}); run 'devstack init' to create one"
                ),
            })?;

        let text = std::fs::read_to_string(&path).map_err(|e| DevstackError::Configuration {
            message: format!("failed to read {}: {e}", path.display()),
        })?;

        let config = Self::parse(&text).map_err(|e| match e {
            DevstackError::Configuration { message } => DevstackError::Configuration {
                message: format!("{}: {message}", path.display()),
            },
            other => other,
        })?;

        debug!(path = %path.display(), "configuration loaded");
        Ok((path, config))
    }

    /// Parse configuration text. Structural errors only; semantic validation
    /// is the core's job.
    pub fn parse(text: &str) -> DevstackResult<UserConfig> {
        serde_yaml::from_str(text).map_err(|e| DevstackError::Configuration {
            message: format!("not valid YAML: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BuiltinCatalog;
    use devstack_core::domain::ConfigValidator;

    #[test]
    fn sample_config_parses_and_validates() {
        let config = ConfigLoader::parse(SAMPLE_CONFIG).unwrap();
        let enabled = config.enabled().expect("sample must have a services section");
        assert_eq!(enabled, &["redis".to_string(), "postgres".to_string()]);

        let catalog = BuiltinCatalog::load().unwrap();
        ConfigValidator::validate(&config, &catalog).unwrap();
    }

    #[test]
    fn malformed_yaml_is_a_configuration_error() {
        let err = ConfigLoader::parse("services:\nenabled:\n- redis\n  - postgres\n").unwrap_err();
        assert!(matches!(err, DevstackError::Configuration { .. }));
        assert!(err.to_string().to_lowercase().contains("yaml"));
    }

    #[test]
    fn missing_section_parses_as_none() {
        let config = ConfigLoader::parse("project:\n  name: test-stack\n").unwrap();
        assert!(config.enabled().is_none());
    }

    #[test]
    fn empty_enabled_parses_as_empty_slice() {
        let config = ConfigLoader::parse("services:\n  enabled: []\n").unwrap();
        assert_eq!(config.enabled(), Some(&[][..]));
    }

    #[test]
    fn discover_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("elsewhere.yaml");
        let loader = ConfigLoader::new(dir.path());
        assert_eq!(
            loader.discover(Some(&explicit)),
            Some(explicit.clone()),
            "explicit path wins even if it does not exist yet"
        );
    }

    #[test]
    fn discover_finds_alternate_spellings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".devstack.yml"), "services:\n  enabled: []\n").unwrap();
        let loader = ConfigLoader::new(dir.path());
        assert_eq!(
            loader.discover(None),
            Some(dir.path().join(".devstack.yml"))
        );
    }

    #[test]
    fn load_without_any_file_mentions_init() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path());
        let err = loader.load(None).unwrap_err();
        assert!(err.to_string().contains("devstack init"));
    }

    #[test]
    fn overrides_with_unknown_keys_parse() {
        let config = ConfigLoader::parse(
            "services:\n  enabled: [redis]\noverrides:\n  redis:\n    port: 6380\n    maxmemory: 256mb\n",
        )
        .unwrap();
        let over = config.overrides.get("redis").unwrap();
        assert_eq!(over.port, Some(6380));
        assert!(over.extra.contains_key("maxmemory"));
    }
}
