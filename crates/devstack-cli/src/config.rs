//! Tool-level application configuration.
//!
//! [`AppConfig`] configures the *tool* (runtime binary, timeouts, output),
//! not the *stack* — the stack lives in `devstack.yaml` and is the core's
//! concern. Loaded once at startup and passed down by reference; no
//! component reads configuration through a global.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Config file at the platform config dir
//! 3. Built-in defaults (always present)

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Container runtime settings.
    #[serde(default)]
    pub runtime: RuntimeConfig,
    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
    /// Generated artifact locations.
    #[serde(default)]
    pub artifacts: ArtifactConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Runtime binary to shell out to.
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Bound on every runtime invocation, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RuntimeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub no_color: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Orchestration manifest path, relative to the working directory.
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
    /// Environment file path, relative to the working directory.
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            env_file: default_env_file(),
        }
    }
}

fn default_binary() -> String {
    "docker".into()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_manifest() -> PathBuf {
    PathBuf::from("compose.generated.yaml")
}

fn default_env_file() -> PathBuf {
    PathBuf::from(".env.generated")
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// Reads the TOML file at [`Self::config_path`] when it exists; a
    /// missing file silently yields the defaults, an unreadable or
    /// unparsable file is an error.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
        toml::from_str(&text)
            .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))
    }

    /// Path to the tool configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.devstack-tool.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "devstack", "devstack")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".devstack-tool.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_runtime_is_docker_with_bounded_timeout() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.runtime.binary, "docker");
        assert_eq!(cfg.runtime.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn default_artifact_paths() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.artifacts.manifest, PathBuf::from("compose.generated.yaml"));
        assert_eq!(cfg.artifacts.env_file, PathBuf::from(".env.generated"));
    }

    #[test]
    fn partial_file_fills_missing_sections_with_defaults() {
        let cfg: AppConfig = toml::from_str("[runtime]\nbinary = \"podman\"\n").unwrap();
        assert_eq!(cfg.runtime.binary, "podman");
        assert_eq!(cfg.runtime.timeout_secs, 60);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let cfg = AppConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.runtime.binary, cfg.runtime.binary);
    }

    #[test]
    fn config_path_is_non_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
