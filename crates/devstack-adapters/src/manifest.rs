//! Reads the last-generated manifest back into a [`StackContext`].
//!
//! The lifecycle controller operates on the services the manifest names —
//! not on the configuration — so "what exists" always matches what the
//! runtime was last given. Only the service names and environment blocks
//! are projected; everything else in the manifest belongs to the runtime.

use std::collections::BTreeMap;
use std::path::Path;

use devstack_core::{
    application::{ApplicationError, ManifestService, StackContext, StackRef},
    error::{DevstackError, DevstackResult},
};

/// Load the generated manifest at `manifest_path` for `project`.
///
/// A missing manifest is an [`ApplicationError::ManifestMissing`]: the
/// operator must `devstack apply` first.
pub fn load_stack(project: &str, manifest_path: &Path) -> DevstackResult<StackContext> {
    if !manifest_path.exists() {
        return Err(ApplicationError::ManifestMissing {
            path: manifest_path.to_path_buf(),
        }
        .into());
    }

    let text =
        std::fs::read_to_string(manifest_path).map_err(|e| DevstackError::Configuration {
            message: format!("failed to read {}: {e}", manifest_path.display()),
        })?;

    let services = parse_services(&text).map_err(|message| DevstackError::Configuration {
        message: format!("{}: {message}", manifest_path.display()),
    })?;

    Ok(StackContext {
        stack: StackRef {
            project: project.to_string(),
            manifest_path: manifest_path.to_path_buf(),
        },
        services,
    })
}

/// Extract service names and environments, preserving manifest order.
fn parse_services(text: &str) -> Result<Vec<ManifestService>, String> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| format!("not valid YAML: {e}"))?;

    let services = value
        .get("services")
        .and_then(|s| s.as_mapping())
        .ok_or_else(|| "no 'services' section in manifest".to_string())?;

    let mut out = Vec::new();
    for (name, entry) in services {
        let name = name
            .as_str()
            .ok_or_else(|| "non-string service name in manifest".to_string())?;

        let mut environment = BTreeMap::new();
        if let Some(env) = entry.get("environment").and_then(|e| e.as_mapping()) {
            for (key, value) in env {
                if let Some(key) = key.as_str() {
                    environment.insert(key.to_string(), scalar_to_string(value));
                }
            }
        }

        out.push(ManifestService {
            name: name.to_string(),
            environment,
        });
    }

    Ok(out)
}

fn scalar_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
