//! Manifest renderer: compose IR → YAML text.
//!
//! The single serialization step for the orchestration manifest. All
//! structure and ordering comes from the typed document in the core; this
//! adapter only turns it into bytes and prepends the generated-file header.

use devstack_core::{
    application::ports::ManifestRenderer,
    domain::{ComposeDocument, artifacts::GENERATED_HEADER},
    error::{DevstackError, DevstackResult},
};

/// serde_yaml-backed renderer for [`ComposeDocument`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ComposeRenderer;

impl ComposeRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ManifestRenderer for ComposeRenderer {
    fn render(&self, document: &ComposeDocument) -> DevstackResult<String> {
        let yaml = serde_yaml::to_string(document).map_err(|e| DevstackError::Internal {
            message: format!("manifest serialization failed: {e}"),
        })?;
        Ok(format!("{GENERATED_HEADER}{yaml}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devstack_core::domain::{
        ProjectInfo, ResolvedServiceSpec, ServiceKind,
        service::{EnvVar, PortBinding, VolumeMount},
    };

    fn specs() -> Vec<ResolvedServiceSpec> {
        vec![
            ResolvedServiceSpec {
                name: "redis".into(),
                kind: ServiceKind::Redis,
                image: "redis:7-alpine".into(),
                ports: vec![PortBinding::new(6379, 6379)],
                volumes: vec![VolumeMount::new("data", "/data")],
                env: vec![],
                options: vec![],
                memory_limit: None,
            },
            ResolvedServiceSpec {
                name: "postgres".into(),
                kind: ServiceKind::Postgres,
                image: "postgres:16-alpine".into(),
                ports: vec![PortBinding::new(5432, 5432)],
                volumes: vec![],
                env: vec![EnvVar::new("POSTGRES_USER", "devstack")],
                options: vec![],
                memory_limit: Some("512m".into()),
            },
        ]
    }

    fn render() -> String {
        let doc = ComposeDocument::build(&ProjectInfo::default(), &specs());
        ComposeRenderer::new().render(&doc).unwrap()
    }

    #[test]
    fn rendered_manifest_is_valid_yaml_with_services() {
        let text = render();
        let value: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        let services = value.get("services").expect("services section");
        assert!(services.get("redis").is_some());
        assert!(services.get("postgres").is_some());
    }

    #[test]
    fn every_service_entry_has_an_image() {
        let text = render();
        let value: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        for (_, entry) in value.get("services").unwrap().as_mapping().unwrap() {
            assert!(entry.get("image").is_some());
        }
    }

    #[test]
    fn manifest_preserves_enabled_order() {
        let text = render();
        let redis_at = text.find("redis:").unwrap();
        let postgres_at = text.find("postgres:").unwrap();
        assert!(redis_at < postgres_at);
    }

    #[test]
    fn rendering_is_byte_identical_across_runs() {
        assert_eq!(render(), render());
    }

    #[test]
    fn header_marks_the_file_as_generated() {
        assert!(render().starts_with("# Generated by devstack"));
    }

    #[test]
    fn mem_limit_appears_only_when_set() {
        let text = render();
        let value: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        let services = value.get("services").unwrap();
        assert!(services.get("postgres").unwrap().get("mem_limit").is_some());
        assert!(services.get("redis").unwrap().get("mem_limit").is_none());
    }
}
