//! Typed intermediate representations of the generated artifacts.
//!
//! # Design
//!
//! The generator never concatenates YAML by hand: resolved specs are
//! projected into [`ComposeDocument`] / [`EnvDocument`] values and rendered
//! through a single serialization step (the manifest via the
//! `ManifestRenderer` port, the env file via [`EnvDocument::render`]).
//!
//! Determinism is a hard requirement: identical resolved input must
//! byte-for-byte reproduce identical output. Nothing here reads the clock,
//! the environment, or prior output.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::domain::config::ProjectInfo;
use crate::domain::resolve::ResolvedServiceSpec;
use crate::domain::service::{EnvVar, env_prefix};

/// Header prepended to every generated file.
///
/// Marks the file as machine-generated and disposable. Deliberately free of
/// timestamps so regeneration is byte-stable.
pub const GENERATED_HEADER: &str =
    "# Generated by devstack - do not edit; changes are lost on the next apply.\n\
     # Regenerate with `devstack apply`.\n";

// ── OrderedMap ───────────────────────────────────────────────────────────────

/// An insertion-ordered string-keyed map that serializes as a mapping.
///
/// Guarantees deterministic key order in rendered artifacts, which plain
/// `HashMap` cannot and `BTreeMap` only can alphabetically.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a key, replacing the value in place if the key exists.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, V)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// ── Compose document ─────────────────────────────────────────────────────────

/// One service entry in the orchestration manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposeService {
    pub image: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    #[serde(skip_serializing_if = "OrderedMap::is_empty")]
    pub environment: OrderedMap<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem_limit: Option<String>,
    pub restart: String,
}

/// A named top-level volume declaration (empty: driver defaults apply).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComposeVolume {}

/// The orchestration manifest, services in `enabled` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposeDocument {
    pub services: OrderedMap<ComposeService>,
    #[serde(skip_serializing_if = "OrderedMap::is_empty")]
    pub volumes: OrderedMap<ComposeVolume>,
}

impl ComposeDocument {
    /// Project resolved specs into the manifest IR.
    ///
    /// Volume names are namespaced `<project>_<service>_<name>` so two
    /// stacks in different projects never share data.
    pub fn build(project: &ProjectInfo, specs: &[ResolvedServiceSpec]) -> Self {
        let mut services = OrderedMap::new();
        let mut volumes = OrderedMap::new();

        for spec in specs {
            let mut environment = OrderedMap::new();
            for var in &spec.env {
                environment.insert(var.key.clone(), var.value.clone());
            }

            let mut volume_refs = Vec::new();
            for mount in &spec.volumes {
                let volume_name = format!("{}_{}_{}", project.name, spec.name, mount.name);
                volume_refs.push(format!("{}:{}", volume_name, mount.container_path));
                volumes.insert(volume_name, ComposeVolume::default());
            }

            services.insert(
                spec.name.clone(),
                ComposeService {
                    image: spec.image.clone(),
                    ports: spec.ports.iter().map(|p| p.to_string()).collect(),
                    volumes: volume_refs,
                    environment,
                    mem_limit: spec.memory_limit.clone(),
                    restart: "unless-stopped".into(),
                },
            );
        }

        Self { services, volumes }
    }

    /// Service identifiers in manifest order.
    pub fn service_names(&self) -> Vec<&str> {
        self.services.keys().collect()
    }
}

// ── Env document ─────────────────────────────────────────────────────────────

/// One contiguous variable block per service, in `enabled` order.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvDocument {
    blocks: Vec<EnvBlock>,
}

#[derive(Debug, Clone, PartialEq)]
struct EnvBlock {
    service: String,
    vars: Vec<EnvVar>,
}

impl EnvDocument {
    /// Build the env file IR from resolved specs.
    ///
    /// Every key is namespaced with the service prefix (`redis` → `REDIS_`);
    /// keys already carrying the prefix are kept as-is so multiple services
    /// never collide. Each block leads with the connection coordinates
    /// (`_HOST`, `_PORT`) the operator actually needs.
    pub fn build(specs: &[ResolvedServiceSpec]) -> Self {
        let blocks = specs
            .iter()
            .map(|spec| {
                let prefix = env_prefix(&spec.name);
                let mut vars: Vec<EnvVar> = Vec::new();

                let mut push = |key: String, value: &str| {
                    if !vars.iter().any(|v| v.key == key) {
                        vars.push(EnvVar::new(key, value));
                    }
                };

                push(format!("{prefix}HOST"), "localhost");
                if let Some(port) = spec.primary_host_port() {
                    push(format!("{prefix}PORT"), &port.to_string());
                }
                for var in &spec.env {
                    let key = if var.key.starts_with(&prefix) {
                        var.key.clone()
                    } else {
                        format!("{prefix}{}", var.key)
                    };
                    push(key, &var.value);
                }

                EnvBlock {
                    service: spec.name.clone(),
                    vars,
                }
            })
            .collect();

        Self { blocks }
    }

    /// Render to the flat `KEY=VALUE` file format.
    pub fn render(&self) -> String {
        let mut out = String::from(GENERATED_HEADER);
        for block in &self.blocks {
            out.push('\n');
            out.push_str(&format!("# --- {} ---\n", block.service));
            for var in &block.vars {
                out.push_str(&format!("{}={}\n", var.key, var.value));
            }
        }
        out
    }

    /// All keys across blocks, in render order.
    pub fn keys(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .flat_map(|b| b.vars.iter().map(|v| v.key.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::service::{PortBinding, ServiceKind, VolumeMount};

    fn redis_spec() -> ResolvedServiceSpec {
        ResolvedServiceSpec {
            name: "redis".into(),
            kind: ServiceKind::Redis,
            image: "redis:7-alpine".into(),
            ports: vec![PortBinding::new(6379, 6379)],
            volumes: vec![VolumeMount::new("data", "/data")],
            env: vec![],
            options: vec![],
            memory_limit: None,
        }
    }

    fn postgres_spec() -> ResolvedServiceSpec {
        ResolvedServiceSpec {
            name: "postgres".into(),
            kind: ServiceKind::Postgres,
            image: "postgres:16-alpine".into(),
            ports: vec![PortBinding::new(5432, 5432)],
            volumes: vec![VolumeMount::new("data", "/var/lib/postgresql/data")],
            env: vec![
                EnvVar::new("POSTGRES_USER", "devstack"),
                EnvVar::new("POSTGRES_PASSWORD", "devstack"),
            ],
            options: vec![],
            memory_limit: Some("512m".into()),
        }
    }

    fn project() -> ProjectInfo {
        ProjectInfo::default()
    }

    // ── OrderedMap ────────────────────────────────────────────────────────

    #[test]
    fn ordered_map_preserves_insertion_order() {
        let mut map = OrderedMap::new();
        map.insert("zeta", 1);
        map.insert("alpha", 2);
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn ordered_map_insert_replaces_in_place() {
        let mut map = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("a", 3);
        assert_eq!(map.get("a"), Some(&3));
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    // ── ComposeDocument ───────────────────────────────────────────────────

    #[test]
    fn manifest_services_follow_enabled_order() {
        let doc = ComposeDocument::build(&project(), &[postgres_spec(), redis_spec()]);
        assert_eq!(doc.service_names(), vec!["postgres", "redis"]);
    }

    #[test]
    fn volumes_are_project_namespaced() {
        let doc = ComposeDocument::build(&project(), &[redis_spec()]);
        let entry = doc.services.get("redis").unwrap();
        assert_eq!(entry.volumes, vec!["devstack_redis_data:/data"]);
        assert!(doc.volumes.contains_key("devstack_redis_data"));
    }

    #[test]
    fn memory_limit_is_projected_when_set() {
        let doc = ComposeDocument::build(&project(), &[postgres_spec(), redis_spec()]);
        assert_eq!(
            doc.services.get("postgres").unwrap().mem_limit.as_deref(),
            Some("512m")
        );
        assert_eq!(doc.services.get("redis").unwrap().mem_limit, None);
    }

    #[test]
    fn build_is_deterministic() {
        let specs = [postgres_spec(), redis_spec()];
        assert_eq!(
            ComposeDocument::build(&project(), &specs),
            ComposeDocument::build(&project(), &specs)
        );
    }

    // ── EnvDocument ───────────────────────────────────────────────────────

    #[test]
    fn env_keys_are_service_namespaced() {
        let doc = EnvDocument::build(&[redis_spec()]);
        let rendered = doc.render();
        assert!(rendered.contains("REDIS_HOST=localhost"));
        assert!(rendered.contains("REDIS_PORT=6379"));
    }

    #[test]
    fn already_prefixed_keys_are_not_double_prefixed() {
        let doc = EnvDocument::build(&[postgres_spec()]);
        let rendered = doc.render();
        assert!(rendered.contains("POSTGRES_USER=devstack"));
        assert!(!rendered.contains("POSTGRES_POSTGRES_USER"));
    }

    #[test]
    fn blocks_are_contiguous_and_ordered() {
        let doc = EnvDocument::build(&[redis_spec(), postgres_spec()]);
        let rendered = doc.render();
        let redis_at = rendered.find("# --- redis ---").unwrap();
        let postgres_at = rendered.find("# --- postgres ---").unwrap();
        assert!(redis_at < postgres_at);

        // No postgres keys inside the redis block.
        let redis_block = &rendered[redis_at..postgres_at];
        assert!(!redis_block.contains("POSTGRES_"));
    }

    #[test]
    fn rendering_is_byte_identical_across_runs() {
        let specs = [redis_spec(), postgres_spec()];
        let first = EnvDocument::build(&specs).render();
        let second = EnvDocument::build(&specs).render();
        assert_eq!(first, second);
    }

    #[test]
    fn rendered_env_starts_with_generated_header() {
        let rendered = EnvDocument::build(&[redis_spec()]).render();
        assert!(rendered.starts_with("# Generated by devstack"));
    }

    #[test]
    fn env_without_port_omits_port_entry() {
        let mut spec = redis_spec();
        spec.ports.clear();
        let doc = EnvDocument::build(&[spec]);
        assert!(!doc.keys().contains(&"REDIS_PORT"));
        assert!(doc.keys().contains(&"REDIS_HOST"));
    }
}
