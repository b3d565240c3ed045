//! Domain value objects: ServiceKind, PortBinding, VolumeMount, EnvVar.
//!
//! # Design
//!
//! These are pure value types — equality-by-value, no identity. `ServiceKind`
//! is the only one carrying behavior: it decides backup capability and which
//! environment keys name a service's credentials. This file's only job is to
//! define the types, their string representations, and their parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ServiceKind ──────────────────────────────────────────────────────────────

/// The backup-relevant family a catalog service belongs to.
///
/// Everything that is not a database the framework knows how to dump is
/// `Generic`: startable, stoppable, but not backup-capable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Postgres,
    Mysql,
    Redis,
    Mongodb,
    Generic,
}

impl ServiceKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Redis => "redis",
            Self::Mongodb => "mongodb",
            Self::Generic => "generic",
        }
    }

    /// Whether the lifecycle controller can produce a backup artifact for
    /// services of this kind.
    pub const fn supports_backup(self) -> bool {
        !matches!(self, Self::Generic)
    }

    /// File extension for backup artifacts of this kind.
    pub const fn backup_extension(self) -> &'static str {
        match self {
            Self::Postgres | Self::Mysql => "sql",
            Self::Redis => "rdb",
            Self::Mongodb => "archive",
            Self::Generic => "bak",
        }
    }

    /// Container environment key naming the admin user, if the kind has one.
    pub const fn username_env_key(self) -> Option<&'static str> {
        match self {
            Self::Postgres => Some("POSTGRES_USER"),
            Self::Mysql => Some("MYSQL_USER"),
            Self::Mongodb => Some("MONGO_INITDB_ROOT_USERNAME"),
            Self::Redis | Self::Generic => None,
        }
    }

    /// Container environment key naming the password, if the kind has one.
    pub const fn password_env_key(self) -> Option<&'static str> {
        match self {
            Self::Postgres => Some("POSTGRES_PASSWORD"),
            Self::Mysql => Some("MYSQL_PASSWORD"),
            Self::Mongodb => Some("MONGO_INITDB_ROOT_PASSWORD"),
            Self::Redis => Some("REDIS_PASSWORD"),
            Self::Generic => None,
        }
    }

    /// Container environment key naming the default database, if any.
    pub const fn database_env_key(self) -> Option<&'static str> {
        match self {
            Self::Postgres => Some("POSTGRES_DB"),
            Self::Mysql => Some("MYSQL_DATABASE"),
            Self::Mongodb => Some("MONGO_INITDB_DATABASE"),
            Self::Redis | Self::Generic => None,
        }
    }
}

impl Default for ServiceKind {
    fn default() -> Self {
        Self::Generic
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::Mysql),
            "redis" => Ok(Self::Redis),
            "mongodb" | "mongo" => Ok(Self::Mongodb),
            "generic" => Ok(Self::Generic),
            other => Err(DomainError::InvalidValue {
                what: "service kind",
                value: other.into(),
                reason: "expected postgres, mysql, redis, mongodb, or generic".into(),
            }),
        }
    }
}

// ── PortBinding ──────────────────────────────────────────────────────────────

/// A host:container port pair, written `"6379:6379"` in catalog and manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PortBinding {
    pub host: u16,
    pub container: u16,
}

impl PortBinding {
    pub const fn new(host: u16, container: u16) -> Self {
        Self { host, container }
    }

    /// Same binding with a different host-side port.
    pub const fn with_host(self, host: u16) -> Self {
        Self { host, ..self }
    }
}

impl fmt::Display for PortBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.container)
    }
}

impl FromStr for PortBinding {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DomainError::InvalidValue {
            what: "port binding",
            value: s.into(),
            reason: reason.into(),
        };

        match s.split_once(':') {
            Some((host, container)) => {
                let host = host.trim().parse().map_err(|_| invalid("host port is not a number"))?;
                let container = container
                    .trim()
                    .parse()
                    .map_err(|_| invalid("container port is not a number"))?;
                Ok(Self { host, container })
            }
            // A bare port maps host to the same container port.
            None => {
                let port = s.trim().parse().map_err(|_| invalid("port is not a number"))?;
                Ok(Self { host: port, container: port })
            }
        }
    }
}

impl TryFrom<String> for PortBinding {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PortBinding> for String {
    fn from(value: PortBinding) -> Self {
        value.to_string()
    }
}

// ── VolumeMount ──────────────────────────────────────────────────────────────

/// A named volume and the container path it mounts at, written
/// `"data:/var/lib/postgresql/data"`.
///
/// The short name is namespaced with the project and service identifiers at
/// generation time; it is never used verbatim in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VolumeMount {
    pub name: String,
    pub container_path: String,
}

impl VolumeMount {
    pub fn new(name: impl Into<String>, container_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            container_path: container_path.into(),
        }
    }
}

impl fmt::Display for VolumeMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.container_path)
    }
}

impl FromStr for VolumeMount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((name, path)) if !name.trim().is_empty() && path.starts_with('/') => Ok(Self {
                name: name.trim().into(),
                container_path: path.into(),
            }),
            _ => Err(DomainError::InvalidValue {
                what: "volume mount",
                value: s.into(),
                reason: "expected 'name:/absolute/container/path'".into(),
            }),
        }
    }
}

impl TryFrom<String> for VolumeMount {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VolumeMount> for String {
    fn from(value: VolumeMount) -> Self {
        value.to_string()
    }
}

// ── EnvVar ───────────────────────────────────────────────────────────────────

/// One environment variable, written `"KEY=value"` in the catalog.
///
/// Order matters: templates are rendered in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for EnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl FromStr for EnvVar {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => Ok(Self {
                key: key.trim().into(),
                value: value.into(),
            }),
            _ => Err(DomainError::InvalidValue {
                what: "environment variable",
                value: s.into(),
                reason: "expected 'KEY=value'".into(),
            }),
        }
    }
}

impl TryFrom<String> for EnvVar {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EnvVar> for String {
    fn from(value: EnvVar) -> Self {
        value.to_string()
    }
}

// ── Env prefix derivation ────────────────────────────────────────────────────

/// Derive the environment-file key prefix for a service identifier.
///
/// `redis` → `REDIS_`, `local-stack` → `LOCAL_STACK_`. Keys already carrying
/// the prefix are left untouched by the generator, so catalog templates may
/// use either style.
pub fn env_prefix(service: &str) -> String {
    let mut prefix: String = service
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    prefix.push('_');
    prefix
}
