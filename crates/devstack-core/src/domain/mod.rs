//! Core domain layer for Devstack.
//!
//! This module contains pure business logic with ZERO external dependencies.
//! All I/O, YAML parsing, and process execution concerns are handled via
//! ports (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **No external crates**: Only std library + thiserror + serde
//! - **Immutable entities**: Catalog entries never change after load
//! - **Rich domain model**: Behavior lives in entities, not services

// Public API - what the world sees
pub mod artifacts;
pub mod catalog;
pub mod config;
pub mod error;
pub mod resolve;
pub mod service;
pub mod state;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use artifacts::{ComposeDocument, ComposeService, EnvDocument, OrderedMap};
pub use catalog::{ServiceCatalog, ServiceDefinition, ServiceDocs};
pub use config::{
    ProjectInfo, ScalarValue, ServiceOverride, ServicesSection, UserConfig, ValidationFlags,
};
pub use error::{DomainError, Violation};
pub use resolve::{ResolutionOutcome, ResolutionWarning, ResolvedServiceSpec, resolve};
pub use service::{EnvVar, PortBinding, ServiceKind, VolumeMount, env_prefix};
pub use state::ServiceState;
pub use validation::ConfigValidator;
