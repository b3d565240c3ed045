//! Devstack Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Devstack
//! configuration compiler, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          devstack-cli (CLI)             │
//! │      (Implements Driving Ports)         │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │    (ApplyService, LifecycleService)     │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │ (Driven: Filesystem, Renderer, Runtime) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    devstack-adapters (Infrastructure)   │
//! │ (LocalFilesystem, DockerComposeRuntime) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │  (Catalog, UserConfig, Resolver, IR)    │
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```text
//! // 1. Load the catalog and the user configuration (via adapters)
//! // 2. Validate
//! ConfigValidator::validate(&config, &catalog)?;
//!
//! // 3. Use the application service (with injected adapters)
//! let service = ApplyService::new(filesystem, renderer, paths);
//! let outcome = service.apply(&config, &catalog, &ApplyOptions::default())?;
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplyOptions, ApplyOutcome, ApplyService, ArtifactPaths, LifecycleService,
        ports::{ContainerRuntime, Filesystem, ManifestRenderer, StackRef},
    };
    pub use crate::domain::{
        ComposeDocument, ConfigValidator, EnvDocument, ResolvedServiceSpec, ServiceCatalog,
        ServiceDefinition, ServiceKind, ServiceState, UserConfig,
    };
    pub use crate::error::{DevstackError, DevstackResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
