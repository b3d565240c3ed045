//! Apply Service - the configuration-to-artifacts orchestrator.
//!
//! This service coordinates the compile pipeline:
//! 1. Validate the configuration against the catalog (unless skipped)
//! 2. Resolve enabled services against catalog defaults and overrides
//! 3. Project resolved specs into the artifact IR
//! 4. Render and write the artifacts (unless dry-run)
//!
//! It implements the driving port (incoming) and uses driven ports
//! (outgoing). Fatal paths return before any write, so previously generated
//! artifacts are never half-overwritten.

use std::path::PathBuf;

use tracing::{info, instrument};

use crate::{
    application::ports::{FileMode, Filesystem, ManifestRenderer},
    domain::{
        ComposeDocument, ConfigValidator, EnvDocument, ResolutionWarning, ResolvedServiceSpec,
        ServiceCatalog, UserConfig, resolve,
    },
    error::DevstackResult,
};

/// Where the generated artifacts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub manifest: PathBuf,
    pub env_file: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("compose.generated.yaml"),
            env_file: PathBuf::from(".env.generated"),
        }
    }
}

/// Options for one apply invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// Validate and render, but do not write artifacts.
    pub dry_run: bool,
    /// Bypass the validator entirely; the caller accepts an unvalidated
    /// configuration.
    pub skip_validation: bool,
}

/// Result of a successful apply.
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    pub specs: Vec<ResolvedServiceSpec>,
    pub warnings: Vec<ResolutionWarning>,
    /// Rendered manifest text.
    pub manifest: String,
    /// Rendered environment file text.
    pub env_file: String,
    /// Paths written, or `None` for a dry run.
    pub written: Option<ArtifactPaths>,
}

/// Main apply orchestrator.
pub struct ApplyService {
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn ManifestRenderer>,
    paths: ArtifactPaths,
}

impl ApplyService {
    /// Create a new apply service with the given adapters.
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        renderer: Box<dyn ManifestRenderer>,
        paths: ArtifactPaths,
    ) -> Self {
        Self {
            filesystem,
            renderer,
            paths,
        }
    }

    /// Compile the configuration into deployable artifacts.
    #[instrument(skip_all, fields(project = %config.project.name, dry_run = options.dry_run))]
    pub fn apply(
        &self,
        config: &UserConfig,
        catalog: &ServiceCatalog,
        options: &ApplyOptions,
    ) -> DevstackResult<ApplyOutcome> {
        // 1. Validate (the engine must also run without the validator).
        if !options.skip_validation {
            ConfigValidator::validate(config, catalog)?;
        }

        // 2. Resolve catalog defaults against overrides.
        let resolution = resolve(config, catalog)?;

        // 3. Project into the typed IR.
        let compose = ComposeDocument::build(&config.project, &resolution.specs);
        let env = EnvDocument::build(&resolution.specs);

        // 4. Render through a single serialization step each.
        let manifest_text = self.renderer.render(&compose)?;
        let env_text = env.render();

        // 5. Write (all-or-nothing per file), unless dry-run.
        let written = if options.dry_run {
            None
        } else {
            self.filesystem
                .write_atomic(&self.paths.manifest, &manifest_text, FileMode::Standard)?;
            // The env file may carry credentials: owner-only.
            self.filesystem
                .write_atomic(&self.paths.env_file, &env_text, FileMode::Secret)?;
            Some(self.paths.clone())
        };

        info!(
            services = resolution.specs.len(),
            warnings = resolution.warnings.len(),
            wrote = written.is_some(),
            "apply completed"
        );

        Ok(ApplyOutcome {
            specs: resolution.specs,
            warnings: resolution.warnings,
            manifest: manifest_text,
            env_file: env_text,
            written,
        })
    }
}
