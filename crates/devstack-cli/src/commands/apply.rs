//! Implementation of the `devstack apply` command.
//!
//! Responsibility: load the configuration and catalog, call the core apply
//! service, and display results. No business logic lives here.
//!
//! Dispatch sequence:
//! 1. Discover and parse the project configuration
//! 2. Load the built-in catalog
//! 3. Run the apply pipeline (validate → resolve → render → write)
//! 4. Surface resolution warnings (unless suppressed)
//! 5. Report written artifacts, or print them on `--dry-run`

use tracing::{info, instrument};

use devstack_adapters::{BuiltinCatalog, ComposeRenderer, ConfigLoader, LocalFilesystem};
use devstack_core::application::{ApplyOptions, ApplyService, ArtifactPaths};

use crate::{
    cli::{ApplyArgs, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `devstack apply` command.
#[instrument(skip_all, fields(dry_run = args.dry_run))]
pub fn execute(
    args: ApplyArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Project configuration
    let loader = ConfigLoader::new(".");
    let (config_path, user_config) = loader
        .load(global.config.as_deref())
        .map_err(CliError::Core)?;
    output.info(&format!("Using configuration {}", config_path.display()))?;

    // 2. Catalog
    let catalog = BuiltinCatalog::load().map_err(CliError::Core)?;

    if args.skip_validation {
        output.warning("validation skipped on request; the configuration is unchecked")?;
    }

    // 3. Apply pipeline
    let paths = ArtifactPaths {
        manifest: config.artifacts.manifest.clone(),
        env_file: config.artifacts.env_file.clone(),
    };
    let service = ApplyService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(ComposeRenderer::new()),
        paths,
    );
    let options = ApplyOptions {
        dry_run: args.dry_run,
        skip_validation: args.skip_validation,
    };
    let outcome = service
        .apply(&user_config, &catalog, &options)
        .map_err(CliError::Core)?;

    info!(
        services = outcome.specs.len(),
        warnings = outcome.warnings.len(),
        "apply finished"
    );

    // 4. Warnings (suppressible via validation.skip_warnings)
    if !user_config.skip_warnings() {
        for warning in &outcome.warnings {
            output.warning(&warning.to_string())?;
        }
    }

    // 5. Results
    if outcome.specs.is_empty() {
        output.warning("no services enabled; the generated stack is empty")?;
    }

    if args.dry_run {
        output.header("Dry run - nothing written")?;
        // Raw artifact text to stdout so it can be piped and inspected
        // (bypasses the OutputManager, same as machine formats elsewhere).
        println!("{}", outcome.manifest);
        println!("{}", outcome.env_file);
        output.success(&format!(
            "Configuration valid: {} service(s) resolved",
            outcome.specs.len()
        ))?;
    } else {
        output.success(&format!("Wrote {}", config.artifacts.manifest.display()))?;
        output.success(&format!("Wrote {}", config.artifacts.env_file.display()))?;

        if !global.quiet {
            output.print("")?;
            output.print("Next steps:")?;
            output.print("  devstack manage start")?;
            output.print("  devstack manage status")?;
        }
    }

    Ok(())
}
