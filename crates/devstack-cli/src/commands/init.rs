//! `devstack init` — scaffold a sample project configuration.

use devstack_adapters::{ConfigLoader, SAMPLE_CONFIG};

use crate::{
    cli::{GlobalArgs, InitArgs},
    error::{CliResult, IntoCli as _},
    output::OutputManager,
};

/// Create a sample `devstack.yaml` in the working directory.
pub fn execute(args: InitArgs, _global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    output.info("Initialising configuration...")?;

    let config_path = ConfigLoader::new(".").default_path();

    // Bail early if the file already exists and --force was not given.
    if config_path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            config_path.display(),
        ))?;
        return Ok(());
    }

    std::fs::write(&config_path, SAMPLE_CONFIG)
        .with_cli_context(|| format!("Failed to write config to '{}'", config_path.display()))?;

    output.success(&format!(
        "Configuration created at {}",
        config_path.display(),
    ))?;
    output.print("")?;
    output.print("Next steps:")?;
    output.print("  1. Edit devstack.yaml and pick your services (devstack list)")?;
    output.print("  2. devstack apply")?;
    output.print("  3. devstack manage start")?;

    Ok(())
}
