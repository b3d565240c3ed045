//! Implementation of `devstack manage` — the lifecycle subcommands.
//!
//! Translates each subcommand into lifecycle-service calls and prints one
//! line per service. A batch with any failed service exits non-zero via
//! [`CliError::PartialFailure`], with every per-service result still shown.

use std::path::PathBuf;

use tracing::instrument;

use devstack_adapters::{
    BuiltinCatalog, ConfigLoader, DockerComposeRuntime, LocalFilesystem, load_stack,
};
use devstack_core::application::{LifecycleService, OperationReport};
use devstack_core::domain::{ServiceCatalog, ServiceKind};

use crate::{
    cli::{GlobalArgs, ManageCommands},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute a `devstack manage` subcommand.
#[instrument(skip_all)]
pub fn execute(
    cmd: ManageCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let catalog = BuiltinCatalog::load().map_err(CliError::Core)?;

    // The project name namespaces containers and volumes; when the
    // configuration is unreadable we still operate on the manifest under
    // the default namespace rather than refusing read-only commands.
    let project = ConfigLoader::new(".")
        .load(global.config.as_deref())
        .map(|(_, cfg)| cfg.project.name)
        .unwrap_or_else(|_| "devstack".to_string());

    let context = load_stack(&project, &config.artifacts.manifest).map_err(CliError::Core)?;

    let service = LifecycleService::new(
        Box::new(DockerComposeRuntime::with_binary(config.runtime.binary.clone())),
        Box::new(LocalFilesystem::new()),
        catalog.clone(),
        context,
        config.runtime.timeout(),
    );

    match cmd {
        ManageCommands::Start { services } => {
            let reports = service.start(&services).map_err(CliError::Core)?;
            report_batch(&output, &reports)
        }
        ManageCommands::Stop { services } => {
            let reports = service.stop(&services).map_err(CliError::Core)?;
            report_batch(&output, &reports)
        }
        ManageCommands::Status => {
            let statuses = service.status().map_err(CliError::Core)?;
            output.header("Services:")?;
            for status in &statuses {
                output.status_row(&status.name, status.state)?;
            }
            Ok(())
        }
        ManageCommands::Logs { services, tail } => {
            let reports = service.logs(&services, tail).map_err(CliError::Core)?;
            let mut failed = 0;
            for report in &reports {
                match &report.outcome {
                    Ok(text) => {
                        output.header(&format!("--- {} ---", report.service))?;
                        // Raw log text to stdout so it can be piped.
                        println!("{}", text.trim_end());
                    }
                    Err(e) => {
                        failed += 1;
                        output.error(&format!("{}: {e}", report.service))?;
                    }
                }
            }
            finish_batch(failed, reports.len())
        }
        ManageCommands::Backup {
            service: target,
            name,
            output: dir,
        } => {
            let artifact = backup_artifact_path(&catalog, &target, name.as_deref(), &dir);
            let path = service.backup(&target, &artifact).map_err(CliError::Core)?;
            output.success(&format!("Backed up '{target}' to {}", path.display()))?;
            Ok(())
        }
        ManageCommands::Restore {
            service: target,
            artifact,
        } => {
            let message = service
                .restore(&target, &artifact)
                .map_err(CliError::Core)?;
            output.success(&format!("'{target}': {message}"))?;
            Ok(())
        }
    }
}

/// Print per-service outcomes, then fold into a single exit status.
fn report_batch(output: &OutputManager, reports: &[OperationReport]) -> CliResult<()> {
    let mut failed = 0;
    for report in reports {
        match &report.outcome {
            Ok(msg) => output.success(&format!("{}: {msg}", report.service))?,
            Err(e) => {
                failed += 1;
                output.error(&format!("{}: {e}", report.service))?;
            }
        }
    }
    finish_batch(failed, reports.len())
}

fn finish_batch(failed: usize, total: usize) -> CliResult<()> {
    if failed > 0 {
        Err(CliError::PartialFailure { failed, total })
    } else {
        Ok(())
    }
}

/// Default artifact path: `<dir>/<name>.<ext>` with a timestamped name when
/// none was given and the extension chosen by service kind.
fn backup_artifact_path(
    catalog: &ServiceCatalog,
    service: &str,
    name: Option<&str>,
    dir: &std::path::Path,
) -> PathBuf {
    let extension = catalog
        .get(service)
        .map(|d| d.kind)
        .unwrap_or(ServiceKind::Generic)
        .backup_extension();
    let base = match name {
        Some(name) => name.to_string(),
        None => format!(
            "{service}_{}",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        ),
    };
    dir.join(format!("{base}.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use devstack_adapters::BuiltinCatalog;

    #[test]
    fn named_backup_gets_kind_extension() {
        let catalog = BuiltinCatalog::load().unwrap();
        let path = backup_artifact_path(
            &catalog,
            "postgres",
            Some("nightly"),
            std::path::Path::new("backups"),
        );
        assert_eq!(path, PathBuf::from("backups/nightly.sql"));
    }

    #[test]
    fn default_backup_name_includes_the_service() {
        let catalog = BuiltinCatalog::load().unwrap();
        let path = backup_artifact_path(&catalog, "redis", None, std::path::Path::new("backups"));
        let file = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(file.starts_with("redis_"));
        assert!(file.ends_with(".rdb"));
    }
}
