//! Implementation of the `devstack list` command.

use serde::Serialize;

use devstack_adapters::BuiltinCatalog;

use crate::{
    cli::{GlobalArgs, ListArgs, ListFormat},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Catalog entry projection for display and JSON output.
#[derive(Debug, Serialize)]
struct ServiceInfo<'a> {
    name: &'a str,
    kind: &'a str,
    image: &'a str,
    description: &'a str,
}

pub fn execute(args: ListArgs, global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let catalog = BuiltinCatalog::load().map_err(CliError::Core)?;

    let infos: Vec<ServiceInfo<'_>> = catalog
        .iter()
        .map(|def| ServiceInfo {
            name: &def.name,
            kind: def.kind.as_str(),
            image: &def.image,
            description: &def.docs.description,
        })
        .collect();

    match args.format {
        ListFormat::Table => {
            output.header("Supported services:")?;
            for info in &infos {
                output.print(&format!(
                    "  {:<12} {:<10} {:<28} {}",
                    info.name, info.kind, info.image, info.description
                ))?;
            }
            if global.verbose > 0 {
                output.print("")?;
                for def in catalog.iter() {
                    if !def.docs.usage_notes.is_empty() {
                        output.print(&format!("  {}: {}", def.name, def.docs.usage_notes.trim()))?;
                    }
                }
            }
        }
        ListFormat::List => {
            for info in &infos {
                println!("{}", info.name);
            }
        }
        ListFormat::Json => {
            // Serialise as a JSON array to stdout (bypasses OutputManager
            // because JSON output must be parseable even in non-TTY pipes).
            let json = serde_json::to_string_pretty(&infos).unwrap_or_else(|_| "[]".into());
            println!("{json}");
        }
    }

    Ok(())
}
