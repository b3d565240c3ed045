//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.
//!
//! Unknown subcommands and flags are clap's job: they produce a clean
//! usage-style error and exit code 2, never a panic.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "devstack",
    bin_name = "devstack",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f9f1} Local infrastructure stacks from one config file",
    long_about = "Devstack compiles a declarative service selection into a \
                  container-orchestration manifest and an environment file, \
                  then drives the resulting stack's lifecycle.",
    after_help = "EXAMPLES:\n\
        \x20 devstack init                     # scaffold devstack.yaml\n\
        \x20 devstack apply --dry-run          # validate and preview artifacts\n\
        \x20 devstack apply                    # write manifest + env file\n\
        \x20 devstack manage start             # start the stack\n\
        \x20 devstack manage backup postgres   # dump the database",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate the configuration and generate stack artifacts.
    #[command(
        visible_alias = "a",
        about = "Validate configuration and generate artifacts",
        after_help = "EXAMPLES:\n\
            \x20 devstack apply\n\
            \x20 devstack apply --dry-run\n\
            \x20 devstack apply --skip-validation"
    )]
    Apply(ApplyArgs),

    /// Scaffold a sample configuration file.
    #[command(
        about = "Create a sample devstack.yaml",
        after_help = "EXAMPLES:\n\
            \x20 devstack init\n\
            \x20 devstack init --force   # overwrite an existing file"
    )]
    Init(InitArgs),

    /// List the services the catalog supports.
    #[command(
        visible_alias = "ls",
        about = "List supported services",
        after_help = "EXAMPLES:\n\
            \x20 devstack list\n\
            \x20 devstack list --format json"
    )]
    List(ListArgs),

    /// Drive the generated stack's lifecycle.
    #[command(
        visible_alias = "m",
        about = "Manage the running stack",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 devstack manage start\n\
            \x20 devstack manage status\n\
            \x20 devstack manage logs redis --tail 100\n\
            \x20 devstack manage backup postgres nightly\n\
            \x20 devstack manage restore postgres backups/nightly.sql"
    )]
    Manage(ManageCommands),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 devstack completions bash > ~/.local/share/bash-completion/completions/devstack\n\
            \x20 devstack completions zsh  > ~/.zfunc/_devstack"
    )]
    Completions(CompletionsArgs),
}

// ── apply ─────────────────────────────────────────────────────────────────────

/// Arguments for `devstack apply`.
#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Validate and render, but write nothing.
    #[arg(long = "dry-run", help = "Preview generated artifacts without writing")]
    pub dry_run: bool,

    /// Skip semantic validation entirely (accepts an unvalidated config).
    #[arg(long = "skip-validation", help = "Bypass configuration validation")]
    pub skip_validation: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `devstack init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing configuration file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `devstack list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── manage ────────────────────────────────────────────────────────────────────

/// Lifecycle subcommands for `devstack manage`.
#[derive(Debug, Subcommand)]
pub enum ManageCommands {
    /// Start services (all manifest services when none are named).
    Start {
        /// Services to start; empty means every manifest service.
        services: Vec<String>,
    },
    /// Stop services (all manifest services when none are named).
    Stop {
        /// Services to stop; empty means every manifest service.
        services: Vec<String>,
    },
    /// Show the state of every manifest service. Read-only.
    Status,
    /// Show trailing log lines.
    Logs {
        /// Services to show; empty means every manifest service.
        services: Vec<String>,

        /// Number of trailing lines per service.
        #[arg(long = "tail", default_value_t = 50)]
        tail: u32,
    },
    /// Back up one service's data to a local artifact.
    Backup {
        /// Service to back up.
        service: String,

        /// Artifact name; defaults to `<service>_<timestamp>`.
        name: Option<String>,

        /// Output directory for artifacts.
        #[arg(long = "output", value_name = "DIR", default_value = "backups")]
        output: PathBuf,
    },
    /// Restore one service's data from an artifact.
    Restore {
        /// Service to restore into.
        service: String,

        /// Path to the backup artifact.
        artifact: PathBuf,
    },
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `devstack completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────
