//! Clap derive structures for the `keenroute` CLI.
//!
//! Defines the command tree and global flags.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// keenroute -- static route manager for Keenetic routers
#[derive(Debug, Parser)]
#[command(
    name = "keenroute",
    version,
    about = "Manage Keenetic static routes via the RCI API",
    long_about = "Upload, back up, resolve and clear static routes on Keenetic routers\n\
        using the NDMS RCI interface. Routes live in a grouped YAML file.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Router host, e.g. 192.168.100.1:280 (overrides config and KEENETIC_HOST)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Router username (overrides config and KEENETIC_USER)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Router password (overrides config and KEENETIC_PASSWORD)
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Request timeout in seconds [default: 30]
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
    /// Plain text, one destination per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload static routes from a YAML file
    #[command(alias = "up")]
    Upload(UploadArgs),

    /// Save the router's static routes to a YAML file
    Backup(BackupArgs),

    /// Remove all static routes from the router
    Clear,

    /// Resolve group domains to IPv4 hosts in a YAML file
    Resolve(ResolveArgs),

    /// Show the router's static routes
    #[command(alias = "ls")]
    List(ListArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Path to the YAML routes file
    #[arg(long, short = 'f')]
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct BackupArgs {
    /// Output YAML file path
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Skip routes without an IPv4 destination instead of failing
    #[arg(long)]
    pub skip_unsupported: bool,
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Path to the YAML routes file, updated in place
    #[arg(long, short = 'f')]
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    pub output: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the resolved configuration (password masked)
    Show,

    /// Print the config file location
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
