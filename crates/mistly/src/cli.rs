//! Clap derive structures for the `mistly` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mistly -- inspect and maintain the local Mist organization cache
#[derive(Debug, Parser)]
#[command(
    name = "mistly",
    version,
    about = "Inspect and maintain the local Mist organization cache",
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
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, env = "MISTLY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Cache file (overrides files.cache_path)
    #[arg(long, env = "MISTLY_CACHE_PATH", global = true)]
    pub cache_path: Option<PathBuf>,

    /// Cache freshness in seconds; 0 disables expiry (overrides files.cache_ttl)
    #[arg(long, env = "MISTLY_CACHE_TTL", global = true, allow_negative_numbers = true)]
    pub ttl: Option<i64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MISTLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
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
    /// Inspect and maintain the on-disk organization cache
    #[command(alias = "c")]
    Cache(CacheArgs),
}

#[derive(Debug, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Show entity counts for the current cache
    Stats,

    /// Check index consistency and the file checksum
    Verify,

    /// Show one organization's cached collections
    Show {
        /// Organization ID
        org_id: String,
    },

    /// Look up a cached inventory device
    Lookup(LookupArgs),

    /// Discard the cache and write an empty one
    Clear,
}

#[derive(Debug, Args)]
#[command(group(clap::ArgGroup::new("key").required(true).args(["mac", "name"])))]
pub struct LookupArgs {
    /// Device MAC address, any common notation
    #[arg(long)]
    pub mac: Option<String>,

    /// Device name (requires --kind)
    #[arg(long, requires = "kind")]
    pub name: Option<String>,

    /// Restrict to one device kind
    #[arg(long, value_enum)]
    pub kind: Option<DeviceKind>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DeviceKind {
    Ap,
    Switch,
    Gateway,
}
