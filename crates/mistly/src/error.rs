//! CLI error types with miette diagnostics.
//!
//! Maps `CacheError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use mistly_config::ConfigError;
use mistly_core::CacheError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CORRUPT: i32 = 5;
    pub const CONFIG: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Lookups ──────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found in cache")]
    #[diagnostic(
        code(mistly::not_found),
        help("Run: mistly cache stats to see what the cache holds")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    // ── Cache file ───────────────────────────────────────────────────
    #[error("Cache at {path} is corrupt: {reason}")]
    #[diagnostic(
        code(mistly::corrupt_cache),
        help("Discard it with: mistly cache clear")
    )]
    Corrupt { path: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(mistly::cache))]
    Cache(CacheError),

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(mistly::config),
        help("Check the config file or MISTLY_* environment variables")
    )]
    Config(#[from] ConfigError),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mistly::validation))]
    Validation { field: String, reason: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(mistly::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Corrupt { .. } => exit_code::CORRUPT,
            Self::Config(_) => exit_code::CONFIG,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Cache(_) | Self::Io(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }
}

// ── CacheError → CliError mapping ────────────────────────────────────

impl From<CacheError> for CliError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::NotFound { entity, key } => CliError::NotFound {
                resource_type: entity.into(),
                identifier: key,
            },
            CacheError::Integrity { path, reason } => CliError::Corrupt {
                path: path.display().to_string(),
                reason,
            },
            CacheError::Serialization { path, source } => CliError::Corrupt {
                path: path.display().to_string(),
                reason: source.to_string(),
            },
            CacheError::UnsupportedVersion { found, minimum } => CliError::Corrupt {
                path: "(cache)".into(),
                reason: format!("version {found} is older than {minimum}"),
            },
            CacheError::Inconsistent { message } => CliError::Corrupt {
                path: "(indexes)".into(),
                reason: message,
            },
            other => CliError::Cache(other),
        }
    }
}
