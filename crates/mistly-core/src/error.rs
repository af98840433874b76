// ── Core error types ──
//
// Every cache operation returns `CacheError`. Absence of a cache file and
// TTL expiry are not errors (they resolve to an empty cache); corruption,
// version mismatches and I/O failures are, and they always carry the
// underlying cause.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CacheError {
    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("Cache manager is not initialized")]
    NotInitialized,

    #[error("Cache lock poisoned by a panicking writer")]
    LockPoisoned,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Unsupported cache version {found} (expected >= {minimum})")]
    UnsupportedVersion { found: u32, minimum: u32 },

    #[error("Invalid cache: {message}")]
    Invalid { message: String },

    #[error("Cache integrity check failed for {path}: {reason}")]
    Integrity { path: PathBuf, reason: String },

    #[error("Cache inconsistency: {message}")]
    Inconsistent { message: String },

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    // ── I/O and encoding errors ──────────────────────────────────────
    #[error("Cache I/O failed on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cache serialization failed for {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// `true` for lookups that simply missed, as opposed to real failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl<T> From<std::sync::PoisonError<T>> for CacheError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}

pub type Result<T, E = CacheError> = std::result::Result<T, E>;
