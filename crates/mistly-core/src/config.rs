// ── Runtime cache configuration ──
//
// Describes *where* the cache lives and how long it stays fresh. The
// config crate builds a `CacheSettings` from files and environment and
// hands it in; core never reads configuration files itself.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name used when only a cache directory is configured.
pub const DEFAULT_CACHE_FILE: &str = "cache.json";

/// Default freshness window for the on-disk cache.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Settings for one [`CacheManager`](crate::CacheManager).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Primary cache file.
    pub path: PathBuf,
    /// Age after which the on-disk cache is discarded. `None` disables expiry.
    pub ttl: Option<Duration>,
}

impl CacheSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: Some(DEFAULT_CACHE_TTL),
        }
    }

    /// Apply a TTL expressed in seconds; zero or negative disables expiry.
    #[must_use]
    pub fn with_ttl_secs(mut self, secs: i64) -> Self {
        self.ttl = u64::try_from(secs)
            .ok()
            .filter(|s| *s > 0)
            .map(Duration::from_secs);
        self
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl.filter(|d| !d.is_zero());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
