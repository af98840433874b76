// ── Startup readiness and integrity verification ──
//
// Callers that may race cache construction poll for initialization with
// a short exponential backoff. Only "not yet initialized" is retried;
// any data error is returned immediately.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{CacheError, Result};

use super::integrity::verify_file_integrity;
use super::manager::CacheManager;

/// Number of readiness checks before giving up.
pub const READINESS_ATTEMPTS: u32 = 3;

/// Delay before the second check; doubles on each further attempt.
pub const READINESS_INITIAL_BACKOFF: Duration = Duration::from_millis(100);

/// Wait for `manager` to finish initializing, then check that its indexes
/// match its store and, when a cache file is on disk, that the file still
/// matches its integrity metadata.
pub async fn verify_cache_integrity(manager: &CacheManager) -> Result<()> {
    wait_until_initialized(manager).await?;

    manager.read(|cache, indexes| indexes.verify_against(cache))??;

    let path = manager.path();
    if path.exists() {
        verify_file_integrity(path, manager.metadata_path())?;
    }

    debug!(path = %path.display(), "cache integrity verified");
    Ok(())
}

async fn wait_until_initialized(manager: &CacheManager) -> Result<()> {
    let mut backoff = READINESS_INITIAL_BACKOFF;
    for attempt in 1..=READINESS_ATTEMPTS {
        if manager.is_initialized() {
            return Ok(());
        }
        if attempt < READINESS_ATTEMPTS {
            debug!(attempt, ?backoff, "cache not initialized yet; retrying");
            tokio::time::sleep(backoff).await;
            backoff *= 2;
        }
    }

    warn!(attempts = READINESS_ATTEMPTS, "cache never became ready");
    Err(CacheError::NotInitialized)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use super::*;
    use crate::config::CacheSettings;

    fn manager(dir: &std::path::Path) -> CacheManager {
        CacheManager::new(CacheSettings::new(dir.join("cache.json")))
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_three_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let mgr = manager(dir.path());

        let started = tokio::time::Instant::now();
        let result = verify_cache_integrity(&mgr).await;

        assert!(matches!(result, Err(CacheError::NotInitialized)));
        // 100ms + 200ms of backoff between the three checks.
        assert_eq!(started.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_once_initialized_during_backoff() {
        let dir = tempfile::tempdir().unwrap();
        let mgr = Arc::new(manager(dir.path()));

        let init = {
            let mgr = Arc::clone(&mgr);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(150)).await;
                mgr.initialize().unwrap();
            })
        };

        verify_cache_integrity(&mgr).await.unwrap();
        init.await.unwrap();
    }

    #[tokio::test]
    async fn integrity_failures_are_not_retried() {
        let dir = tempfile::tempdir().unwrap();
        let mgr = manager(dir.path());
        mgr.initialize().unwrap();
        mgr.save_cache().unwrap();

        fs::write(mgr.path(), b"{\"version\":1,\"orgs\":{},\"x\":1}").unwrap();

        assert!(matches!(
            verify_cache_integrity(&mgr).await,
            Err(CacheError::Integrity { .. })
        ));
    }
}
