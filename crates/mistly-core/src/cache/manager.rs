// ── Cache manager ──
//
// Single authority over the on-disk cache: load with TTL and integrity
// checks, atomic save with a transient backup, and a `(Cache, Indexes)`
// pair that is always replaced as a unit under one read/write lock.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

use tracing::{debug, info, warn};

use crate::config::CacheSettings;
use crate::error::{CacheError, Result};

use super::accessor::CacheAccessor;
use super::indexes::CacheIndexes;
use super::integrity::{FileMetadata, metadata_path_for, verify_file_integrity};
use super::persist;
use super::stats::CacheStats;
use super::store::{CACHE_VERSION, Cache};

/// Tag recorded in the integrity sidecar of every cache file.
const METADATA_TAG: &str = "mistly-cache";

/// How the current generation came to be. Logged, and exposed for tests
/// and operator tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOrigin {
    /// Not initialized yet.
    Uninitialized,
    /// No cache file existed.
    Fresh,
    /// Caller asked for an empty cache.
    ForcedRecreate,
    /// The cache file was older than the configured TTL.
    Expired,
    /// Deserialized from the cache file.
    Disk,
    /// Installed by `replace_cache` or `update_cache`.
    Replaced,
}

struct State {
    cache: Arc<Cache>,
    indexes: Arc<CacheIndexes>,
    initialized: bool,
    origin: CacheOrigin,
}

impl State {
    fn install(&mut self, cache: Cache, origin: CacheOrigin) {
        let indexes = CacheIndexes::build(&cache);
        self.cache = Arc::new(cache);
        self.indexes = Arc::new(indexes);
        self.origin = origin;
    }
}

/// Owns the cache store and its indexes.
///
/// Readers get `Arc` snapshots: a concurrent `replace_cache` swaps the
/// manager's pointers but never mutates a published generation, so a
/// reader can keep traversing what it was handed. Two separate calls may
/// observe different generations; use [`read`](Self::read),
/// [`read_cache`](Self::read_cache) or [`read_indexes`](Self::read_indexes)
/// when several reads must agree.
///
/// At most one manager should back a given cache file at a time.
pub struct CacheManager {
    settings: CacheSettings,
    metadata_path: PathBuf,
    backup_path: PathBuf,
    temp_path: PathBuf,
    state: RwLock<State>,
}

impl CacheManager {
    pub fn new(settings: CacheSettings) -> Self {
        let metadata_path = metadata_path_for(&settings.path);
        let backup_path = persist::sibling_with_suffix(&settings.path, ".backup");
        let temp_path = persist::sibling_with_suffix(&settings.path, ".tmp");
        let empty = Cache::new();
        let indexes = CacheIndexes::build(&empty);

        Self {
            settings,
            metadata_path,
            backup_path,
            temp_path,
            state: RwLock::new(State {
                cache: Arc::new(empty),
                indexes: Arc::new(indexes),
                initialized: false,
                origin: CacheOrigin::Uninitialized,
            }),
        }
    }

    // ── Paths ────────────────────────────────────────────────────────

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    pub fn path(&self) -> &Path {
        &self.settings.path
    }

    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    fn metadata_temp_path(&self) -> PathBuf {
        persist::sibling_with_suffix(&self.metadata_path, ".tmp")
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Load the cache from disk, or start empty when there is nothing
    /// usable to load. Idempotent.
    pub fn initialize(&self) -> Result<()> {
        self.initialize_with_options(false)
    }

    /// Like [`initialize`](Self::initialize); with `force_recreate` the
    /// cache file is ignored and the manager starts empty.
    ///
    /// A missing or expired cache file is not an error. A file that fails
    /// integrity verification or carries an unsupported version is, and
    /// leaves the manager uninitialized.
    pub fn initialize_with_options(&self, force_recreate: bool) -> Result<()> {
        let mut state = self.write()?;
        if state.initialized {
            debug!("cache manager already initialized");
            return Ok(());
        }

        let path = self.path();
        let (cache, origin) = if force_recreate {
            (Cache::new(), CacheOrigin::ForcedRecreate)
        } else if !path.exists() {
            (Cache::new(), CacheOrigin::Fresh)
        } else if self.is_expired()? {
            (Cache::new(), CacheOrigin::Expired)
        } else {
            (self.load_from_disk()?, CacheOrigin::Disk)
        };

        state.install(cache, origin);
        state.initialized = true;

        info!(
            path = %path.display(),
            ?origin,
            orgs = state.cache.orgs.len(),
            devices = state.indexes.device_count(),
            "cache initialized"
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.state.read().is_ok_and(|s| s.initialized)
    }

    pub fn origin(&self) -> CacheOrigin {
        self.state
            .read()
            .map_or(CacheOrigin::Uninitialized, |s| s.origin)
    }

    /// When the cache was last written: the sidecar's mtime if present,
    /// otherwise the cache file's own.
    pub fn last_modified(&self) -> Result<SystemTime> {
        let meta = fs::metadata(&self.metadata_path).or_else(|_| fs::metadata(self.path()));
        meta.and_then(|m| m.modified())
            .map_err(|e| CacheError::io(self.path(), e))
    }

    fn is_expired(&self) -> Result<bool> {
        let Some(ttl) = self.settings.ttl else {
            return Ok(false);
        };

        let modified = self.last_modified()?;
        // A timestamp in the future counts as brand new.
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or_default();
        let expired = age >= ttl;
        if expired {
            warn!(
                path = %self.path().display(),
                age_secs = age.as_secs(),
                ttl_secs = ttl.as_secs(),
                "cache expired; starting empty"
            );
        }
        Ok(expired)
    }

    fn load_from_disk(&self) -> Result<Cache> {
        let path = self.path();
        verify_file_integrity(path, &self.metadata_path)?;

        let raw = fs::read(path).map_err(|e| CacheError::io(path, e))?;
        let cache: Cache =
            serde_json::from_slice(&raw).map_err(|source| CacheError::Serialization {
                path: path.to_path_buf(),
                source,
            })?;

        ensure_supported(&cache)?;
        debug!(path = %path.display(), bytes = raw.len(), "loaded cache from disk");
        Ok(cache)
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Persist the current cache to disk.
    pub fn save_cache(&self) -> Result<()> {
        let mut state = self.write()?;
        ensure_initialized(&state)?;
        self.save_to_disk(&mut state)
    }

    /// Backup, stage, rename, refresh the sidecar, drop the backup.
    ///
    /// Anything failing before the data rename leaves the previous cache
    /// file byte-for-byte intact. The data and metadata renames are two
    /// separate steps; a crash between them leaves a file that fails
    /// verification on the next load.
    fn save_to_disk(&self, state: &mut State) -> Result<()> {
        let path = self.path();
        persist::ensure_parent_dir(path)?;

        if path.exists() {
            persist::copy_atomic(path, &self.backup_path)?;
        }

        if state.cache.version != CACHE_VERSION {
            Arc::make_mut(&mut state.cache).version = CACHE_VERSION;
        }

        let bytes = serde_json::to_vec_pretty(state.cache.as_ref()).map_err(|source| {
            CacheError::Serialization {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let meta = FileMetadata::for_bytes(&bytes, METADATA_TAG).to_json(&self.metadata_path)?;
        let meta_tmp = self.metadata_temp_path();

        let staged = persist::stage(&self.temp_path, &bytes)
            .and_then(|()| persist::stage(&meta_tmp, &meta));
        if let Err(e) = staged {
            discard_staged(&self.temp_path);
            discard_staged(&meta_tmp);
            return Err(e);
        }

        if let Err(e) = persist::commit(&self.temp_path, path) {
            discard_staged(&meta_tmp);
            return Err(e);
        }
        persist::commit(&meta_tmp, &self.metadata_path)?;
        persist::remove_if_exists(&self.backup_path)?;

        debug!(path = %path.display(), bytes = bytes.len(), "cache saved");
        Ok(())
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Install `cache` as the new generation, rebuild indexes and persist.
    ///
    /// Validation failures leave the manager untouched. If persisting
    /// fails, the new generation stays in memory and the error is
    /// returned; a later `save_cache` can retry.
    pub fn replace_cache(&self, cache: Cache) -> Result<()> {
        ensure_supported(&cache)?;

        let mut state = self.write()?;
        ensure_initialized(&state)?;
        state.install(cache, CacheOrigin::Replaced);
        info!(
            orgs = state.cache.orgs.len(),
            devices = state.indexes.device_count(),
            "cache replaced"
        );
        self.save_to_disk(&mut state)
    }

    /// Mutate a copy of the current cache and install it with fresh
    /// indexes. Does not persist; follow with [`save_cache`](Self::save_cache).
    ///
    /// Readers holding the previous generation keep seeing it unchanged.
    pub fn update_cache<R>(&self, f: impl FnOnce(&mut Cache) -> R) -> Result<R> {
        let mut state = self.write()?;
        ensure_initialized(&state)?;

        let mut next = Cache::clone(&state.cache);
        let out = f(&mut next);
        ensure_supported(&next)?;
        state.install(next, CacheOrigin::Replaced);
        Ok(out)
    }

    // ── Readers ──────────────────────────────────────────────────────

    /// The current cache generation.
    pub fn cache(&self) -> Result<Arc<Cache>> {
        let state = self.read_state()?;
        Ok(Arc::clone(&state.cache))
    }

    /// The indexes of the current generation.
    pub fn indexes(&self) -> Result<Arc<CacheIndexes>> {
        let state = self.read_state()?;
        Ok(Arc::clone(&state.indexes))
    }

    /// Run `f` against the cache while holding the read lock.
    pub fn read_cache<R>(&self, f: impl FnOnce(&Cache) -> R) -> Result<R> {
        let state = self.read_state()?;
        Ok(f(&state.cache))
    }

    /// Run `f` against the indexes while holding the read lock.
    pub fn read_indexes<R>(&self, f: impl FnOnce(&CacheIndexes) -> R) -> Result<R> {
        let state = self.read_state()?;
        Ok(f(&state.indexes))
    }

    /// Run `f` against a matching cache/indexes pair.
    pub fn read<R>(&self, f: impl FnOnce(&Cache, &CacheIndexes) -> R) -> Result<R> {
        let state = self.read_state()?;
        Ok(f(&state.cache, &state.indexes))
    }

    /// Entity counts across all organizations.
    pub fn cache_stats(&self) -> Result<CacheStats> {
        let cache = self.cache()?;
        Ok(CacheStats::collect(&cache))
    }

    /// Typed lookups over this manager's indexes.
    pub fn accessor(&self) -> CacheAccessor<'_> {
        CacheAccessor::new(self)
    }

    // ── Lock helpers ─────────────────────────────────────────────────

    fn read_state(&self) -> Result<RwLockReadGuard<'_, State>> {
        let state = self.state.read()?;
        ensure_initialized(&state)?;
        Ok(state)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>> {
        Ok(self.state.write()?)
    }
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("path", &self.settings.path)
            .field("ttl", &self.settings.ttl)
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

fn ensure_initialized(state: &State) -> Result<()> {
    if state.initialized {
        Ok(())
    } else {
        Err(CacheError::NotInitialized)
    }
}

fn ensure_supported(cache: &Cache) -> Result<()> {
    if cache.version < CACHE_VERSION {
        return Err(CacheError::UnsupportedVersion {
            found: cache.version,
            minimum: CACHE_VERSION,
        });
    }
    Ok(())
}

/// Best-effort removal of a staging file after a failed save. The save
/// error is what the caller sees; a cleanup failure is only logged.
fn discard_staged(path: &Path) {
    if let Err(e) = persist::remove_if_exists(path) {
        warn!(path = %path.display(), error = %e, "failed to remove staging file");
    }
}
