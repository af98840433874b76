// ── In-process TTL memoization ──
//
// Short-lived key -> value cache placed in front of API calls. Absence
// and expiry both read as `None`; nothing here ever errors. Staleness is
// bounded by the TTL and corrects itself.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::model::{CacheEntity, Device, DeviceProfile, Site};

struct Entry<T> {
    value: T,
    expires_at: Instant,
}

impl<T> Entry<T> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Key -> value map with a fixed per-instance TTL.
///
/// Also carries an independent site ID -> site name map that is not
/// subject to expiry.
pub struct MemoryCache<T> {
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry<T>>>,
    site_names: RwLock<HashMap<String, String>>,
}

impl<T: Clone> MemoryCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            site_names: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store `value`, expiring `ttl` from now.
    pub fn set(&self, key: impl Into<String>, value: T) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.into(), entry);
        }
    }

    /// The cached value, or `None` if absent or expired.
    ///
    /// An expired entry found here is evicted.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = Instant::now();
        {
            let entries = self.entries.read().ok()?;
            let entry = entries.get(key)?;
            if !entry.is_expired(now) {
                return Some(entry.value.clone());
            }
        }

        if let Ok(mut entries) = self.entries.write() {
            // Another writer may have refreshed the entry in between.
            if entries.get(key).is_some_and(|e| e.is_expired(now)) {
                entries.remove(key);
            }
        }
        None
    }

    pub fn delete(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let Ok(mut entries) = self.entries.write() else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired(now));
        before - entries.len()
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |e| e.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ── Site names ───────────────────────────────────────────────────

    pub fn site_name(&self, site_id: &str) -> Option<String> {
        self.site_names.read().ok()?.get(site_id).cloned()
    }

    pub fn set_site_name(&self, site_id: impl Into<String>, name: impl Into<String>) {
        if let Ok(mut names) = self.site_names.write() {
            names.insert(site_id.into(), name.into());
        }
    }

    /// Replace the site-name map with the names of `sites`.
    pub fn build_site_name_cache(&self, sites: &[Arc<Site>]) {
        let names: HashMap<String, String> = sites
            .iter()
            .filter(|s| !s.id().is_empty())
            .map(|s| (s.id().to_owned(), s.name().to_owned()))
            .collect();
        if let Ok(mut current) = self.site_names.write() {
            *current = names;
        }
    }
}

impl<T> std::fmt::Debug for MemoryCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Default TTLs for the API memoization layers.
pub mod ttl {
    use std::time::Duration;

    pub const SITES: Duration = Duration::from_secs(300);
    pub const APS: Duration = Duration::from_secs(60);
    pub const DEVICES: Duration = Duration::from_secs(60);
    pub const INVENTORY: Duration = Duration::from_secs(120);
    pub const DEVICE_PROFILES: Duration = Duration::from_secs(600);
}

/// The memoization caches sitting in front of network calls, keyed by
/// org or site ID.
#[derive(Debug)]
pub struct ApiCaches {
    pub sites: MemoryCache<Vec<Arc<Site>>>,
    pub aps: MemoryCache<Vec<Arc<Device>>>,
    pub devices: MemoryCache<Vec<Arc<Device>>>,
    pub inventory: MemoryCache<Vec<Arc<Device>>>,
    pub device_profiles: MemoryCache<Vec<Arc<DeviceProfile>>>,
}

impl ApiCaches {
    pub fn new() -> Self {
        Self {
            sites: MemoryCache::new(ttl::SITES),
            aps: MemoryCache::new(ttl::APS),
            devices: MemoryCache::new(ttl::DEVICES),
            inventory: MemoryCache::new(ttl::INVENTORY),
            device_profiles: MemoryCache::new(ttl::DEVICE_PROFILES),
        }
    }

    /// Forget everything, e.g. after a write through the API.
    pub fn clear_all(&self) {
        self.sites.clear();
        self.aps.clear();
        self.devices.clear();
        self.inventory.clear();
        self.device_profiles.clear();
    }
}

impl Default for ApiCaches {
    fn default() -> Self {
        Self::new()
    }
}
