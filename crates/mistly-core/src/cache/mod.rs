// ── Local persistent cache ──
//
// Disk-backed snapshot of every API-fetched entity, partitioned per
// organization, with derived O(1) lookup indexes that are rebuilt in
// full whenever the snapshot changes.

mod accessor;
mod indexes;
pub mod integrity;
mod manager;
mod memory;
pub mod persist;
mod stats;
mod store;
mod verify;

pub use accessor::CacheAccessor;
pub use indexes::{CacheIndexes, DeviceIndex, EntityIndex, SiteWlanIndex};
pub use integrity::{FileMetadata, create_file_metadata, metadata_path_for, verify_file_integrity};
pub use manager::{CacheManager, CacheOrigin};
pub use memory::{ApiCaches, MemoryCache, ttl};
pub use stats::CacheStats;
pub use store::{
    CACHE_VERSION, Cache, DeviceMap, DeviceMaps, OrgData, ProfileData, SiteData, TemplateData,
    WlanData,
};
pub use verify::{READINESS_ATTEMPTS, READINESS_INITIAL_BACKOFF, verify_cache_integrity};
