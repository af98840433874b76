//! Local persistent cache for the Mist cloud API client.
//!
//! This crate owns the cached domain model and everything needed to keep
//! a disk-backed snapshot of it consistent:
//!
//! - **[`CacheManager`]** — Loads the cache file on start (honouring TTL
//!   expiry and integrity metadata), saves it atomically with a transient
//!   backup, and hands out `Arc` snapshots of the store and its indexes
//!   under a single read/write lock.
//!
//! - **[`Cache`] / [`OrgData`]** — The serializable per-organization
//!   snapshot: sites, templates, networks, WLANs, device inventory,
//!   device profiles and device configurations.
//!
//! - **[`CacheIndexes`]** — Flat by-name / by-ID / by-MAC / by-site maps,
//!   rebuilt in full from the store whenever it changes. Index entries
//!   share the store's allocations.
//!
//! - **[`CacheAccessor`]** — Typed lookups over the current indexes.
//!
//! - **[`MemoryCache`]** — Short-TTL in-process memoization used in front
//!   of API calls.

pub mod cache;
pub mod config;
pub mod error;
pub mod model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{
    ApiCaches, Cache, CacheAccessor, CacheIndexes, CacheManager, CacheOrigin, CacheStats,
    MemoryCache, OrgData, verify_cache_integrity,
};
pub use config::CacheSettings;
pub use error::CacheError;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Device, DeviceProfile, DeviceType, GatewayTemplate, MacAddress, Network, Nullable, OrgStats,
    ProfileDetail, RfTemplate, Site, SiteSetting, Wlan, WlanTemplate, normalize_mac,
};
