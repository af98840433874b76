// ── Cached domain model ──
//
// Plain data records as returned by the cloud API. Every record keeps the
// fields the cache indexes on as typed `Nullable` members and carries
// everything else verbatim in `additional`, so a load/save round trip
// writes back exactly what was read, including missing keys and nulls.

/// Implements [`CacheEntity`] for structs with `id` and `name` members of
/// type `Nullable<String>`.
macro_rules! impl_cache_entity {
    ($ty:ty, $kind:literal) => {
        impl $crate::model::CacheEntity for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> &str {
                self.id.as_str()
            }

            fn name(&self) -> &str {
                self.name.as_str()
            }
        }
    };
}

pub(crate) use impl_cache_entity;

pub mod device;
pub mod mac;
pub mod network;
pub mod nullable;
pub mod org;
pub mod profile;
pub mod site;
pub mod template;
pub mod wlan;

// ── Re-exports ──────────────────────────────────────────────────────

pub use device::{Device, DeviceType};
pub use mac::{MacAddress, normalize_mac};
pub use network::Network;
pub use nullable::Nullable;
pub use org::OrgStats;
pub use profile::{DeviceProfile, ProfileDetail};
pub use site::{Site, SiteSetting};
pub use template::{GatewayTemplate, RfTemplate, WlanTemplate};
pub use wlan::Wlan;

/// Semi-structured bag of upstream fields not modelled explicitly.
pub type AdditionalFields = serde_json::Map<String, serde_json::Value>;

/// An entity the cache can index by identifier and display name.
pub trait CacheEntity {
    /// Human-readable kind, used in not-found errors and stats.
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Display name. Empty when the record has none.
    fn name(&self) -> &str;
}
