// ── Device profiles ──

use serde::{Deserialize, Serialize};

use super::device::DeviceType;
use super::nullable::Nullable;
use super::{AdditionalFields, impl_cache_entity};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Nullable::is_absent")]
    pub device_type: Nullable<DeviceType>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub org_id: Nullable<String>,

    #[serde(flatten)]
    pub additional: AdditionalFields,
}

impl_cache_entity!(DeviceProfile, "device profile");

/// Full device-profile body, kept loosely typed.
pub type ProfileDetail = serde_json::Map<String, serde_json::Value>;

/// String member of a loosely typed record, e.g. `"id"` or `"name"`.
pub(crate) fn detail_str<'a>(detail: &'a ProfileDetail, key: &str) -> Option<&'a str> {
    detail
        .get(key)
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.is_empty())
}

impl super::CacheEntity for ProfileDetail {
    const KIND: &'static str = "device profile detail";

    fn id(&self) -> &str {
        detail_str(self, "id").unwrap_or_default()
    }

    fn name(&self) -> &str {
        detail_str(self, "name").unwrap_or_default()
    }
}
