// ── Device domain types ──

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::mac::normalize_mac;
use super::nullable::Nullable;
use super::{AdditionalFields, impl_cache_entity};

/// Device kind as reported by the inventory API.
///
/// Kinds the cache has no map for keep their upstream spelling so a
/// load/save round trip writes them back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Ap,
    Switch,
    Gateway,
    Other(String),
}

impl DeviceType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ap => "ap",
            Self::Switch => "switch",
            Self::Gateway => "gateway",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for DeviceType {
    fn from(raw: &str) -> Self {
        match raw {
            "ap" => Self::Ap,
            "switch" => Self::Switch,
            "gateway" => Self::Gateway,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DeviceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeviceType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// An access point, switch or gateway.
///
/// The same shape backs both inventory records and device configuration
/// records; the two are stored in separate maps because they come from
/// different API surfaces and may diverge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub mac: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub model: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub serial: Nullable<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Nullable::is_absent")]
    pub device_type: Nullable<DeviceType>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub site_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub deviceprofile_id: Nullable<String>,

    #[serde(flatten)]
    pub additional: AdditionalFields,
}

impl Device {
    /// Canonical map key for this device.
    pub fn normalized_mac(&self) -> String {
        normalize_mac(self.mac.as_str())
    }

    pub fn kind(&self) -> Option<&DeviceType> {
        self.device_type.value()
    }

    /// Assigned site, treating an empty string as unassigned.
    pub fn assigned_site(&self) -> Option<&str> {
        self.site_id.as_deref().filter(|s| !s.is_empty())
    }
}

impl_cache_entity!(Device, "device");
