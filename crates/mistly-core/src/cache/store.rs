// ── Canonical cache store ──
//
// The serializable snapshot of everything known about every organization.
// Records are held behind `Arc` so the derived indexes can share the very
// same allocations; device maps are keyed by normalized MAC.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};
use crate::model::{
    Device, DeviceProfile, DeviceType, GatewayTemplate, Network, OrgStats, ProfileDetail,
    RfTemplate, Site, SiteSetting, Wlan, WlanTemplate, normalize_mac,
};

/// Schema version written on every save. Loads accept anything `>= 1`.
pub const CACHE_VERSION: u32 = 1;

/// Normalized MAC -> device record.
pub type DeviceMap = IndexMap<String, Arc<Device>>;

/// Root persisted object: `{ "version": 1, "orgs": { "<org_id>": { ... } } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cache {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub orgs: HashMap<String, OrgData>,
}

impl Cache {
    /// An empty cache at the current schema version.
    pub fn new() -> Self {
        Self {
            version: CACHE_VERSION,
            orgs: HashMap::new(),
        }
    }

    pub fn org(&self, org_id: &str) -> Option<&OrgData> {
        self.orgs.get(org_id)
    }

    /// Mutable access to an org's data, creating an empty entry if needed.
    pub fn org_mut(&mut self, org_id: &str) -> &mut OrgData {
        self.orgs.entry(org_id.to_owned()).or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.orgs.is_empty()
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

/// All data scoped to one organization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_stats: Option<Arc<OrgStats>>,
    pub sites: SiteData,
    pub templates: TemplateData,
    pub networks: Vec<Arc<Network>>,
    pub wlans: WlanData,
    pub inventory: DeviceMaps,
    pub profiles: ProfileData,
    pub configs: DeviceMaps,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteData {
    pub info: Vec<Arc<Site>>,
    pub settings: Vec<Arc<SiteSetting>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateData {
    pub rf: Vec<Arc<RfTemplate>>,
    pub gateway: Vec<Arc<GatewayTemplate>>,
    pub wlan: Vec<Arc<WlanTemplate>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WlanData {
    /// Org-scoped WLANs.
    pub org: Vec<Arc<Wlan>>,
    /// Site ID -> site-scoped WLANs.
    pub sites: HashMap<String, Vec<Arc<Wlan>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileData {
    pub devices: Vec<Arc<DeviceProfile>>,
    pub details: Vec<Arc<ProfileDetail>>,
}

/// Per-kind device maps, used for both inventory and configuration records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceMaps {
    pub ap: DeviceMap,
    pub switch: DeviceMap,
    pub gateway: DeviceMap,
}

impl DeviceMaps {
    /// The map holding devices of `kind`, or `None` for unsupported kinds.
    pub fn for_type(&self, kind: &DeviceType) -> Option<&DeviceMap> {
        match kind {
            DeviceType::Ap => Some(&self.ap),
            DeviceType::Switch => Some(&self.switch),
            DeviceType::Gateway => Some(&self.gateway),
            DeviceType::Other(_) => None,
        }
    }

    pub fn for_type_mut(&mut self, kind: &DeviceType) -> Option<&mut DeviceMap> {
        match kind {
            DeviceType::Ap => Some(&mut self.ap),
            DeviceType::Switch => Some(&mut self.switch),
            DeviceType::Gateway => Some(&mut self.gateway),
            DeviceType::Other(_) => None,
        }
    }

    /// Store a device under its normalized MAC in the map for its kind.
    ///
    /// Returns the previous record at that key. Devices without a type, or
    /// of a kind the cache has no map for, are rejected.
    pub fn insert(&mut self, device: Device) -> Result<Option<Arc<Device>>> {
        let key = device.normalized_mac();
        if key.is_empty() {
            return Err(CacheError::Invalid {
                message: format!("device {} has no MAC address", device.id.as_str()),
            });
        }
        let Some(kind) = device.kind() else {
            return Err(CacheError::Invalid {
                message: format!("device {key} has no type"),
            });
        };
        let map = self.for_type_mut(kind).ok_or_else(|| CacheError::Invalid {
            message: format!("device {key} has unsupported type '{kind}'"),
        })?;
        Ok(map.insert(key, Arc::new(device)))
    }

    pub fn get(&self, mac: &str) -> Option<&Arc<Device>> {
        let key = normalize_mac(mac);
        self.ap
            .get(&key)
            .or_else(|| self.switch.get(&key))
            .or_else(|| self.gateway.get(&key))
    }

    /// Iterate `(kind, map)` pairs in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (DeviceType, &DeviceMap)> {
        [
            (DeviceType::Ap, &self.ap),
            (DeviceType::Switch, &self.switch),
            (DeviceType::Gateway, &self.gateway),
        ]
        .into_iter()
    }

    pub fn len(&self) -> usize {
        self.ap.len() + self.switch.len() + self.gateway.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
