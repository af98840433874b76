// ── Derived lookup indexes ──
//
// Flat O(1) lookup maps built in one pass over a `Cache`. Every entry is
// an `Arc` clone of a record owned by that cache, never a copy, and the
// whole structure is rebuilt from scratch whenever the cache changes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{CacheError, Result};
use crate::model::{
    CacheEntity, Device, DeviceProfile, DeviceType, GatewayTemplate, Network, OrgStats, ProfileDetail,
    RfTemplate, Site, SiteSetting, Wlan, WlanTemplate, normalize_mac,
};

use super::store::{Cache, DeviceMap, DeviceMaps, OrgData};

/// By-name and by-ID maps for one entity type.
///
/// Empty names and IDs are never indexed. When two records share a key
/// the one visited last wins; organizations are visited in sorted order,
/// so the winner is stable across rebuilds.
#[derive(Debug, Clone)]
pub struct EntityIndex<T> {
    pub by_name: HashMap<String, Arc<T>>,
    pub by_id: HashMap<String, Arc<T>>,
}

impl<T> Default for EntityIndex<T> {
    fn default() -> Self {
        Self {
            by_name: HashMap::new(),
            by_id: HashMap::new(),
        }
    }
}

impl<T: CacheEntity> EntityIndex<T> {
    fn insert(&mut self, item: &Arc<T>) {
        let id = item.id().to_owned();
        self.insert_with_id(id, item);
    }

    fn insert_with_id(&mut self, id: String, item: &Arc<T>) {
        let name = item.name();
        if !name.is_empty() {
            self.by_name.insert(name.to_owned(), Arc::clone(item));
        }
        if !id.is_empty() {
            self.by_id.insert(id, Arc::clone(item));
        }
    }

    fn extend<'a>(&mut self, items: impl IntoIterator<Item = &'a Arc<T>>)
    where
        T: 'a,
    {
        for item in items {
            self.insert(item);
        }
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Arc<T>> {
        self.by_name.get(name)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Arc<T>> {
        self.by_id.get(id)
    }

    /// Number of distinct IDs indexed.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty() && self.by_name.is_empty()
    }
}

/// Lookup maps for one device kind (inventory or configuration records).
#[derive(Debug, Clone, Default)]
pub struct DeviceIndex {
    pub by_name: HashMap<String, Arc<Device>>,
    pub by_id: HashMap<String, Arc<Device>>,
    /// Normalized MAC -> device.
    pub by_mac: HashMap<String, Arc<Device>>,
    /// Site ID -> devices assigned to that site, in store order.
    pub by_site: HashMap<String, Vec<Arc<Device>>>,
}

impl DeviceIndex {
    fn extend(&mut self, devices: &DeviceMap) {
        for (mac, device) in devices {
            self.by_mac.insert(normalize_mac(mac), Arc::clone(device));
            if !device.name().is_empty() {
                self.by_name.insert(device.name().to_owned(), Arc::clone(device));
            }
            if !device.id().is_empty() {
                self.by_id.insert(device.id().to_owned(), Arc::clone(device));
            }
            if let Some(site) = device.assigned_site() {
                self.by_site
                    .entry(site.to_owned())
                    .or_default()
                    .push(Arc::clone(device));
            }
        }
    }

    pub fn get_by_mac(&self, mac: &str) -> Option<&Arc<Device>> {
        self.by_mac.get(&normalize_mac(mac))
    }

    pub fn len(&self) -> usize {
        self.by_mac.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_mac.is_empty()
    }
}

/// Two-level maps for site-scoped WLANs: site ID -> SSID / WLAN ID -> WLAN.
#[derive(Debug, Clone, Default)]
pub struct SiteWlanIndex {
    pub by_name: HashMap<String, HashMap<String, Arc<Wlan>>>,
    pub by_id: HashMap<String, HashMap<String, Arc<Wlan>>>,
}

impl SiteWlanIndex {
    fn insert(&mut self, site_id: &str, wlan: &Arc<Wlan>) {
        if !wlan.name().is_empty() {
            self.by_name
                .entry(site_id.to_owned())
                .or_default()
                .insert(wlan.name().to_owned(), Arc::clone(wlan));
        }
        if !wlan.id().is_empty() {
            self.by_id
                .entry(site_id.to_owned())
                .or_default()
                .insert(wlan.id().to_owned(), Arc::clone(wlan));
        }
    }

    pub fn get_by_name(&self, site_id: &str, ssid: &str) -> Option<&Arc<Wlan>> {
        self.by_name.get(site_id)?.get(ssid)
    }

    pub fn get_by_id(&self, site_id: &str, id: &str) -> Option<&Arc<Wlan>> {
        self.by_id.get(site_id)?.get(id)
    }
}

/// Every lookup map derived from a [`Cache`].
#[derive(Debug, Clone, Default)]
pub struct CacheIndexes {
    /// Keyed by the org ID the cache stores the data under.
    pub orgs: EntityIndex<OrgStats>,
    pub sites: EntityIndex<Site>,
    pub site_settings: EntityIndex<SiteSetting>,
    /// Site ID -> settings record for that site.
    pub site_settings_by_site: HashMap<String, Arc<SiteSetting>>,
    pub rf_templates: EntityIndex<RfTemplate>,
    pub gateway_templates: EntityIndex<GatewayTemplate>,
    pub wlan_templates: EntityIndex<WlanTemplate>,
    pub networks: EntityIndex<Network>,
    pub org_wlans: EntityIndex<Wlan>,
    pub site_wlans: SiteWlanIndex,
    pub device_profiles: EntityIndex<DeviceProfile>,
    pub device_profile_details: EntityIndex<ProfileDetail>,
    pub aps: DeviceIndex,
    pub switches: DeviceIndex,
    pub gateways: DeviceIndex,
    pub ap_configs: DeviceIndex,
    pub switch_configs: DeviceIndex,
    pub gateway_configs: DeviceIndex,
}

impl CacheIndexes {
    /// Build every index in one linear pass over `cache`.
    pub fn build(cache: &Cache) -> Self {
        let mut idx = Self::default();

        let mut org_ids: Vec<&String> = cache.orgs.keys().collect();
        org_ids.sort();

        for org_id in org_ids {
            let Some(org) = cache.orgs.get(org_id) else {
                continue;
            };

            if let Some(stats) = &org.org_stats {
                idx.orgs.insert_with_id(org_id.clone(), stats);
            }

            idx.sites.extend(&org.sites.info);
            for setting in &org.sites.settings {
                idx.site_settings.insert(setting);
                if let Some(site_id) = setting.site_id.as_deref().filter(|s| !s.is_empty()) {
                    idx.site_settings_by_site
                        .insert(site_id.to_owned(), Arc::clone(setting));
                }
            }

            idx.rf_templates.extend(&org.templates.rf);
            idx.gateway_templates.extend(&org.templates.gateway);
            idx.wlan_templates.extend(&org.templates.wlan);
            idx.networks.extend(&org.networks);

            idx.org_wlans.extend(&org.wlans.org);
            for (site_id, wlans) in &org.wlans.sites {
                for wlan in wlans {
                    idx.site_wlans.insert(site_id, wlan);
                }
            }

            idx.device_profiles.extend(&org.profiles.devices);
            idx.device_profile_details.extend(&org.profiles.details);

            idx.aps.extend(&org.inventory.ap);
            idx.switches.extend(&org.inventory.switch);
            idx.gateways.extend(&org.inventory.gateway);

            idx.ap_configs.extend(&org.configs.ap);
            idx.switch_configs.extend(&org.configs.switch);
            idx.gateway_configs.extend(&org.configs.gateway);
        }

        idx
    }

    /// Find an inventory device of any kind by MAC.
    pub fn device_by_mac(&self, mac: &str) -> Option<&Arc<Device>> {
        let key = normalize_mac(mac);
        self.aps
            .by_mac
            .get(&key)
            .or_else(|| self.switches.by_mac.get(&key))
            .or_else(|| self.gateways.by_mac.get(&key))
    }

    pub fn device_count(&self) -> usize {
        self.aps.len() + self.switches.len() + self.gateways.len()
    }

    /// Check that every inventory and config record of `cache` is reachable
    /// through these indexes by pointer identity.
    pub fn verify_against(&self, cache: &Cache) -> Result<()> {
        for (org_id, org) in &cache.orgs {
            DeviceCheck {
                cache,
                org_id,
                section: "inventory",
                select: inventory_of,
            }
            .run(&org.inventory, [&self.aps, &self.switches, &self.gateways])?;
            DeviceCheck {
                cache,
                org_id,
                section: "configs",
                select: configs_of,
            }
            .run(&org.configs, [
                &self.ap_configs,
                &self.switch_configs,
                &self.gateway_configs,
            ])?;
        }
        Ok(())
    }
}

fn inventory_of(org: &OrgData) -> &DeviceMaps {
    &org.inventory
}

fn configs_of(org: &OrgData) -> &DeviceMaps {
    &org.configs
}

struct DeviceCheck<'a> {
    cache: &'a Cache,
    org_id: &'a str,
    section: &'static str,
    select: fn(&OrgData) -> &DeviceMaps,
}

impl DeviceCheck<'_> {
    fn run(&self, maps: &DeviceMaps, indexes: [&DeviceIndex; 3]) -> Result<()> {
        for ((kind, map), index) in maps.iter().zip(indexes) {
            for (mac, device) in map {
                let key = normalize_mac(mac);
                let inconsistent = |what: &str| CacheError::Inconsistent {
                    message: format!(
                        "org {} {}.{kind} device {key}: {what}",
                        self.org_id, self.section
                    ),
                };

                let indexed = index
                    .by_mac
                    .get(&key)
                    .ok_or_else(|| inconsistent("missing from MAC index"))?;
                // The same MAC may live in several orgs; the index then holds
                // whichever one was visited last.
                if !Arc::ptr_eq(indexed, device) && !self.owned_elsewhere(&kind, &key, indexed) {
                    return Err(inconsistent("MAC index points at a record the cache does not own"));
                }
                let name = device.name();
                if !name.is_empty() && !index.by_name.contains_key(name) {
                    return Err(inconsistent("missing from name index"));
                }
                if let Some(site) = device.assigned_site() {
                    let listed = index
                        .by_site
                        .get(site)
                        .is_some_and(|list| list.iter().any(|d| Arc::ptr_eq(d, device)));
                    if !listed {
                        return Err(inconsistent("missing from site index"));
                    }
                }
            }
        }
        Ok(())
    }

    fn owned_elsewhere(&self, kind: &DeviceType, key: &str, indexed: &Arc<Device>) -> bool {
        self.cache.orgs.values().any(|org| {
            (self.select)(org)
                .for_type(kind)
                .and_then(|map| map.get(key))
                .is_some_and(|d| Arc::ptr_eq(d, indexed))
        })
    }
}
