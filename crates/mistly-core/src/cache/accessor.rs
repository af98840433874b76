// ── Typed cache lookups ──
//
// Read-only facade over a manager's current indexes. Each lookup is a
// single map access against the generation current at call time; a miss
// is a `CacheError::NotFound`, never an empty success. "All" variants
// build a fresh `Vec` on every call.

use std::sync::Arc;

use crate::error::{CacheError, Result};
use crate::model::{
    CacheEntity, Device, DeviceProfile, DeviceType, GatewayTemplate, Network, OrgStats,
    ProfileDetail, RfTemplate, Site, SiteSetting, Wlan, WlanTemplate, normalize_mac,
};

use super::indexes::{CacheIndexes, DeviceIndex};
use super::manager::CacheManager;
use super::store::{DeviceMap, OrgData};

/// Typed by-name / by-ID / by-MAC / by-site lookups.
///
/// Takes no locks of its own: every call fetches the manager's current
/// indexes, so consecutive calls may see different generations if a
/// replace happens in between.
#[derive(Debug, Clone, Copy)]
pub struct CacheAccessor<'a> {
    manager: &'a CacheManager,
}

impl<'a> CacheAccessor<'a> {
    pub fn new(manager: &'a CacheManager) -> Self {
        Self { manager }
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn lookup<T>(
        &self,
        entity: &'static str,
        key: &str,
        pick: impl FnOnce(&CacheIndexes) -> Option<&Arc<T>>,
    ) -> Result<Arc<T>> {
        let indexes = self.manager.indexes()?;
        pick(indexes.as_ref())
            .cloned()
            .ok_or_else(|| CacheError::not_found(entity, key))
    }

    fn entity<T: CacheEntity>(
        &self,
        key: &str,
        pick: impl FnOnce(&CacheIndexes) -> Option<&Arc<T>>,
    ) -> Result<Arc<T>> {
        self.lookup(T::KIND, key, pick)
    }

    /// Flatten one collection across all orgs, in org-ID order.
    fn collect<T>(&self, pick: impl Fn(&OrgData) -> &[Arc<T>]) -> Result<Vec<Arc<T>>> {
        self.manager.read_cache(|cache| {
            let mut org_ids: Vec<&String> = cache.orgs.keys().collect();
            org_ids.sort();
            org_ids
                .into_iter()
                .filter_map(|id| cache.orgs.get(id))
                .flat_map(|org| pick(org).iter().cloned())
                .collect()
        })
    }

    fn devices_at_site(
        &self,
        entity: &'static str,
        site_id: &str,
        pick: impl FnOnce(&CacheIndexes) -> &DeviceIndex,
    ) -> Result<Vec<Arc<Device>>> {
        let indexes = self.manager.indexes()?;
        if let Some(devices) = pick(indexes.as_ref()).by_site.get(site_id) {
            return Ok(devices.clone());
        }
        // A known site with nothing of this kind is an empty answer, not a miss.
        if indexes.sites.get_by_id(site_id).is_some() {
            return Ok(Vec::new());
        }
        Err(CacheError::not_found(entity, format!("site {site_id}")))
    }

    fn all_devices(&self, pick: impl Fn(&OrgData) -> &DeviceMap) -> Result<Vec<Arc<Device>>> {
        self.manager.read_cache(|cache| {
            let mut org_ids: Vec<&String> = cache.orgs.keys().collect();
            org_ids.sort();
            org_ids
                .into_iter()
                .filter_map(|id| cache.orgs.get(id))
                .flat_map(|org| pick(org).values().cloned())
                .collect()
        })
    }

    // ── Organizations ────────────────────────────────────────────────

    pub fn org_by_id(&self, org_id: &str) -> Result<Arc<OrgStats>> {
        self.entity(org_id, |i| i.orgs.get_by_id(org_id))
    }

    pub fn org_by_name(&self, name: &str) -> Result<Arc<OrgStats>> {
        self.entity(name, |i| i.orgs.get_by_name(name))
    }

    /// IDs of every cached organization, sorted.
    pub fn org_ids(&self) -> Result<Vec<String>> {
        self.manager.read_cache(|cache| {
            let mut ids: Vec<String> = cache.orgs.keys().cloned().collect();
            ids.sort();
            ids
        })
    }

    // ── Sites ────────────────────────────────────────────────────────

    pub fn site_by_id(&self, id: &str) -> Result<Arc<Site>> {
        self.entity(id, |i| i.sites.get_by_id(id))
    }

    pub fn site_by_name(&self, name: &str) -> Result<Arc<Site>> {
        self.entity(name, |i| i.sites.get_by_name(name))
    }

    pub fn all_sites(&self) -> Result<Vec<Arc<Site>>> {
        self.collect(|org| org.sites.info.as_slice())
    }

    pub fn site_setting_by_id(&self, id: &str) -> Result<Arc<SiteSetting>> {
        self.entity(id, |i| i.site_settings.get_by_id(id))
    }

    pub fn site_setting_by_name(&self, name: &str) -> Result<Arc<SiteSetting>> {
        self.entity(name, |i| i.site_settings.get_by_name(name))
    }

    pub fn site_setting_for_site(&self, site_id: &str) -> Result<Arc<SiteSetting>> {
        self.entity(site_id, |i| i.site_settings_by_site.get(site_id))
    }

    // ── Templates ────────────────────────────────────────────────────

    pub fn rf_template_by_id(&self, id: &str) -> Result<Arc<RfTemplate>> {
        self.entity(id, |i| i.rf_templates.get_by_id(id))
    }

    pub fn rf_template_by_name(&self, name: &str) -> Result<Arc<RfTemplate>> {
        self.entity(name, |i| i.rf_templates.get_by_name(name))
    }

    pub fn all_rf_templates(&self) -> Result<Vec<Arc<RfTemplate>>> {
        self.collect(|org| org.templates.rf.as_slice())
    }

    pub fn gateway_template_by_id(&self, id: &str) -> Result<Arc<GatewayTemplate>> {
        self.entity(id, |i| i.gateway_templates.get_by_id(id))
    }

    pub fn gateway_template_by_name(&self, name: &str) -> Result<Arc<GatewayTemplate>> {
        self.entity(name, |i| i.gateway_templates.get_by_name(name))
    }

    pub fn all_gateway_templates(&self) -> Result<Vec<Arc<GatewayTemplate>>> {
        self.collect(|org| org.templates.gateway.as_slice())
    }

    pub fn wlan_template_by_id(&self, id: &str) -> Result<Arc<WlanTemplate>> {
        self.entity(id, |i| i.wlan_templates.get_by_id(id))
    }

    pub fn wlan_template_by_name(&self, name: &str) -> Result<Arc<WlanTemplate>> {
        self.entity(name, |i| i.wlan_templates.get_by_name(name))
    }

    pub fn all_wlan_templates(&self) -> Result<Vec<Arc<WlanTemplate>>> {
        self.collect(|org| org.templates.wlan.as_slice())
    }

    // ── Networks ─────────────────────────────────────────────────────

    pub fn network_by_id(&self, id: &str) -> Result<Arc<Network>> {
        self.entity(id, |i| i.networks.get_by_id(id))
    }

    pub fn network_by_name(&self, name: &str) -> Result<Arc<Network>> {
        self.entity(name, |i| i.networks.get_by_name(name))
    }

    pub fn all_networks(&self) -> Result<Vec<Arc<Network>>> {
        self.collect(|org| org.networks.as_slice())
    }

    // ── WLANs ────────────────────────────────────────────────────────

    pub fn org_wlan_by_id(&self, id: &str) -> Result<Arc<Wlan>> {
        self.entity(id, |i| i.org_wlans.get_by_id(id))
    }

    pub fn org_wlan_by_name(&self, ssid: &str) -> Result<Arc<Wlan>> {
        self.entity(ssid, |i| i.org_wlans.get_by_name(ssid))
    }

    pub fn all_org_wlans(&self) -> Result<Vec<Arc<Wlan>>> {
        self.collect(|org| org.wlans.org.as_slice())
    }

    pub fn site_wlan_by_name(&self, site_id: &str, ssid: &str) -> Result<Arc<Wlan>> {
        let key = format!("{site_id}/{ssid}");
        self.entity(&key, |i| i.site_wlans.get_by_name(site_id, ssid))
    }

    pub fn site_wlan_by_id(&self, site_id: &str, id: &str) -> Result<Arc<Wlan>> {
        let key = format!("{site_id}/{id}");
        self.entity(&key, |i| i.site_wlans.get_by_id(site_id, id))
    }

    /// Every WLAN scoped to `site_id`, in store order.
    pub fn site_wlans(&self, site_id: &str) -> Result<Vec<Arc<Wlan>>> {
        self.collect(|org| org.wlans.sites.get(site_id).map_or(&[][..], Vec::as_slice))
    }

    // ── Inventory: access points ─────────────────────────────────────

    pub fn ap_by_mac(&self, mac: &str) -> Result<Arc<Device>> {
        self.lookup("AP", mac, |i| i.aps.get_by_mac(mac))
    }

    pub fn ap_by_name(&self, name: &str) -> Result<Arc<Device>> {
        self.lookup("AP", name, |i| i.aps.by_name.get(name))
    }

    pub fn ap_by_id(&self, id: &str) -> Result<Arc<Device>> {
        self.lookup("AP", id, |i| i.aps.by_id.get(id))
    }

    pub fn aps_by_site(&self, site_id: &str) -> Result<Vec<Arc<Device>>> {
        self.devices_at_site("AP", site_id, |i| &i.aps)
    }

    pub fn all_aps(&self) -> Result<Vec<Arc<Device>>> {
        self.all_devices(|org| &org.inventory.ap)
    }

    // ── Inventory: switches ──────────────────────────────────────────

    pub fn switch_by_mac(&self, mac: &str) -> Result<Arc<Device>> {
        self.lookup("switch", mac, |i| i.switches.get_by_mac(mac))
    }

    pub fn switch_by_name(&self, name: &str) -> Result<Arc<Device>> {
        self.lookup("switch", name, |i| i.switches.by_name.get(name))
    }

    pub fn switch_by_id(&self, id: &str) -> Result<Arc<Device>> {
        self.lookup("switch", id, |i| i.switches.by_id.get(id))
    }

    pub fn switches_by_site(&self, site_id: &str) -> Result<Vec<Arc<Device>>> {
        self.devices_at_site("switch", site_id, |i| &i.switches)
    }

    pub fn all_switches(&self) -> Result<Vec<Arc<Device>>> {
        self.all_devices(|org| &org.inventory.switch)
    }

    // ── Inventory: gateways ──────────────────────────────────────────

    pub fn gateway_by_mac(&self, mac: &str) -> Result<Arc<Device>> {
        self.lookup("gateway", mac, |i| i.gateways.get_by_mac(mac))
    }

    pub fn gateway_by_name(&self, name: &str) -> Result<Arc<Device>> {
        self.lookup("gateway", name, |i| i.gateways.by_name.get(name))
    }

    pub fn gateway_by_id(&self, id: &str) -> Result<Arc<Device>> {
        self.lookup("gateway", id, |i| i.gateways.by_id.get(id))
    }

    pub fn gateways_by_site(&self, site_id: &str) -> Result<Vec<Arc<Device>>> {
        self.devices_at_site("gateway", site_id, |i| &i.gateways)
    }

    pub fn all_gateways(&self) -> Result<Vec<Arc<Device>>> {
        self.all_devices(|org| &org.inventory.gateway)
    }

    // ── Inventory: any kind ──────────────────────────────────────────

    /// Find an inventory device of any kind by MAC.
    pub fn device_by_mac(&self, mac: &str) -> Result<Arc<Device>> {
        self.lookup("device", mac, |i| i.device_by_mac(mac))
    }

    /// Devices of `kind` at `site_id`.
    pub fn devices_by_site(&self, kind: &DeviceType, site_id: &str) -> Result<Vec<Arc<Device>>> {
        match kind {
            DeviceType::Ap => self.aps_by_site(site_id),
            DeviceType::Switch => self.switches_by_site(site_id),
            DeviceType::Gateway => self.gateways_by_site(site_id),
            DeviceType::Other(_) => Err(CacheError::not_found(
                "device",
                format!("{kind} at site {site_id}"),
            )),
        }
    }

    // ── Device profiles ──────────────────────────────────────────────

    pub fn device_profile_by_id(&self, id: &str) -> Result<Arc<DeviceProfile>> {
        self.entity(id, |i| i.device_profiles.get_by_id(id))
    }

    pub fn device_profile_by_name(&self, name: &str) -> Result<Arc<DeviceProfile>> {
        self.entity(name, |i| i.device_profiles.get_by_name(name))
    }

    pub fn all_device_profiles(&self) -> Result<Vec<Arc<DeviceProfile>>> {
        self.collect(|org| org.profiles.devices.as_slice())
    }

    /// Every device profile targeting `kind`.
    pub fn device_profiles_by_type(&self, kind: &DeviceType) -> Result<Vec<Arc<DeviceProfile>>> {
        let mut profiles = self.all_device_profiles()?;
        profiles.retain(|p| p.device_type.value() == Some(kind));
        Ok(profiles)
    }

    pub fn device_profile_detail_by_id(&self, id: &str) -> Result<Arc<ProfileDetail>> {
        self.entity(id, |i| i.device_profile_details.get_by_id(id))
    }

    pub fn device_profile_detail_by_name(&self, name: &str) -> Result<Arc<ProfileDetail>> {
        self.entity(name, |i| i.device_profile_details.get_by_name(name))
    }

    // ── Device configurations ────────────────────────────────────────

    pub fn ap_config_by_mac(&self, mac: &str) -> Result<Arc<Device>> {
        self.lookup("AP config", mac, |i| i.ap_configs.get_by_mac(mac))
    }

    pub fn ap_config_by_name(&self, name: &str) -> Result<Arc<Device>> {
        self.lookup("AP config", name, |i| i.ap_configs.by_name.get(name))
    }

    pub fn ap_config_by_id(&self, id: &str) -> Result<Arc<Device>> {
        self.lookup("AP config", id, |i| i.ap_configs.by_id.get(id))
    }

    pub fn switch_config_by_mac(&self, mac: &str) -> Result<Arc<Device>> {
        self.lookup("switch config", mac, |i| i.switch_configs.get_by_mac(mac))
    }

    pub fn switch_config_by_name(&self, name: &str) -> Result<Arc<Device>> {
        self.lookup("switch config", name, |i| i.switch_configs.by_name.get(name))
    }

    pub fn switch_config_by_id(&self, id: &str) -> Result<Arc<Device>> {
        self.lookup("switch config", id, |i| i.switch_configs.by_id.get(id))
    }

    pub fn gateway_config_by_mac(&self, mac: &str) -> Result<Arc<Device>> {
        self.lookup("gateway config", mac, |i| i.gateway_configs.get_by_mac(mac))
    }

    pub fn gateway_config_by_name(&self, name: &str) -> Result<Arc<Device>> {
        self.lookup("gateway config", name, |i| i.gateway_configs.by_name.get(name))
    }

    pub fn gateway_config_by_id(&self, id: &str) -> Result<Arc<Device>> {
        self.lookup("gateway config", id, |i| i.gateway_configs.by_id.get(id))
    }

    /// Configuration record of any kind by MAC.
    pub fn device_config_by_mac(&self, mac: &str) -> Result<Arc<Device>> {
        let key = normalize_mac(mac);
        self.lookup("device config", mac, |i| {
            i.ap_configs
                .by_mac
                .get(&key)
                .or_else(|| i.switch_configs.by_mac.get(&key))
                .or_else(|| i.gateway_configs.by_mac.get(&key))
        })
    }
}
