// ── Aggregate cache statistics ──

use serde::Serialize;

use super::store::Cache;

/// Entity counts summed across every organization in a cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub version: u32,
    pub orgs: usize,
    pub sites: usize,
    pub site_settings: usize,
    pub rf_templates: usize,
    pub gateway_templates: usize,
    pub wlan_templates: usize,
    pub networks: usize,
    pub org_wlans: usize,
    pub site_wlans: usize,
    pub aps: usize,
    pub switches: usize,
    pub gateways: usize,
    pub device_profiles: usize,
    pub profile_details: usize,
    pub ap_configs: usize,
    pub switch_configs: usize,
    pub gateway_configs: usize,
}

impl CacheStats {
    /// One O(n) pass over `cache`. Never mutates.
    pub fn collect(cache: &Cache) -> Self {
        let mut stats = Self {
            version: cache.version,
            orgs: cache.orgs.len(),
            ..Self::default()
        };

        for org in cache.orgs.values() {
            stats.sites += org.sites.info.len();
            stats.site_settings += org.sites.settings.len();
            stats.rf_templates += org.templates.rf.len();
            stats.gateway_templates += org.templates.gateway.len();
            stats.wlan_templates += org.templates.wlan.len();
            stats.networks += org.networks.len();
            stats.org_wlans += org.wlans.org.len();
            stats.site_wlans += org.wlans.sites.values().map(Vec::len).sum::<usize>();
            stats.aps += org.inventory.ap.len();
            stats.switches += org.inventory.switch.len();
            stats.gateways += org.inventory.gateway.len();
            stats.device_profiles += org.profiles.devices.len();
            stats.profile_details += org.profiles.details.len();
            stats.ap_configs += org.configs.ap.len();
            stats.switch_configs += org.configs.switch.len();
            stats.gateway_configs += org.configs.gateway.len();
        }

        stats
    }

    pub fn devices(&self) -> usize {
        self.aps + self.switches + self.gateways
    }

    pub fn templates(&self) -> usize {
        self.rf_templates + self.gateway_templates + self.wlan_templates
    }

    pub fn wlans(&self) -> usize {
        self.org_wlans + self.site_wlans
    }

    pub fn configs(&self) -> usize {
        self.ap_configs + self.switch_configs + self.gateway_configs
    }
}
