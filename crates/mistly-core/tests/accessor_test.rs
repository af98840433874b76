#![allow(clippy::unwrap_used)]
// Lookup tests for `CacheAccessor` over a populated in-memory cache.

use std::sync::Arc;

use serde_json::json;

use mistly_core::cache::Cache;
use mistly_core::{
    CacheError, CacheManager, CacheSettings, Device, DeviceProfile, DeviceType, GatewayTemplate,
    Network, Nullable, OrgStats, ProfileDetail, RfTemplate, Site, SiteSetting, Wlan, WlanTemplate,
};

// ── Fixture ─────────────────────────────────────────────────────────

fn device(mac: &str, name: &str, kind: DeviceType, site: Option<&str>) -> Device {
    Device {
        id: format!("id-{name}").into(),
        mac: mac.into(),
        name: name.into(),
        device_type: kind.into(),
        site_id: Nullable::from_option(site.map(str::to_owned)),
        ..Device::default()
    }
}

fn fixture() -> Cache {
    let mut cache = Cache::new();

    let org = cache.org_mut("org-1");
    org.org_stats = Some(Arc::new(OrgStats {
        id: "org-1".into(),
        name: "Acme".into(),
        ..OrgStats::default()
    }));
    org.sites.info = vec![
        Arc::new(Site {
            id: "site-1".into(),
            name: "HQ".into(),
            ..Site::default()
        }),
        Arc::new(Site {
            id: "site-empty".into(),
            name: "Warehouse".into(),
            ..Site::default()
        }),
    ];
    org.sites.settings.push(Arc::new(SiteSetting {
        id: "setting-1".into(),
        site_id: "site-1".into(),
        name: "hq-settings".into(),
        ..SiteSetting::default()
    }));
    org.templates.rf.push(Arc::new(RfTemplate {
        id: "rf-1".into(),
        name: "office-rf".into(),
        ..RfTemplate::default()
    }));
    org.templates.gateway.push(Arc::new(GatewayTemplate {
        id: "gw-tpl-1".into(),
        name: "branch-gw".into(),
        ..GatewayTemplate::default()
    }));
    org.templates.wlan.push(Arc::new(WlanTemplate {
        id: "wlan-tpl-1".into(),
        name: "corp-wlans".into(),
        ..WlanTemplate::default()
    }));
    org.networks.push(Arc::new(Network {
        id: "net-1".into(),
        name: "iot".into(),
        vlan_id: 30.into(),
        ..Network::default()
    }));
    org.wlans.org.push(Arc::new(Wlan {
        id: "wlan-org-1".into(),
        ssid: "corp".into(),
        ..Wlan::default()
    }));
    org.wlans.sites.insert(
        "site-1".into(),
        vec![
            Arc::new(Wlan {
                id: "wlan-site-1".into(),
                ssid: "guest".into(),
                site_id: "site-1".into(),
                ..Wlan::default()
            }),
            Arc::new(Wlan {
                id: "wlan-site-2".into(),
                ssid: "voice".into(),
                site_id: "site-1".into(),
                ..Wlan::default()
            }),
        ],
    );
    org.profiles.devices = vec![
        Arc::new(DeviceProfile {
            id: "prof-ap".into(),
            name: "ap-default".into(),
            device_type: DeviceType::Ap.into(),
            ..DeviceProfile::default()
        }),
        Arc::new(DeviceProfile {
            id: "prof-gw".into(),
            name: "gw-default".into(),
            device_type: DeviceType::Gateway.into(),
            ..DeviceProfile::default()
        }),
    ];
    let detail: ProfileDetail = serde_json::from_value(json!({
        "id": "prof-ap",
        "name": "ap-default",
        "radio_config": { "band_5": { "channel": 36 } }
    }))
    .unwrap();
    org.profiles.details.push(Arc::new(detail));

    org.inventory
        .insert(device("AA:BB:CC:00:00:01", "lobby-ap", DeviceType::Ap, Some("site-1")))
        .unwrap();
    org.inventory
        .insert(device("aabbcc000002", "spare-ap", DeviceType::Ap, None))
        .unwrap();
    org.inventory
        .insert(device("aabbcc000010", "core-sw", DeviceType::Switch, Some("site-1")))
        .unwrap();
    org.inventory
        .insert(device("aabbcc000020", "edge-gw", DeviceType::Gateway, Some("site-1")))
        .unwrap();
    org.configs
        .insert(device("aabbcc000001", "lobby-ap-cfg", DeviceType::Ap, Some("site-1")))
        .unwrap();
    org.configs
        .insert(device("aabbcc000020", "edge-gw-cfg", DeviceType::Gateway, Some("site-1")))
        .unwrap();

    // A second org so "all" lookups span organizations.
    cache.org_mut("org-2").sites.info.push(Arc::new(Site {
        id: "site-2".into(),
        name: "Remote".into(),
        ..Site::default()
    }));

    cache
}

fn manager() -> (tempfile::TempDir, CacheManager) {
    let dir = tempfile::tempdir().unwrap();
    let mgr = CacheManager::new(CacheSettings::new(dir.path().join("cache.json")));
    mgr.initialize().unwrap();
    mgr.update_cache(|cache| *cache = fixture()).unwrap();
    (dir, mgr)
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn lookups_fail_before_initialize() {
    let dir = tempfile::tempdir().unwrap();
    let mgr = CacheManager::new(CacheSettings::new(dir.path().join("cache.json")));
    assert!(matches!(
        mgr.accessor().site_by_name("HQ"),
        Err(CacheError::NotInitialized)
    ));
}

#[test]
fn orgs_and_sites() {
    let (_dir, mgr) = manager();
    let cache = mgr.accessor();

    assert_eq!(cache.org_by_name("Acme").unwrap().id, "org-1");
    assert_eq!(cache.org_by_id("org-1").unwrap().name, "Acme");
    assert_eq!(cache.org_ids().unwrap(), ["org-1", "org-2"]);

    assert_eq!(cache.site_by_name("HQ").unwrap().id, "site-1");
    assert_eq!(cache.site_by_id("site-2").unwrap().name, "Remote");
    assert_eq!(cache.all_sites().unwrap().len(), 3);

    assert_eq!(cache.site_setting_for_site("site-1").unwrap().id, "setting-1");
    assert_eq!(cache.site_setting_by_name("hq-settings").unwrap().site_id, "site-1");
    assert!(cache.site_setting_by_id("setting-1").is_ok());
}

#[test]
fn templates_networks_and_wlans() {
    let (_dir, mgr) = manager();
    let cache = mgr.accessor();

    assert_eq!(cache.rf_template_by_name("office-rf").unwrap().id, "rf-1");
    assert_eq!(cache.gateway_template_by_id("gw-tpl-1").unwrap().name, "branch-gw");
    assert_eq!(cache.wlan_template_by_name("corp-wlans").unwrap().id, "wlan-tpl-1");
    assert_eq!(cache.all_rf_templates().unwrap().len(), 1);

    assert_eq!(cache.network_by_name("iot").unwrap().vlan_id.value(), Some(&30));
    assert_eq!(cache.all_networks().unwrap().len(), 1);

    assert_eq!(cache.org_wlan_by_name("corp").unwrap().id, "wlan-org-1");
    assert_eq!(cache.site_wlan_by_name("site-1", "guest").unwrap().id, "wlan-site-1");
    assert_eq!(cache.site_wlan_by_id("site-1", "wlan-site-2").unwrap().ssid, "voice");

    let ssids: Vec<String> = cache
        .site_wlans("site-1")
        .unwrap()
        .iter()
        .map(|w| w.ssid.as_str().to_owned())
        .collect();
    assert_eq!(ssids, ["guest", "voice"]);
}

#[test]
fn devices_by_mac_name_and_site() {
    let (_dir, mgr) = manager();
    let cache = mgr.accessor();

    assert_eq!(cache.ap_by_mac("aa-bb-cc-00-00-01").unwrap().name, "lobby-ap");
    assert_eq!(cache.ap_by_name("spare-ap").unwrap().mac, "aabbcc000002");
    assert_eq!(cache.ap_by_id("id-lobby-ap").unwrap().name, "lobby-ap");
    assert_eq!(cache.switch_by_mac("AABBCC000010").unwrap().name, "core-sw");
    assert_eq!(cache.gateway_by_name("edge-gw").unwrap().mac, "aabbcc000020");
    assert_eq!(cache.device_by_mac("aa:bb:cc:00:00:10").unwrap().name, "core-sw");

    assert_eq!(cache.aps_by_site("site-1").unwrap().len(), 1);
    assert_eq!(cache.switches_by_site("site-1").unwrap().len(), 1);
    assert_eq!(
        cache.devices_by_site(&DeviceType::Gateway, "site-1").unwrap().len(),
        1
    );
    assert_eq!(cache.all_aps().unwrap().len(), 2);
    assert_eq!(cache.all_switches().unwrap().len(), 1);
    assert_eq!(cache.all_gateways().unwrap().len(), 1);
}

#[test]
fn known_site_without_devices_is_empty_not_missing() {
    let (_dir, mgr) = manager();
    let cache = mgr.accessor();

    assert!(cache.aps_by_site("site-empty").unwrap().is_empty());
    assert!(matches!(
        cache.aps_by_site("no-such-site"),
        Err(CacheError::NotFound { entity: "AP", .. })
    ));
}

#[test]
fn misses_are_not_found_errors() {
    let (_dir, mgr) = manager();
    let cache = mgr.accessor();

    let err = cache.ap_by_mac("ff:ff:ff:ff:ff:ff").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "AP not found: ff:ff:ff:ff:ff:ff");

    assert!(cache.site_by_name("Nowhere").unwrap_err().is_not_found());
    assert!(cache.site_wlan_by_name("site-2", "guest").unwrap_err().is_not_found());
    assert!(cache.device_profile_by_id("missing").unwrap_err().is_not_found());
}

#[test]
fn device_profiles_and_details() {
    let (_dir, mgr) = manager();
    let cache = mgr.accessor();

    assert_eq!(cache.device_profile_by_name("gw-default").unwrap().id, "prof-gw");
    assert_eq!(cache.all_device_profiles().unwrap().len(), 2);

    let ap_profiles = cache.device_profiles_by_type(&DeviceType::Ap).unwrap();
    assert_eq!(ap_profiles.len(), 1);
    assert_eq!(ap_profiles[0].id, "prof-ap");
    assert!(cache.device_profiles_by_type(&DeviceType::Switch).unwrap().is_empty());

    let detail = cache.device_profile_detail_by_name("ap-default").unwrap();
    assert_eq!(detail["radio_config"]["band_5"]["channel"], 36);
    assert!(cache.device_profile_detail_by_id("prof-ap").is_ok());
}

#[test]
fn configs_are_separate_from_inventory() {
    let (_dir, mgr) = manager();
    let cache = mgr.accessor();

    assert_eq!(cache.ap_config_by_mac("aabbcc000001").unwrap().name, "lobby-ap-cfg");
    assert_eq!(cache.ap_by_mac("aabbcc000001").unwrap().name, "lobby-ap");
    assert_eq!(cache.ap_config_by_name("lobby-ap-cfg").unwrap().mac, "aabbcc000001");
    assert_eq!(cache.gateway_config_by_id("id-edge-gw-cfg").unwrap().name, "edge-gw-cfg");
    assert_eq!(cache.device_config_by_mac("AA:BB:CC:00:00:20").unwrap().name, "edge-gw-cfg");
    assert!(cache.switch_config_by_mac("aabbcc000010").unwrap_err().is_not_found());
}

#[test]
fn lookups_return_store_allocations() {
    let (_dir, mgr) = manager();
    let stored = mgr
        .read_cache(|c| Arc::clone(&c.org("org-1").unwrap().inventory.ap["aabbcc000001"]))
        .unwrap();

    let found = mgr.accessor().ap_by_mac("aabbcc000001").unwrap();
    assert!(Arc::ptr_eq(&stored, &found));
}
