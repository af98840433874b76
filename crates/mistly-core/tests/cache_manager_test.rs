#![allow(clippy::unwrap_used)]
// Integration tests for `CacheManager` against a scratch directory.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use pretty_assertions::assert_eq;
use serde_json::json;

use mistly_core::cache::{Cache, CacheOrigin, persist};
use mistly_core::{CacheError, CacheManager, CacheSettings, Device, DeviceType, OrgStats, Site};

// ── Helpers ─────────────────────────────────────────────────────────

fn settings(dir: &Path) -> CacheSettings {
    CacheSettings::new(dir.join("cache.json"))
}

fn device(mac: &str, name: &str, kind: DeviceType, site: &str) -> Device {
    Device {
        id: format!("id-{name}").into(),
        mac: mac.into(),
        name: name.into(),
        model: "AP45".into(),
        device_type: kind.into(),
        site_id: site.into(),
        ..Device::default()
    }
}

fn sample_cache() -> Cache {
    let mut cache = Cache::new();
    let org = cache.org_mut("org-1");
    org.org_stats = Some(Arc::new(OrgStats {
        id: "org-1".into(),
        name: "Acme".into(),
        num_sites: 1.into(),
        ..OrgStats::default()
    }));
    org.sites.info.push(Arc::new(Site {
        id: "site-1".into(),
        name: "HQ".into(),
        ..Site::default()
    }));
    org.inventory
        .insert(device("5C:5B:35:00:00:01", "lobby-ap", DeviceType::Ap, "site-1"))
        .unwrap();
    org.inventory
        .insert(device("5c5b35000002", "core-sw", DeviceType::Switch, "site-1"))
        .unwrap();
    cache
}

fn populated_manager(dir: &Path) -> CacheManager {
    let mgr = CacheManager::new(settings(dir));
    mgr.initialize().unwrap();
    mgr.replace_cache(sample_cache()).unwrap();
    mgr
}

fn backdate(path: &Path, by: Duration) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::now() - by)
        .unwrap();
}

// ── Initialization ──────────────────────────────────────────────────

#[test]
fn initialize_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let _ = populated_manager(dir.path());

    let mgr = CacheManager::new(settings(dir.path()));
    mgr.initialize().unwrap();
    assert_eq!(mgr.origin(), CacheOrigin::Disk);

    // A second call must not touch the disk: corrupt the file and re-run.
    fs::write(mgr.path(), b"garbage").unwrap();
    mgr.initialize().unwrap();
    mgr.initialize_with_options(true).unwrap();

    assert_eq!(mgr.origin(), CacheOrigin::Disk);
    assert_eq!(mgr.cache().unwrap().orgs.len(), 1);
}

#[test]
fn missing_file_yields_empty_initialized_cache() {
    let dir = tempfile::tempdir().unwrap();
    let mgr = CacheManager::new(CacheSettings::new(dir.path().join("nested/dir/cache.json")));

    mgr.initialize().unwrap();

    assert!(mgr.is_initialized());
    assert_eq!(mgr.cache().unwrap().orgs.len(), 0);
    assert_eq!(mgr.cache().unwrap().version, 1);
}

#[test]
fn expired_cache_is_rebuilt_empty() {
    let dir = tempfile::tempdir().unwrap();
    let writer = populated_manager(dir.path());
    backdate(writer.metadata_path(), Duration::from_secs(2));

    let mgr = CacheManager::new(settings(dir.path()).with_ttl_secs(1));
    mgr.initialize_with_options(false).unwrap();

    assert_eq!(mgr.origin(), CacheOrigin::Expired);
    assert_eq!(mgr.cache().unwrap().orgs.len(), 0);
}

#[test]
fn expiry_falls_back_to_cache_file_mtime() {
    let dir = tempfile::tempdir().unwrap();
    let writer = populated_manager(dir.path());
    fs::remove_file(writer.metadata_path()).unwrap();
    backdate(writer.path(), Duration::from_secs(10));

    let mgr = CacheManager::new(settings(dir.path()).with_ttl_secs(5));
    mgr.initialize().unwrap();

    assert_eq!(mgr.origin(), CacheOrigin::Expired);
}

#[test]
fn fresh_file_is_loaded_not_reset() {
    let dir = tempfile::tempdir().unwrap();
    let _ = populated_manager(dir.path());

    let mgr = CacheManager::new(settings(dir.path()).with_ttl_secs(3600));
    mgr.initialize().unwrap();

    assert_eq!(mgr.origin(), CacheOrigin::Disk);
    assert_eq!(mgr.cache_stats().unwrap().devices(), 2);
}

// ── Persistence ─────────────────────────────────────────────────────

#[test]
fn replace_then_reload_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let mut expected = sample_cache();
    expected
        .org_mut("org-1")
        .inventory
        .ap
        .get_mut("5c5b35000001")
        .map(|d| {
            Arc::make_mut(d)
                .additional
                .insert("radio_config".into(), json!({ "band_24": { "power": 8 } }))
        })
        .unwrap();

    let writer = CacheManager::new(settings(dir.path()));
    writer.initialize().unwrap();
    writer.replace_cache(expected.clone()).unwrap();

    let reader = CacheManager::new(settings(dir.path()));
    reader.initialize().unwrap();
    let loaded = reader.cache().unwrap();

    assert_eq!(loaded.version, 1);
    assert_eq!(*loaded, expected);
    assert_eq!(
        loaded.org("org-1").unwrap().inventory.ap.keys().collect::<Vec<_>>(),
        ["5c5b35000001"]
    );
}

#[test]
fn failed_staging_leaves_primary_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mgr = populated_manager(dir.path());
    let before = fs::read(mgr.path()).unwrap();

    // A directory squatting on the staging path makes the write fail
    // before anything is renamed.
    fs::create_dir(mgr.temp_path()).unwrap();
    mgr.update_cache(|cache| {
        cache.org_mut("org-2");
    })
    .unwrap();
    let result = mgr.save_cache();

    assert!(matches!(result, Err(CacheError::Io { .. })));
    assert_eq!(fs::read(mgr.path()).unwrap(), before);
    // The backup taken before staging is kept when the save fails.
    assert_eq!(fs::read(mgr.backup_path()).unwrap(), before);
}

#[test]
fn replace_keeps_new_generation_when_save_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mgr = populated_manager(dir.path());
    let before = fs::read(mgr.path()).unwrap();

    let mut next = sample_cache();
    next.org_mut("org-2").org_stats = Some(Arc::new(OrgStats {
        id: "org-2".into(),
        name: "Globex".into(),
        ..OrgStats::default()
    }));
    fs::create_dir(mgr.temp_path()).unwrap();
    let result = mgr.replace_cache(next);

    // The staging error is reported, not the failed cleanup of the
    // squatting directory.
    assert!(matches!(
        result,
        Err(CacheError::Io { ref path, .. }) if path == mgr.temp_path()
    ));
    assert!(mgr.cache().unwrap().org("org-2").is_some());
    assert!(mgr.accessor().org_by_name("Globex").is_ok());
    assert_eq!(fs::read(mgr.path()).unwrap(), before);
    assert!(mgr.backup_path().exists());
}

#[test]
fn interrupted_save_before_rename_keeps_primary() {
    let dir = tempfile::tempdir().unwrap();
    let mgr = populated_manager(dir.path());
    let before = fs::read(mgr.path()).unwrap();

    // Stage new contents the way a save does, then stop short of the rename.
    persist::stage(mgr.temp_path(), br#"{"version":1,"orgs":{}}"#).unwrap();

    assert_eq!(fs::read(mgr.path()).unwrap(), before);

    let reader = CacheManager::new(settings(dir.path()));
    reader.initialize().unwrap();
    assert_eq!(reader.cache().unwrap().orgs.len(), 1);
}

#[test]
fn corrupted_file_fails_load_instead_of_resetting() {
    let dir = tempfile::tempdir().unwrap();
    let writer = populated_manager(dir.path());

    let mut raw = fs::read(writer.path()).unwrap();
    raw.extend_from_slice(b"\n");
    fs::write(writer.path(), raw).unwrap();

    let mgr = CacheManager::new(settings(dir.path()));
    let result = mgr.initialize();

    assert!(matches!(result, Err(CacheError::Integrity { .. })));
    assert!(!mgr.is_initialized());
}

#[test]
fn hand_placed_file_without_sidecar_is_trusted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    fs::write(
        &path,
        serde_json::to_vec(&json!({
            "version": 1,
            "orgs": { "org-9": { "inventory": { "ap": {
                "aabbcc000001": { "mac": "aabbcc000001", "name": "ap-1", "type": "ap" }
            } } } }
        }))
        .unwrap(),
    )
    .unwrap();

    let mgr = CacheManager::new(CacheSettings::new(&path));
    mgr.initialize().unwrap();
    assert!(mgr.accessor().ap_by_name("ap-1").is_ok());
}

#[test]
fn load_then_save_writes_records_back_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let ap = json!({ "mac": "aabbcc000001", "name": "ap-1", "model": null });
    let profile = json!({ "id": "p1", "name": "edge", "type": "mxedge" });
    let site = json!({ "name": "staging", "timezone": null, "latlng": { "lat": 1.5 } });
    fs::write(
        &path,
        serde_json::to_vec(&json!({
            "version": 1,
            "orgs": { "org-1": {
                "inventory": { "ap": { "aabbcc000001": ap } },
                "profiles": { "devices": [ profile ] },
                "sites": { "info": [ site ] }
            } }
        }))
        .unwrap(),
    )
    .unwrap();

    let mgr = CacheManager::new(CacheSettings::new(&path));
    mgr.initialize().unwrap();
    mgr.save_cache().unwrap();

    let saved: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    let org = &saved["orgs"]["org-1"];
    assert_eq!(org["inventory"]["ap"]["aabbcc000001"], ap);
    assert_eq!(org["profiles"]["devices"][0], profile);
    assert_eq!(org["sites"]["info"][0], site);
}

// ── Validation ──────────────────────────────────────────────────────

#[test]
fn replace_with_version_zero_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mgr = populated_manager(dir.path());
    let current = mgr.cache().unwrap();

    let mut bad = Cache::new();
    bad.version = 0;
    let result = mgr.replace_cache(bad);

    assert!(matches!(
        result,
        Err(CacheError::UnsupportedVersion { found: 0, .. })
    ));
    assert!(Arc::ptr_eq(&current, &mgr.cache().unwrap()));
}

// ── Index consistency ───────────────────────────────────────────────

fn assert_indexes_alias_store(mgr: &CacheManager) {
    mgr.read(|cache, indexes| {
        for org in cache.orgs.values() {
            for (mac, ap) in &org.inventory.ap {
                assert!(Arc::ptr_eq(&indexes.aps.by_mac[mac], ap));
                if let Some(name) = ap.name.as_deref().filter(|n| !n.is_empty()) {
                    assert!(Arc::ptr_eq(&indexes.aps.by_name[name], ap));
                }
                if let Some(site) = ap.assigned_site() {
                    assert!(indexes.aps.by_site[site].iter().any(|d| Arc::ptr_eq(d, ap)));
                }
            }
        }
        indexes.verify_against(cache).unwrap();
    })
    .unwrap();
}

#[test]
fn indexes_match_store_after_replace_and_initialize() {
    let dir = tempfile::tempdir().unwrap();
    let mgr = populated_manager(dir.path());
    assert_indexes_alias_store(&mgr);

    let reloaded = CacheManager::new(settings(dir.path()));
    reloaded.initialize().unwrap();
    assert_indexes_alias_store(&reloaded);
}

#[test]
fn old_snapshot_survives_replace() {
    let dir = tempfile::tempdir().unwrap();
    let mgr = populated_manager(dir.path());
    let old_indexes = mgr.indexes().unwrap();

    mgr.replace_cache(Cache::new()).unwrap();

    assert!(old_indexes.aps.get_by_mac("5c:5b:35:00:00:01").is_some());
    assert!(mgr.indexes().unwrap().aps.is_empty());
}

// ── Concurrency ─────────────────────────────────────────────────────

#[test]
fn concurrent_stats_during_replace() {
    let dir = tempfile::tempdir().unwrap();
    let mgr = populated_manager(dir.path());

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..200 {
                    let stats = mgr.cache_stats().unwrap();
                    // Either the populated generation or an empty one.
                    assert!(stats.devices() == 2 || stats.devices() == 0);
                }
            });
        }
        s.spawn(|| {
            for i in 0..20 {
                let next = if i % 2 == 0 { Cache::new() } else { sample_cache() };
                mgr.replace_cache(next).unwrap();
            }
        });
    });

    assert_indexes_alias_store(&mgr);
}
