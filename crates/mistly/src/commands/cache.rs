//! Cache command handlers.

use std::sync::Arc;

use owo_colors::OwoColorize;
use tabled::Tabled;

use mistly_core::cache::OrgData;
use mistly_core::{CacheManager, CacheStats, Device, DeviceType, verify_cache_integrity};

use crate::cli::{CacheArgs, CacheCommand, DeviceKind, GlobalOpts, LookupArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Collection")]
    collection: &'static str,
    #[tabled(rename = "Count")]
    count: usize,
}

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Site")]
    site: String,
}

impl From<&Arc<Device>> for DeviceRow {
    fn from(d: &Arc<Device>) -> Self {
        Self {
            mac: d.normalized_mac(),
            name: d.name.as_str().to_owned(),
            dtype: d.kind().map_or_else(|| "-".to_owned(), ToString::to_string),
            model: d.model.as_str().to_owned(),
            site: d.assigned_site().unwrap_or("-").to_owned(),
        }
    }
}

fn count_rows(counts: &[(&'static str, usize)]) -> Vec<CountRow> {
    counts
        .iter()
        .map(|&(collection, count)| CountRow { collection, count })
        .collect()
}

fn stat_rows(stats: &CacheStats) -> Vec<CountRow> {
    count_rows(&[
        ("orgs", stats.orgs),
        ("sites", stats.sites),
        ("site settings", stats.site_settings),
        ("rf templates", stats.rf_templates),
        ("gateway templates", stats.gateway_templates),
        ("wlan templates", stats.wlan_templates),
        ("networks", stats.networks),
        ("org wlans", stats.org_wlans),
        ("site wlans", stats.site_wlans),
        ("aps", stats.aps),
        ("switches", stats.switches),
        ("gateways", stats.gateways),
        ("device profiles", stats.device_profiles),
        ("profile details", stats.profile_details),
        ("ap configs", stats.ap_configs),
        ("switch configs", stats.switch_configs),
        ("gateway configs", stats.gateway_configs),
    ])
}

fn org_rows(org: &OrgData) -> Vec<CountRow> {
    count_rows(&[
        ("sites", org.sites.info.len()),
        ("site settings", org.sites.settings.len()),
        ("rf templates", org.templates.rf.len()),
        ("gateway templates", org.templates.gateway.len()),
        ("wlan templates", org.templates.wlan.len()),
        ("networks", org.networks.len()),
        ("org wlans", org.wlans.org.len()),
        ("site wlans", org.wlans.sites.values().map(Vec::len).sum()),
        ("inventory", org.inventory.len()),
        ("device profiles", org.profiles.devices.len()),
        ("configs", org.configs.len()),
    ])
}

fn device_detail(d: &Arc<Device>) -> String {
    [
        format!("MAC:      {}", d.normalized_mac()),
        format!("Name:     {}", d.name.as_str()),
        format!("ID:       {}", d.id.as_deref().filter(|id| !id.is_empty()).unwrap_or("-")),
        format!("Type:     {}", d.kind().map_or("-", DeviceType::as_str)),
        format!("Model:    {}", d.model.as_deref().unwrap_or("-")),
        format!("Serial:   {}", d.serial.as_deref().unwrap_or("-")),
        format!("Site:     {}", d.assigned_site().unwrap_or("-")),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: CacheArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let manager = CacheManager::new(config::cache_settings(global)?);

    match args.command {
        CacheCommand::Stats => stats(&manager, global),
        CacheCommand::Verify => verify(&manager, global).await,
        CacheCommand::Show { org_id } => show(&manager, &org_id, global),
        CacheCommand::Lookup(lookup_args) => lookup(&manager, &lookup_args, global),
        CacheCommand::Clear => clear(&manager, global),
    }
}

fn stats(manager: &CacheManager, global: &GlobalOpts) -> Result<(), CliError> {
    manager.initialize()?;
    let stats = manager.cache_stats()?;

    let out = output::render_single(
        global.output,
        &stats,
        |s| {
            format!(
                "Cache:    {}\nOrigin:   {:?}\nVersion:  {}\n{}",
                manager.path().display(),
                manager.origin(),
                s.version,
                output::render_table(&stat_rows(s))
            )
        },
        |s| {
            stat_rows(s)
                .iter()
                .map(|r| format!("{}\t{}", r.collection, r.count))
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn verify(manager: &CacheManager, global: &GlobalOpts) -> Result<(), CliError> {
    manager.initialize()?;
    verify_cache_integrity(manager).await?;

    let message = format!("cache OK: {}", manager.path().display());
    if output::should_color(global.color) {
        output::print_output(&message.green().to_string(), global.quiet);
    } else {
        output::print_output(&message, global.quiet);
    }
    Ok(())
}

fn show(manager: &CacheManager, org_id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    manager.initialize()?;
    let cache = manager.cache()?;
    let org = cache.org(org_id).ok_or_else(|| CliError::NotFound {
        resource_type: "org".into(),
        identifier: org_id.into(),
    })?;

    let out = output::render_single(
        global.output,
        org,
        |o| {
            let name = o.org_stats.as_ref().map_or("-", |s| s.name.as_str());
            format!(
                "Org:      {org_id}\nName:     {name}\n{}",
                output::render_table(&org_rows(o))
            )
        },
        |o| {
            o.sites
                .info
                .iter()
                .map(|s| s.id.as_str().to_owned())
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn lookup(
    manager: &CacheManager,
    args: &LookupArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    manager.initialize()?;
    let cache = manager.accessor();

    let device = match (args.mac.as_deref(), args.name.as_deref(), args.kind) {
        (Some(mac), _, None) => cache.device_by_mac(mac)?,
        (Some(mac), _, Some(DeviceKind::Ap)) => cache.ap_by_mac(mac)?,
        (Some(mac), _, Some(DeviceKind::Switch)) => cache.switch_by_mac(mac)?,
        (Some(mac), _, Some(DeviceKind::Gateway)) => cache.gateway_by_mac(mac)?,
        (None, Some(name), Some(DeviceKind::Ap)) => cache.ap_by_name(name)?,
        (None, Some(name), Some(DeviceKind::Switch)) => cache.switch_by_name(name)?,
        (None, Some(name), Some(DeviceKind::Gateway)) => cache.gateway_by_name(name)?,
        _ => {
            return Err(CliError::Validation {
                field: "lookup".into(),
                reason: "give --mac, or --name together with --kind".into(),
            });
        }
    };

    let out = output::render_single(
        global.output,
        &device,
        |d| {
            format!(
                "{}\n\n{}",
                device_detail(d),
                output::render_table(&[DeviceRow::from(d)])
            )
        },
        |d| d.normalized_mac(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn clear(manager: &CacheManager, global: &GlobalOpts) -> Result<(), CliError> {
    manager.initialize_with_options(true)?;
    manager.save_cache()?;
    tracing::info!(path = %manager.path().display(), "cache cleared");

    let message = format!("cache cleared: {}", manager.path().display());
    if output::should_color(global.color) {
        output::print_output(&message.yellow().to_string(), global.quiet);
    } else {
        output::print_output(&message, global.quiet);
    }
    Ok(())
}
