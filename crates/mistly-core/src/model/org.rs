// ── Organization summary ──

use serde::{Deserialize, Serialize};

use super::nullable::Nullable;
use super::{AdditionalFields, impl_cache_entity};

/// Summary record for one organization (name and headline counts).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrgStats {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub num_sites: Nullable<u32>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub num_devices: Nullable<u32>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub num_devices_connected: Nullable<u32>,

    #[serde(flatten)]
    pub additional: AdditionalFields,
}

impl_cache_entity!(OrgStats, "organization");
