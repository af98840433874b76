// ── Org network domain type ──

use serde::{Deserialize, Serialize};

use super::nullable::Nullable;
use super::{AdditionalFields, impl_cache_entity};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub org_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub vlan_id: Nullable<u16>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub subnet: Nullable<String>,

    #[serde(flatten)]
    pub additional: AdditionalFields,
}

impl_cache_entity!(Network, "network");
