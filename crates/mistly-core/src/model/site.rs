// ── Site domain types ──

use serde::{Deserialize, Serialize};

use super::nullable::Nullable;
use super::{AdditionalFields, impl_cache_entity};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Site {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub org_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub timezone: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub country_code: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub address: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub rftemplate_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub gatewaytemplate_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub networktemplate_id: Nullable<String>,

    #[serde(flatten)]
    pub additional: AdditionalFields,
}

impl_cache_entity!(Site, "site");

/// Per-site settings record. The API does not always name these, in which
/// case `name` is empty and the record is only reachable by ID or site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSetting {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub site_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,

    #[serde(flatten)]
    pub additional: AdditionalFields,
}

impl_cache_entity!(SiteSetting, "site setting");
