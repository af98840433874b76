// ── Org-level templates ──
//
// RF, gateway and WLAN templates share the same indexable shape; the
// template body lives in `additional`.

use serde::{Deserialize, Serialize};

use super::nullable::Nullable;
use super::{AdditionalFields, impl_cache_entity};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RfTemplate {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub org_id: Nullable<String>,

    #[serde(flatten)]
    pub additional: AdditionalFields,
}

impl_cache_entity!(RfTemplate, "RF template");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayTemplate {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub org_id: Nullable<String>,

    #[serde(flatten)]
    pub additional: AdditionalFields,
}

impl_cache_entity!(GatewayTemplate, "gateway template");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WlanTemplate {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub org_id: Nullable<String>,

    #[serde(flatten)]
    pub additional: AdditionalFields,
}

impl_cache_entity!(WlanTemplate, "WLAN template");
