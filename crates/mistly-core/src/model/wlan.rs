// ── WLAN domain type ──

use serde::{Deserialize, Serialize};

use super::nullable::Nullable;
use super::{AdditionalFields, CacheEntity};

/// A wireless network, either org-scoped (template-driven) or site-scoped.
/// Its display name is the SSID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wlan {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub ssid: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub org_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub site_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub template_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub enabled: Nullable<bool>,

    #[serde(flatten)]
    pub additional: AdditionalFields,
}

impl CacheEntity for Wlan {
    const KIND: &'static str = "WLAN";

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn name(&self) -> &str {
        self.ssid.as_str()
    }
}
