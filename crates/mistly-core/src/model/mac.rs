// ── MAC address normalization ──
//
// Every device-keyed map in the cache uses the same canonical key:
// lowercase hex with all separators removed (`aabbccddeeff`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// MAC address, normalized to bare lowercase hex (aabbccddeeff).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    /// Accepts colon-separated, dash-separated, Cisco dotted or bare hex.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(normalize_mac(raw.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Render as colon-separated pairs (aa:bb:cc:dd:ee:ff) for display.
    pub fn to_colon_form(&self) -> String {
        let mut out = String::with_capacity(self.0.len() + self.0.len() / 2);
        for (i, c) in self.0.chars().enumerate() {
            if i > 0 && i % 2 == 0 {
                out.push(':');
            }
            out.push(c);
        }
        out
    }
}

/// Canonical cache key for a hardware address.
///
/// Deterministic and idempotent: `normalize_mac(normalize_mac(x)) == normalize_mac(x)`.
pub fn normalize_mac(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ':' | '-' | '.') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for MacAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for MacAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.0
    }
}

impl AsRef<str> for MacAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_colons_and_case() {
        let mac = MacAddress::new("AA:BB:CC:DD:EE:FF");
        assert_eq!(mac.as_str(), "aabbccddeeff");
    }

    #[test]
    fn normalizes_dashes() {
        assert_eq!(normalize_mac("5C-5B-35-0E-12-34"), "5c5b350e1234");
    }

    #[test]
    fn normalizes_cisco_dotted() {
        assert_eq!(normalize_mac("5c5b.350e.1234"), "5c5b350e1234");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_mac(" Aa:bB-cc.dd ee:FF ");
        assert_eq!(normalize_mac(&once), once);
    }

    #[test]
    fn from_str_and_display() {
        let mac: MacAddress = "AA-BB-CC-DD-EE-FF".parse().unwrap();
        assert_eq!(mac.to_string(), "aabbccddeeff");
        assert_eq!(mac.to_colon_form(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn deserialization_normalizes() {
        let mac: MacAddress = serde_json::from_str("\"AA:BB:CC:00:11:22\"").unwrap();
        assert_eq!(mac.as_str(), "aabbcc001122");
    }
}
