use serde::{Deserialize, Serialize};
use serde_valid::Validate;

use crate::types::common::STATUS_SUCCESS;

/// One WiFi network as offered to the user
///
/// `security` is the scheme name reported by the scan ("WPA2", "WEP", ...);
/// absent or empty means an open network. The selected network is copied
/// into the join attempt when the user confirms, and that copy is owned by
/// the attempt until it reaches a terminal stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WifiNetwork {
    pub ssid: String,
    #[serde(default)]
    pub security: Option<String>,
    #[serde(default)]
    pub signal: Option<u8>,
}

impl WifiNetwork {
    /// Whether joining requires a password
    pub fn is_secured(&self) -> bool {
        self.security
            .as_deref()
            .is_some_and(|s| !s.is_empty() && s != "Open")
    }
}

/// Snapshot returned by `GET /api/wifi/status`
///
/// Transient; evaluated once per poll and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WifiStatus {
    #[serde(default = "default_envelope_status")]
    pub status: String,
    pub connected: bool,
    #[serde(default)]
    pub ssid: Option<String>,
    #[serde(default)]
    pub signal: Option<u8>,
}

fn default_envelope_status() -> String {
    STATUS_SUCCESS.to_string()
}

impl WifiStatus {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// The reported ssid, with the backend's empty-string placeholder
    /// normalized away
    pub fn ssid(&self) -> Option<&str> {
        self.ssid.as_deref().filter(|s| !s.is_empty())
    }

    /// Whether this observation shows an established link to `target_ssid`
    pub fn matches(&self, target_ssid: &str) -> bool {
        self.connected && self.ssid() == Some(target_ssid)
    }
}

impl Default for WifiStatus {
    fn default() -> Self {
        Self {
            status: default_envelope_status(),
            connected: false,
            ssid: None,
            signal: None,
        }
    }
}

/// Request body for `POST /api/wifi/connect`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct ConnectRequest {
    #[validate(min_length = 1)]
    pub ssid: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod security {
        use super::*;

        fn network(security: Option<&str>) -> WifiNetwork {
            WifiNetwork {
                ssid: "Home".to_string(),
                security: security.map(str::to_string),
                signal: Some(70),
            }
        }

        #[test]
        fn named_scheme_is_secured() {
            assert!(network(Some("WPA2")).is_secured());
            assert!(network(Some("WEP")).is_secured());
        }

        #[test]
        fn open_variants_are_not_secured() {
            assert!(!network(None).is_secured());
            assert!(!network(Some("")).is_secured());
            assert!(!network(Some("Open")).is_secured());
        }
    }

    mod status_matching {
        use super::*;

        #[test]
        fn matches_requires_connected_and_same_ssid() {
            let status = WifiStatus {
                connected: true,
                ssid: Some("Home".to_string()),
                signal: Some(70),
                ..Default::default()
            };
            assert!(status.matches("Home"));
            assert!(!status.matches("Office"));
        }

        #[test]
        fn disconnected_never_matches() {
            let status = WifiStatus {
                connected: false,
                ssid: Some("Home".to_string()),
                ..Default::default()
            };
            assert!(!status.matches("Home"));
        }

        #[test]
        fn empty_ssid_is_normalized_to_none() {
            let status = WifiStatus {
                connected: true,
                ssid: Some(String::new()),
                ..Default::default()
            };
            assert_eq!(status.ssid(), None);
            assert!(!status.matches(""));
        }

        #[test]
        fn status_parses_with_envelope() {
            let status: WifiStatus = serde_json::from_str(
                r#"{"status":"success","connected":true,"ssid":"Home","signal":70}"#,
            )
            .unwrap();
            assert!(status.is_success());
            assert!(status.matches("Home"));
            assert_eq!(status.signal, Some(70));
        }

        #[test]
        fn missing_connected_field_is_a_parse_error() {
            let result: Result<WifiStatus, _> =
                serde_json::from_str(r#"{"status":"success","ssid":"Home"}"#);
            assert!(result.is_err());
        }
    }

    mod connect_request {
        use super::*;
        use serde_valid::Validate;

        #[test]
        fn empty_ssid_is_rejected() {
            let request = ConnectRequest {
                ssid: String::new(),
                password: "secret".to_string(),
            };
            assert!(request.validate().is_err());
        }

        #[test]
        fn open_network_join_allows_empty_password() {
            let request = ConnectRequest {
                ssid: "Cafe".to_string(),
                password: String::new(),
            };
            assert!(request.validate().is_ok());
        }
    }
}
