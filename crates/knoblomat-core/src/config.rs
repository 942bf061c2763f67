//! Compiled-in device defaults and field limits.
//!
//! These values are immutable and handed to the settings groups at
//! construction time; nothing here is process-wide mutable state.

/// Preference namespace of the access point settings.
pub const AP_NAMESPACE: &str = "AP";

/// Preference namespace of the WiFi station settings.
pub const WIFI_NAMESPACE: &str = "WiFi";

/// Preference namespace of the game score.
pub const GAME_NAMESPACE: &str = "Game";

/// Default hostname (WiFi station and mDNS name).
pub const DEFAULT_HOSTNAME: &str = "knoblomat";

/// Default access point SSID.
pub const DEFAULT_AP_SSID: &str = "Knoblomat";

/// Default network mask.
pub const DEFAULT_SUBNET_MASK: &str = "255.255.255.0";

/// Default web server port.
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Maximum SSID length (IEEE 802.11).
pub const MAX_SSID_LEN: usize = 32;

/// Maximum passphrase length (WPA2).
pub const MAX_PASS_LEN: usize = 64;

/// Maximum hostname length.
pub const MAX_HOSTNAME_LEN: usize = 32;

/// Maximum length of a dotted IPv4 address ("255.255.255.255").
pub const MAX_IPADDRESS_LEN: usize = 15;

/// Build-time defaults of the access point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApDefaults {
    /// SSID used when none is stored.
    pub ssid: String,

    /// Hostname used when none is stored.
    pub hostname: String,
}

impl Default for ApDefaults {
    fn default() -> Self {
        Self {
            ssid: DEFAULT_AP_SSID.to_string(),
            hostname: DEFAULT_HOSTNAME.to_string(),
        }
    }
}

impl ApDefaults {
    /// Create defaults with a custom SSID and hostname.
    pub fn new(ssid: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            hostname: hostname.into(),
        }
    }
}
