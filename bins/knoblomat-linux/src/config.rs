//! Host tool configuration from environment variables.

use knoblomat_core::ApDefaults;
use std::path::PathBuf;

/// Directory holding the namespace files.
pub const ENV_DATA_DIR: &str = "KNOBLOMAT_DATA_DIR";

/// Override of the compiled-in access point SSID.
pub const ENV_AP_SSID: &str = "KNOBLOMAT_AP_SSID";

/// Override of the compiled-in access point hostname.
pub const ENV_AP_HOSTNAME: &str = "KNOBLOMAT_AP_HOSTNAME";

const DEFAULT_DATA_DIR: &str = "./knoblomat-data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub data_dir: PathBuf,
    pub ap_defaults: ApDefaults,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            ap_defaults: ApDefaults::default(),
        }
    }
}

impl HostConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from a variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            data_dir: get(ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            ap_defaults: ApDefaults {
                ssid: get(ENV_AP_SSID).unwrap_or(defaults.ap_defaults.ssid),
                hostname: get(ENV_AP_HOSTNAME).unwrap_or(defaults.ap_defaults.hostname),
            },
        }
    }
}
