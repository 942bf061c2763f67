//! WiFi station settings.

use super::Settings;
use crate::config::{
    DEFAULT_HOSTNAME, DEFAULT_SUBNET_MASK, MAX_HOSTNAME_LEN, MAX_IPADDRESS_LEN, MAX_PASS_LEN,
    MAX_SSID_LEN, WIFI_NAMESPACE,
};
use crate::error::SettingsError;
use crate::json::Document;
use crate::store::{KeyValueStore, Session};
use serde_json::{json, Value};

const KEY_SSID: &str = "SSID";
const KEY_PASS: &str = "PASS";
const KEY_HOSTNAME: &str = "Hostname";
const KEY_DHCP: &str = "DHCP";
const KEY_ADDRESS: &str = "Address";
const KEY_GATEWAY: &str = "Gateway";
const KEY_SUBNET: &str = "Subnet";
const KEY_DNS1: &str = "DNS1";
const KEY_DNS2: &str = "DNS2";

const KEYS: [&str; 9] = [
    KEY_SSID,
    KEY_PASS,
    KEY_HOSTNAME,
    KEY_DHCP,
    KEY_ADDRESS,
    KEY_GATEWAY,
    KEY_SUBNET,
    KEY_DNS1,
    KEY_DNS2,
];

/// Settings for joining an existing WiFi network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WiFiSettings {
    /// Network SSID (empty when not configured).
    pub ssid: String,

    /// Network passphrase (empty for open networks).
    pub passphrase: String,

    /// Station hostname.
    pub hostname: String,

    /// Obtain the address via DHCP. When false the static fields apply.
    pub dhcp: bool,

    /// Static address.
    pub address: String,

    /// Static gateway address.
    pub gateway: String,

    /// Static subnet mask.
    pub subnet: String,

    /// Primary DNS server.
    pub dns1: String,

    /// Secondary DNS server.
    pub dns2: String,
}

impl Default for WiFiSettings {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            passphrase: String::new(),
            hostname: DEFAULT_HOSTNAME.to_string(),
            dhcp: true,
            address: String::new(),
            gateway: String::new(),
            subnet: DEFAULT_SUBNET_MASK.to_string(),
            dns1: String::new(),
            dns2: String::new(),
        }
    }
}

impl WiFiSettings {
    /// True if station credentials have been configured.
    pub fn is_configured(&self) -> bool {
        !self.ssid.is_empty()
    }
}

impl Settings for WiFiSettings {
    fn init<S: KeyValueStore>(&mut self, store: &S) -> Result<(), SettingsError> {
        let session = store.open(WIFI_NAMESPACE)?;
        self.ssid = session.string_or(KEY_SSID, "")?;
        self.passphrase = session.string_or(KEY_PASS, "")?;
        self.hostname = session.string_or(KEY_HOSTNAME, DEFAULT_HOSTNAME)?;
        self.dhcp = session.bool_or(KEY_DHCP, true)?;
        self.address = session.string_or(KEY_ADDRESS, "")?;
        self.gateway = session.string_or(KEY_GATEWAY, "")?;
        self.subnet = session.string_or(KEY_SUBNET, DEFAULT_SUBNET_MASK)?;
        self.dns1 = session.string_or(KEY_DNS1, "")?;
        self.dns2 = session.string_or(KEY_DNS2, "")?;
        tracing::debug!("Loaded {} settings", WIFI_NAMESPACE);
        Ok(())
    }

    fn save<S: KeyValueStore>(&self, store: &S) -> Result<(), SettingsError> {
        let mut session = store.open(WIFI_NAMESPACE)?;
        session.put_string(KEY_SSID, &self.ssid)?;
        session.put_string(KEY_PASS, &self.passphrase)?;
        session.put_string(KEY_HOSTNAME, &self.hostname)?;
        session.put_bool(KEY_DHCP, self.dhcp)?;
        session.put_string(KEY_ADDRESS, &self.address)?;
        session.put_string(KEY_GATEWAY, &self.gateway)?;
        session.put_string(KEY_SUBNET, &self.subnet)?;
        session.put_string(KEY_DNS1, &self.dns1)?;
        session.put_string(KEY_DNS2, &self.dns2)?;
        tracing::debug!("Saved {} settings", WIFI_NAMESPACE);
        Ok(())
    }

    fn clear<S: KeyValueStore>(&self, store: &S) -> Result<(), SettingsError> {
        let mut session = store.open(WIFI_NAMESPACE)?;
        for key in KEYS {
            session.remove(key)?;
        }
        tracing::debug!("Cleared {} settings", WIFI_NAMESPACE);
        Ok(())
    }

    fn to_json(&self) -> Value {
        json!({
            KEY_SSID: self.ssid,
            KEY_PASS: self.passphrase,
            KEY_HOSTNAME: self.hostname,
            KEY_DHCP: self.dhcp,
            KEY_ADDRESS: self.address,
            KEY_GATEWAY: self.gateway,
            KEY_SUBNET: self.subnet,
            KEY_DNS1: self.dns1,
            KEY_DNS2: self.dns2,
        })
    }

    fn merge(&mut self, doc: &Document) {
        self.ssid = doc.text(KEY_SSID, &self.ssid, MAX_SSID_LEN);
        self.passphrase = doc.text(KEY_PASS, &self.passphrase, MAX_PASS_LEN);
        self.hostname = doc.text(KEY_HOSTNAME, &self.hostname, MAX_HOSTNAME_LEN);
        self.dhcp = doc.flag(KEY_DHCP, self.dhcp);
        self.address = doc.text(KEY_ADDRESS, &self.address, MAX_IPADDRESS_LEN);
        self.gateway = doc.text(KEY_GATEWAY, &self.gateway, MAX_IPADDRESS_LEN);
        self.subnet = doc.text(KEY_SUBNET, &self.subnet, MAX_IPADDRESS_LEN);
        self.dns1 = doc.text(KEY_DNS1, &self.dns1, MAX_IPADDRESS_LEN);
        self.dns2 = doc.text(KEY_DNS2, &self.dns2, MAX_IPADDRESS_LEN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn configured() -> WiFiSettings {
        WiFiSettings {
            ssid: "HomeNet".to_string(),
            passphrase: "secret".to_string(),
            dhcp: false,
            address: "10.0.0.20".to_string(),
            gateway: "10.0.0.1".to_string(),
            dns1: "1.1.1.1".to_string(),
            dns2: "8.8.8.8".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let settings = WiFiSettings::default();
        assert_eq!(settings.hostname, "knoblomat");
        assert!(settings.dhcp);
        assert_eq!(settings.subnet, "255.255.255.0");
        assert!(!settings.is_configured());
    }

    #[test]
    fn test_init_on_empty_store_resets_to_defaults() {
        let store = MemoryStore::new();
        let mut settings = configured();
        settings.init(&store).unwrap();
        assert_eq!(settings, WiFiSettings::default());
    }

    #[test]
    fn test_save_and_init() {
        let store = MemoryStore::new();
        configured().save(&store).unwrap();

        let mut loaded = WiFiSettings::default();
        loaded.init(&store).unwrap();
        assert_eq!(loaded, configured());
        assert!(loaded.is_configured());
    }

    #[test]
    fn test_serialize_keys() {
        let value: Value = serde_json::from_str(&configured().serialize()).unwrap();
        assert_eq!(
            value,
            json!({
                "SSID": "HomeNet",
                "PASS": "secret",
                "Hostname": "knoblomat",
                "DHCP": false,
                "Address": "10.0.0.20",
                "Gateway": "10.0.0.1",
                "Subnet": "255.255.255.0",
                "DNS1": "1.1.1.1",
                "DNS2": "8.8.8.8"
            })
        );
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut settings = WiFiSettings::default();
        settings.deserialize(r#"{"ssid": "lower", "dhcp": false}"#).unwrap();
        assert_eq!(settings, WiFiSettings::default());
    }

    #[test]
    fn test_dns_update() {
        let mut settings = configured();
        settings.deserialize(r#"{"DNS2": "9.9.9.9"}"#).unwrap();
        assert_eq!(settings.dns1, "1.1.1.1");
        assert_eq!(settings.dns2, "9.9.9.9");
    }

    #[test]
    fn test_merge_truncates_every_text_field() {
        let mut settings = WiFiSettings::default();
        let long = "9".repeat(100);
        let text = json!({
            "SSID": long,
            "PASS": long,
            "Hostname": long,
            "Address": long,
            "Gateway": long,
            "Subnet": long,
            "DNS1": long,
            "DNS2": long,
        })
        .to_string();

        settings.deserialize(&text).unwrap();

        assert_eq!(settings.ssid.len(), 32);
        assert_eq!(settings.passphrase.len(), 64);
        assert_eq!(settings.hostname.len(), 32);
        assert_eq!(settings.address.len(), 15);
        assert_eq!(settings.gateway.len(), 15);
        assert_eq!(settings.subnet.len(), 15);
        assert_eq!(settings.dns1.len(), 15);
        assert_eq!(settings.dns2.len(), 15);
    }

    #[test]
    fn test_absent_keys_keep_long_values() {
        let mut settings = WiFiSettings::default();
        settings.ssid = "x".repeat(40);
        settings.dns1 = "1".repeat(20);

        settings.deserialize("{}").unwrap();
        settings.deserialize(r#"{"DHCP": false}"#).unwrap();

        assert_eq!(settings.ssid, "x".repeat(40));
        assert_eq!(settings.dns1, "1".repeat(20));
        assert!(!settings.dhcp);
    }
}
