//! Access point settings.

use super::Settings;
use crate::config::{
    ApDefaults, AP_NAMESPACE, DEFAULT_SUBNET_MASK, MAX_HOSTNAME_LEN, MAX_IPADDRESS_LEN,
    MAX_PASS_LEN, MAX_SSID_LEN,
};
use crate::error::SettingsError;
use crate::json::Document;
use crate::store::{KeyValueStore, Session};
use serde_json::{json, Value};

const KEY_SSID: &str = "SSID";
const KEY_PASS: &str = "PASS";
const KEY_CUSTOM: &str = "Custom";
const KEY_HOSTNAME: &str = "Hostname";
const KEY_ADDRESS: &str = "Address";
const KEY_GATEWAY: &str = "Gateway";
const KEY_SUBNET: &str = "Subnet";

const KEYS: [&str; 7] = [
    KEY_SSID,
    KEY_PASS,
    KEY_HOSTNAME,
    KEY_CUSTOM,
    KEY_ADDRESS,
    KEY_GATEWAY,
    KEY_SUBNET,
];

/// Settings of the device's own WiFi access point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApSettings {
    /// Access point SSID.
    pub ssid: String,

    /// Access point passphrase (empty for an open network).
    pub passphrase: String,

    /// Use the custom address/gateway/subnet instead of the ESP-IDF defaults.
    pub custom: bool,

    /// Access point hostname.
    pub hostname: String,

    /// Custom access point address.
    pub address: String,

    /// Custom gateway address.
    pub gateway: String,

    /// Custom subnet mask.
    pub subnet: String,

    defaults: ApDefaults,
}

impl Default for ApSettings {
    fn default() -> Self {
        Self::new(ApDefaults::default())
    }
}

impl ApSettings {
    /// Create settings holding the given build-time defaults.
    pub fn new(defaults: ApDefaults) -> Self {
        Self {
            ssid: defaults.ssid.clone(),
            passphrase: String::new(),
            custom: false,
            hostname: defaults.hostname.clone(),
            address: String::new(),
            gateway: String::new(),
            subnet: DEFAULT_SUBNET_MASK.to_string(),
            defaults,
        }
    }

    /// The build-time defaults used when the store holds nothing.
    pub fn defaults(&self) -> &ApDefaults {
        &self.defaults
    }
}

impl Settings for ApSettings {
    fn init<S: KeyValueStore>(&mut self, store: &S) -> Result<(), SettingsError> {
        let session = store.open(AP_NAMESPACE)?;
        self.ssid = session.string_or(KEY_SSID, &self.defaults.ssid)?;
        self.passphrase = session.string_or(KEY_PASS, "")?;
        self.hostname = session.string_or(KEY_HOSTNAME, &self.defaults.hostname)?;
        self.custom = session.bool_or(KEY_CUSTOM, false)?;
        self.address = session.string_or(KEY_ADDRESS, "")?;
        self.gateway = session.string_or(KEY_GATEWAY, "")?;
        self.subnet = session.string_or(KEY_SUBNET, DEFAULT_SUBNET_MASK)?;
        tracing::debug!("Loaded {} settings", AP_NAMESPACE);
        Ok(())
    }

    fn save<S: KeyValueStore>(&self, store: &S) -> Result<(), SettingsError> {
        let mut session = store.open(AP_NAMESPACE)?;
        session.put_string(KEY_SSID, &self.ssid)?;
        session.put_string(KEY_PASS, &self.passphrase)?;
        session.put_string(KEY_HOSTNAME, &self.hostname)?;
        session.put_bool(KEY_CUSTOM, self.custom)?;
        session.put_string(KEY_ADDRESS, &self.address)?;
        session.put_string(KEY_GATEWAY, &self.gateway)?;
        session.put_string(KEY_SUBNET, &self.subnet)?;
        tracing::debug!("Saved {} settings", AP_NAMESPACE);
        Ok(())
    }

    fn clear<S: KeyValueStore>(&self, store: &S) -> Result<(), SettingsError> {
        let mut session = store.open(AP_NAMESPACE)?;
        for key in KEYS {
            session.remove(key)?;
        }
        tracing::debug!("Cleared {} settings", AP_NAMESPACE);
        Ok(())
    }

    fn to_json(&self) -> Value {
        json!({
            KEY_SSID: self.ssid,
            KEY_PASS: self.passphrase,
            KEY_HOSTNAME: self.hostname,
            KEY_CUSTOM: self.custom,
            KEY_ADDRESS: self.address,
            KEY_GATEWAY: self.gateway,
            KEY_SUBNET: self.subnet,
        })
    }

    fn merge(&mut self, doc: &Document) {
        self.ssid = doc.text(KEY_SSID, &self.ssid, MAX_SSID_LEN);
        self.passphrase = doc.text(KEY_PASS, &self.passphrase, MAX_PASS_LEN);
        self.hostname = doc.text(KEY_HOSTNAME, &self.hostname, MAX_HOSTNAME_LEN);
        self.custom = doc.flag(KEY_CUSTOM, self.custom);
        self.address = doc.text(KEY_ADDRESS, &self.address, MAX_IPADDRESS_LEN);
        self.gateway = doc.text(KEY_GATEWAY, &self.gateway, MAX_IPADDRESS_LEN);
        self.subnet = doc.text(KEY_SUBNET, &self.subnet, MAX_IPADDRESS_LEN);
    }
}
