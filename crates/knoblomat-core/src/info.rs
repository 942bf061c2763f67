//! Device status records.
//!
//! Snapshots of the access point, WiFi station, chip and web server state as
//! reported by the device. Reading the values from hardware is the job of the
//! platform crate; this module defines the records, their JSON shape and a
//! console listing (`Display`).

use crate::config::{DEFAULT_HOSTNAME, DEFAULT_HTTP_PORT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Format a MAC address as `AA:BB:CC:DD:EE:FF`.
pub fn format_mac(mac: &[u8; 6]) -> String {
    mac.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Chip identifier: the low 48 bits of the eFuse MAC as 12 hex digits.
pub fn chip_id(efuse_mac: u64) -> String {
    format!("{:012X}", efuse_mac & 0xFFFF_FFFF_FFFF)
}

/// Network address of `ip` under `mask`.
pub fn network_id(ip: Ipv4Addr, mask: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(ip) & u32::from(mask))
}

/// Subnet mask for a prefix length (values above 32 are clamped).
pub fn prefix_to_mask(prefix: u8) -> Ipv4Addr {
    let prefix = u32::from(prefix.min(32));
    let bits = if prefix == 0 { 0 } else { u32::MAX << (32 - prefix) };
    Ipv4Addr::from(bits)
}

/// Live access point state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApInfo {
    #[serde(rename = "SSID")]
    pub ssid: String,

    #[serde(rename = "PASS")]
    pub passphrase: String,

    #[serde(rename = "Hostname")]
    pub hostname: String,

    #[serde(rename = "NetworkID")]
    pub network_id: String,

    #[serde(rename = "Address")]
    pub address: String,

    /// Connected stations.
    #[serde(rename = "Clients")]
    pub clients: u32,

    #[serde(rename = "MAC")]
    pub mac: String,
}

impl ApInfo {
    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ApInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "WiFi Accesspoint Info:")?;
        writeln!(f, "    SSID:      {}", self.ssid)?;
        writeln!(f, "    PASS:      {}", self.passphrase)?;
        writeln!(f, "    Hostname:  {}", self.hostname)?;
        writeln!(f, "    NetworkID: {}", self.network_id)?;
        writeln!(f, "    Address:   {}", self.address)?;
        writeln!(f, "    Clients:   {}", self.clients)?;
        write!(f, "    MAC:       {}", self.mac)
    }
}

/// Live WiFi station state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WiFiInfo {
    #[serde(rename = "SSID")]
    pub ssid: String,

    #[serde(rename = "PASS")]
    pub passphrase: String,

    #[serde(rename = "Hostname")]
    pub hostname: String,

    #[serde(rename = "NetworkID")]
    pub network_id: String,

    #[serde(rename = "Address")]
    pub address: String,

    #[serde(rename = "Gateway")]
    pub gateway: String,

    #[serde(rename = "Subnet")]
    pub subnet: String,

    #[serde(rename = "DNS")]
    pub dns: String,

    /// Signal strength in dBm.
    #[serde(rename = "RSSI")]
    pub rssi: i32,

    /// MAC address of the access point we are associated with.
    #[serde(rename = "BSSID")]
    pub bssid: String,

    #[serde(rename = "MAC")]
    pub mac: String,
}

impl WiFiInfo {
    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for WiFiInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "WiFi Connection Info:")?;
        writeln!(f, "    SSID:      {}", self.ssid)?;
        writeln!(f, "    PASS:      {}", self.passphrase)?;
        writeln!(f, "    NetworkID: {}", self.network_id)?;
        writeln!(f, "    Hostname:  {}", self.hostname)?;
        writeln!(f, "    Address:   {}", self.address)?;
        writeln!(f, "    Gateway:   {}", self.gateway)?;
        writeln!(f, "    Subnet:    {}", self.subnet)?;
        writeln!(f, "    DNS:       {}", self.dns)?;
        writeln!(f, "    RSSI(dBm): {}", self.rssi)?;
        writeln!(f, "    BSSID:     {}", self.bssid)?;
        write!(f, "    MAC:       {}", self.mac)
    }
}

/// Chip and firmware image state.
///
/// Sizes are in kB, frequencies in MHz.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemInfo {
    pub chip_revision: u32,
    #[serde(rename = "CpuFreqMHz")]
    pub cpu_freq_mhz: u32,
    pub flash_chip_speed: u32,
    pub flash_chip_size: u32,
    pub heap_size: u32,
    pub free_heap: u32,
    pub sketch_size: u32,
    pub free_sketch_space: u32,
    #[serde(rename = "SketchMD5")]
    pub sketch_md5: String,
    pub sdk_version: String,
    #[serde(rename = "ChipID")]
    pub chip_id: String,
    /// Firmware version and build date.
    pub software: String,
}

impl SystemInfo {
    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SystemInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "System Info:")?;
        writeln!(f, "    ChipRevision:    {}", self.chip_revision)?;
        writeln!(f, "    CpuFreqMHz:      {}", self.cpu_freq_mhz)?;
        writeln!(f, "    FlashChipSpeed:  {}", self.flash_chip_speed)?;
        writeln!(f, "    FlashChipSize:   {}", self.flash_chip_size)?;
        writeln!(f, "    HeapSize:        {}", self.heap_size)?;
        writeln!(f, "    FreeHeap:        {}", self.free_heap)?;
        writeln!(f, "    SketchSize:      {}", self.sketch_size)?;
        writeln!(f, "    FreeSketchSpace: {}", self.free_sketch_space)?;
        writeln!(f, "    SketchMD5:       {}", self.sketch_md5)?;
        writeln!(f, "    SdkVersion:      {}", self.sdk_version)?;
        writeln!(f, "    ChipID:          {}", self.chip_id)?;
        write!(f, "    Software:        {}", self.software)
    }
}

/// Web server addressing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerInfo {
    /// Address on the WiFi station interface.
    #[serde(rename = "WiFiAddress")]
    pub wifi_address: String,
    /// Address on the access point interface.
    pub ap_address: String,
    /// mDNS hostname.
    pub name: String,
    pub port: u16,
    pub url: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self::new(DEFAULT_HOSTNAME, DEFAULT_HTTP_PORT, "", "")
    }
}

impl ServerInfo {
    pub fn new(name: &str, port: u16, wifi_address: &str, ap_address: &str) -> Self {
        Self {
            wifi_address: wifi_address.to_string(),
            ap_address: ap_address.to_string(),
            name: name.to_string(),
            port,
            url: format!("http://{}", name),
        }
    }

    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ServerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Web Server Info:")?;
        writeln!(f, "    WiFi Address: {}", self.wifi_address)?;
        writeln!(f, "    AP Address:   {}", self.ap_address)?;
        writeln!(f, "    Name:         {}", self.name)?;
        writeln!(f, "    Port:         {}", self.port)?;
        write!(f, "    URL:          {}", self.url)
    }
}
