//! Knoblomat firmware for ESP32
//!
//! This binary requires the ESP32 Rust toolchain.
//! It will not compile with the standard Rust toolchain.
//!
//! Boot sequence:
//! 1. Load all settings from NVS (defaults for anything not stored)
//! 2. Join the configured WiFi network, or start the access point when no
//!    station credentials are stored
//! 3. Report system and web server info

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::log::EspLogger;
use knoblomat_core::config::{DEFAULT_AP_SSID, DEFAULT_HOSTNAME, DEFAULT_HTTP_PORT};
use knoblomat_core::info::ServerInfo;
use knoblomat_core::{ApDefaults, DeviceSettings, Settings};
use knoblomat_esp32::nvs::NvsStore;
use knoblomat_esp32::system::read_system_info;
use knoblomat_esp32::wifi::{connect_wifi, start_access_point};
use log::info;
use std::time::Duration;

/// Firmware version reported as `Software` in the system info.
const SOFTWARE_VERSION: &str = concat!("knoblomat ", env!("CARGO_PKG_VERSION"));

/// Access point defaults, overridable when building the firmware.
fn ap_defaults() -> ApDefaults {
    ApDefaults::new(
        option_env!("KNOBLOMAT_AP_SSID").unwrap_or(DEFAULT_AP_SSID),
        option_env!("KNOBLOMAT_AP_HOSTNAME").unwrap_or(DEFAULT_HOSTNAME),
    )
}

fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();
    EspLogger::initialize_default();

    info!("{} starting...", SOFTWARE_VERSION);

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let store = NvsStore::take()?;

    let mut settings = DeviceSettings::new(ap_defaults());
    settings.init(&store)?;
    info!("Settings:\n{}", settings.serialize());

    let (_wifi, server) = if settings.wifi.is_configured() {
        let (wifi, wifi_info) = connect_wifi(&settings.wifi, peripherals.modem, sysloop)?;
        info!("{}", wifi_info);
        let server = ServerInfo::new(
            &settings.wifi.hostname,
            DEFAULT_HTTP_PORT,
            &wifi_info.address,
            "",
        );
        (wifi, server)
    } else {
        info!("No WiFi credentials stored, starting access point");
        let (wifi, ap_info) = start_access_point(&settings.ap, peripherals.modem, sysloop)?;
        info!("{}", ap_info);
        let server = ServerInfo::new(
            &settings.ap.hostname,
            DEFAULT_HTTP_PORT,
            "",
            &ap_info.address,
        );
        (wifi, server)
    };

    info!("{}", read_system_info(SOFTWARE_VERSION));
    info!("{}", server);

    // Keep the WiFi driver alive
    loop {
        std::thread::sleep(Duration::from_secs(1));
    }
}
