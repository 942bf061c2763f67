//! WiFi bring-up for ESP32.
//!
//! Starts either the station (joining the network from [`WiFiSettings`]) or
//! the device's own access point (from [`ApSettings`]).

use anyhow::{anyhow, bail, Context, Result};
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::peripheral,
    ipv4::{
        self, ClientConfiguration as IpClientConfiguration, ClientSettings, Mask,
        RouterConfiguration, Subnet,
    },
    netif::{EspNetif, NetifConfiguration},
    wifi::{
        AccessPointConfiguration, AuthMethod, BlockingWifi, ClientConfiguration, Configuration,
        EspWifi,
    },
};
use knoblomat_core::info::{format_mac, network_id, prefix_to_mask, ApInfo, WiFiInfo};
use knoblomat_core::{ApSettings, WiFiSettings};
use log::{info, warn};
use std::net::Ipv4Addr;

/// Maximum number of stations on the access point.
const AP_MAX_CONNECTIONS: u16 = 4;

/// Minimum WPA2 passphrase length.
const MIN_WPA2_PASS_LEN: usize = 8;

fn parse_ip(field: &str, value: &str) -> Result<Ipv4Addr> {
    value
        .parse()
        .with_context(|| format!("{} '{}' is not an IPv4 address", field, value))
}

fn mask_prefix(mask: Ipv4Addr) -> u8 {
    u32::from(mask).leading_ones() as u8
}

/// Station netif with the static addressing from `settings`.
fn static_client_netif(settings: &WiFiSettings) -> Result<EspNetif> {
    let ip = parse_ip("Address", &settings.address)?;
    let gateway = parse_ip("Gateway", &settings.gateway)?;
    let mask = parse_ip("Subnet", &settings.subnet)?;

    let conf = NetifConfiguration {
        ip_configuration: Some(ipv4::Configuration::Client(IpClientConfiguration::Fixed(
            ClientSettings {
                ip,
                subnet: Subnet {
                    gateway,
                    mask: Mask(mask_prefix(mask)),
                },
                dns: settings.dns1.parse().ok(),
                secondary_dns: settings.dns2.parse().ok(),
            },
        ))),
        ..NetifConfiguration::wifi_default_client()
    };
    Ok(EspNetif::new_with_conf(&conf)?)
}

/// Access point netif with the custom addressing from `settings`.
fn custom_router_netif(settings: &ApSettings) -> Result<EspNetif> {
    let address = parse_ip("Address", &settings.address)?;
    let mask = parse_ip("Subnet", &settings.subnet)?;
    if !settings.gateway.is_empty() && settings.gateway != settings.address {
        warn!("AP gateway {} differs from AP address, using {}", settings.gateway, address);
    }

    let conf = NetifConfiguration {
        ip_configuration: Some(ipv4::Configuration::Router(RouterConfiguration {
            subnet: Subnet {
                gateway: address,
                mask: Mask(mask_prefix(mask)),
            },
            dhcp_enabled: true,
            dns: None,
            secondary_dns: None,
        })),
        ..NetifConfiguration::wifi_default_router()
    };
    Ok(EspNetif::new_with_conf(&conf)?)
}

/// Connect to the WiFi network configured in `settings`.
///
/// This function handles the full WiFi connection process:
/// 1. Applies hostname and (if DHCP is off) the static addressing
/// 2. Scans for the target network and its channel
/// 3. Connects with the stored credentials
/// 4. Waits for the network interface to come up
///
/// Returns a boxed `EspWifi` instance that must be kept alive for the
/// connection to remain active, and the resulting connection info.
pub fn connect_wifi(
    settings: &WiFiSettings,
    modem: impl peripheral::Peripheral<P = esp_idf_svc::hal::modem::Modem> + 'static,
    sysloop: EspSystemEventLoop,
) -> Result<(Box<EspWifi<'static>>, WiFiInfo)> {
    if !settings.is_configured() {
        bail!("WiFi SSID cannot be empty");
    }

    let auth_method = if settings.passphrase.is_empty() {
        info!("WiFi password is empty, using open network");
        AuthMethod::None
    } else {
        AuthMethod::WPA2Personal
    };

    let mut esp_wifi = EspWifi::new(modem, sysloop.clone(), None)?;
    if !settings.dhcp {
        info!("Using static address {}", settings.address);
        esp_wifi.swap_netif_sta(static_client_netif(settings)?)?;
    }
    esp_wifi.sta_netif_mut().set_hostname(&settings.hostname)?;

    let mut wifi = BlockingWifi::wrap(&mut esp_wifi, sysloop)?;

    // Initial configuration for scanning
    wifi.set_configuration(&Configuration::Client(ClientConfiguration::default()))?;
    wifi.start()?;

    info!("Scanning for WiFi networks...");
    let found = wifi
        .scan()?
        .into_iter()
        .find(|ap| ap.ssid == settings.ssid.as_str());

    match &found {
        Some(ap) => info!("Found '{}' on channel {}", settings.ssid, ap.channel),
        None => info!("Network '{}' not found in scan, will try anyway", settings.ssid),
    }

    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: settings
            .ssid
            .as_str()
            .try_into()
            .map_err(|_| anyhow!("SSID too long (max 32 bytes)"))?,
        password: settings
            .passphrase
            .as_str()
            .try_into()
            .map_err(|_| anyhow!("Password too long (max 64 bytes)"))?,
        channel: found.as_ref().map(|ap| ap.channel),
        auth_method,
        ..Default::default()
    }))?;

    info!("Connecting to '{}'...", settings.ssid);
    wifi.connect()?;

    info!("Waiting for network interface...");
    wifi.wait_netif_up()?;

    let netif = wifi.wifi().sta_netif();
    let ip_info = netif.get_ip_info()?;
    let mask = prefix_to_mask(ip_info.subnet.mask.0);

    let wifi_info = WiFiInfo {
        ssid: settings.ssid.clone(),
        passphrase: settings.passphrase.clone(),
        hostname: netif.get_hostname()?.to_string(),
        network_id: network_id(ip_info.ip, mask).to_string(),
        address: ip_info.ip.to_string(),
        gateway: ip_info.subnet.gateway.to_string(),
        subnet: mask.to_string(),
        dns: ip_info.dns.map(|dns| dns.to_string()).unwrap_or_default(),
        rssi: found.as_ref().map_or(0, |ap| i32::from(ap.signal_strength)),
        bssid: found.as_ref().map(|ap| format_mac(&ap.bssid)).unwrap_or_default(),
        mac: format_mac(&netif.get_mac()?),
    };
    info!("WiFi connected!");
    info!("  IP address: {}", wifi_info.address);
    info!("  Gateway:    {}", wifi_info.gateway);
    info!("  Netmask:    {}", wifi_info.subnet);

    Ok((Box::new(esp_wifi), wifi_info))
}

/// Start the device's own access point as configured in `settings`.
///
/// Custom addressing is applied only when `settings.custom` is set;
/// otherwise the ESP-IDF default (192.168.71.1/24) is used.
pub fn start_access_point(
    settings: &ApSettings,
    modem: impl peripheral::Peripheral<P = esp_idf_svc::hal::modem::Modem> + 'static,
    sysloop: EspSystemEventLoop,
) -> Result<(Box<EspWifi<'static>>, ApInfo)> {
    let auth_method = match settings.passphrase.len() {
        0 => AuthMethod::None,
        n if n < MIN_WPA2_PASS_LEN => {
            bail!("AP passphrase must be at least {} characters", MIN_WPA2_PASS_LEN)
        }
        _ => AuthMethod::WPA2Personal,
    };

    let mut esp_wifi = EspWifi::new(modem, sysloop.clone(), None)?;
    if settings.custom {
        info!("Using custom AP address {}", settings.address);
        esp_wifi.swap_netif_ap(custom_router_netif(settings)?)?;
    }
    esp_wifi.ap_netif_mut().set_hostname(&settings.hostname)?;

    let mut wifi = BlockingWifi::wrap(&mut esp_wifi, sysloop)?;
    wifi.set_configuration(&Configuration::AccessPoint(AccessPointConfiguration {
        ssid: settings
            .ssid
            .as_str()
            .try_into()
            .map_err(|_| anyhow!("SSID too long (max 32 bytes)"))?,
        password: settings
            .passphrase
            .as_str()
            .try_into()
            .map_err(|_| anyhow!("Password too long (max 64 bytes)"))?,
        auth_method,
        max_connections: AP_MAX_CONNECTIONS,
        ..Default::default()
    }))?;

    info!("Starting access point '{}'...", settings.ssid);
    wifi.start()?;
    wifi.wait_netif_up()?;

    let netif = wifi.wifi().ap_netif();
    let ip_info = netif.get_ip_info()?;
    let mask = prefix_to_mask(ip_info.subnet.mask.0);

    let ap_info = ApInfo {
        ssid: settings.ssid.clone(),
        passphrase: settings.passphrase.clone(),
        hostname: netif.get_hostname()?.to_string(),
        network_id: network_id(ip_info.ip, mask).to_string(),
        address: ip_info.ip.to_string(),
        clients: 0,
        mac: format_mac(&netif.get_mac()?),
    };
    info!("Access point up at {}", ap_info.address);

    Ok((Box::new(esp_wifi), ap_info))
}
