//! ESP32-specific components for Knoblomat.
//!
//! This crate provides the platform side of the settings contract defined in
//! `knoblomat-core`:
//! - NVS (Non-Volatile Storage) backed [`KeyValueStore`](knoblomat_core::KeyValueStore)
//! - WiFi station and access point bring-up from the stored settings
//! - System information read from the chip
//!
//! # Example
//!
//! ```ignore
//! use knoblomat_core::{DeviceSettings, Settings};
//! use knoblomat_esp32::nvs::NvsStore;
//! use knoblomat_esp32::wifi::connect_wifi;
//!
//! // Load settings from NVS
//! let store = NvsStore::take()?;
//! let mut settings = DeviceSettings::default();
//! settings.init(&store)?;
//!
//! // Connect to WiFi
//! let (wifi, info) = connect_wifi(&settings.wifi, modem, sysloop)?;
//! ```

pub mod nvs;
pub mod system;
pub mod wifi;
