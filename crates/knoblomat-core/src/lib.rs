//! # knoblomat-core
//!
//! Settings and status data for the Knoblomat game device.
//!
//! This crate provides:
//! - The three settings groups (access point, WiFi station, game score)
//!   and the aggregate that composes them
//! - A namespaced key-value store abstraction with an in-memory implementation
//! - A JSON document wrapper implementing partial-update semantics
//! - Device status records (AP, WiFi, system, web server) and their JSON shape
//!
//! This crate is intentionally runtime-agnostic and contains no hardware
//! access, making it usable on both Linux (host tool, tests) and ESP32
//! (NVS-backed store) targets.

pub mod config;
pub mod error;
pub mod info;
pub mod json;
pub mod settings;
pub mod store;

pub use config::ApDefaults;
pub use error::{SettingsError, StoreError};
pub use json::Document;
pub use settings::{
    ApSettings, DeviceSettings, GameSettings, Outcome, Settings, WiFiSettings,
};
pub use store::{KeyValueStore, MemoryStore, Session};
