//! End-to-end tests of the settings persistence and JSON update contract.
//!
//! These tests drive the public API against an in-memory store the way the
//! firmware does: boot-time `init`, JSON updates from the management side,
//! `save`, and factory reset via `clear`.

use knoblomat_core::{
    ApDefaults, ApSettings, DeviceSettings, GameSettings, MemoryStore, Settings, SettingsError,
    WiFiSettings,
};
use pretty_assertions::assert_eq;
use serde_json::Value;

fn parse(text: &str) -> Value {
    serde_json::from_str(text).expect("serialize must produce valid JSON")
}

fn populated() -> DeviceSettings {
    let mut settings = DeviceSettings::new(ApDefaults::new("Knob-AP", "knob"));
    settings.ap.passphrase = "ap-secret".to_string();
    settings.ap.custom = true;
    settings.ap.address = "192.168.10.1".to_string();
    settings.ap.gateway = "192.168.10.1".to_string();
    settings.wifi.ssid = "HomeNet".to_string();
    settings.wifi.passphrase = "home-secret".to_string();
    settings.wifi.dhcp = false;
    settings.wifi.address = "10.0.0.20".to_string();
    settings.wifi.dns1 = "10.0.0.1".to_string();
    settings.game.ties = 3;
    settings.game.wins = 14;
    settings.game.losses = 9;
    settings
}

#[test]
fn test_fresh_store_yields_defaults() {
    let store = MemoryStore::new();
    let mut settings = populated();
    settings.clear(&store).unwrap();
    settings.init(&store).unwrap();

    let value = parse(&settings.serialize());
    assert_eq!(value["WiFiSettings"]["DHCP"], true);
    assert_eq!(value["WiFiSettings"]["Subnet"], "255.255.255.0");
    assert_eq!(value["WiFiSettings"]["Hostname"], "knoblomat");
    assert_eq!(value["ApSettings"]["SSID"], "Knob-AP");
    assert_eq!(value["ApSettings"]["Hostname"], "knob");
    assert_eq!(value["ApSettings"]["Custom"], false);
    assert_eq!(value["GameSettings"]["Wins"], 0);
    assert_eq!(store.open_sessions(), 0);
}

#[test]
fn test_serialize_deserialize_is_idempotent() {
    let original = populated();

    let mut ap = ApSettings::default();
    ap.deserialize(&original.ap.serialize()).unwrap();
    assert_eq!(ap.serialize(), original.ap.serialize());

    let mut wifi = WiFiSettings::default();
    wifi.deserialize(&original.wifi.serialize()).unwrap();
    assert_eq!(wifi, original.wifi);

    let mut game = GameSettings::default();
    game.deserialize(&original.game.serialize()).unwrap();
    assert_eq!(game, original.game);

    let mut all = populated();
    all.deserialize(&original.serialize()).unwrap();
    assert_eq!(all, original);
}

#[test]
fn test_oversized_ssid_is_truncated() {
    let mut wifi = WiFiSettings::default();
    let ssid: String = ('a'..='z').chain('A'..='N').collect();
    assert_eq!(ssid.len(), 40);

    wifi.deserialize(&format!(r#"{{"SSID":"{}"}}"#, ssid)).unwrap();
    assert_eq!(wifi.ssid, &ssid[..32]);
}

#[test]
fn test_partial_update_keeps_other_fields() {
    let mut wifi = WiFiSettings {
        ssid: "A".to_string(),
        passphrase: "B".to_string(),
        ..Default::default()
    };

    wifi.deserialize(r#"{"SSID":"C"}"#).unwrap();
    assert_eq!(wifi.ssid, "C");
    assert_eq!(wifi.passphrase, "B");
}

#[test]
fn test_rejected_input_mutates_nothing() {
    let mut settings = populated();
    let before = settings.clone();

    for text in ["", "not json", "{\"WiFiSettings\": {\"SSID\": \"x\"}"] {
        let err = settings.deserialize(text).unwrap_err();
        assert!(err.is_rejected_input(), "{text:?} gave {err}");
    }
    assert!(matches!(settings.wifi.deserialize(""), Err(SettingsError::EmptyInput)));
    assert!(matches!(settings.game.deserialize("not json"), Err(SettingsError::Parse(_))));
    assert_eq!(settings, before);
}

#[test]
fn test_empty_object_keeps_everything() {
    let mut settings = populated();
    settings.deserialize("{}").unwrap();
    settings.ap.deserialize("{}").unwrap();
    settings.wifi.deserialize("[]").unwrap();
    assert_eq!(settings, populated());
}

#[test]
fn test_save_then_fresh_init_reproduces_state() {
    let store = MemoryStore::new();
    let original = populated();
    original.save(&store).unwrap();

    let mut fresh = DeviceSettings::new(ApDefaults::new("Knob-AP", "knob"));
    fresh.init(&store).unwrap();
    assert_eq!(fresh, original);

    // A second save/init cycle on unchanged state changes nothing
    fresh.save(&store).unwrap();
    fresh.init(&store).unwrap();
    assert_eq!(fresh, original);
}

#[test]
fn test_aggregate_sections_match_group_schemas() {
    let settings = populated();
    let value = parse(&settings.serialize());
    let object = value.as_object().unwrap();

    assert_eq!(object.len(), 3);
    assert_eq!(object["ApSettings"], parse(&settings.ap.serialize()));
    assert_eq!(object["WiFiSettings"], parse(&settings.wifi.serialize()));
    assert_eq!(object["GameSettings"], parse(&settings.game.serialize()));
    assert_eq!(object["ApSettings"].as_object().unwrap().len(), 7);
    assert_eq!(object["WiFiSettings"].as_object().unwrap().len(), 9);
    assert_eq!(object["GameSettings"].as_object().unwrap().len(), 3);
}

#[test]
fn test_clear_then_fresh_init_returns_defaults() {
    let store = MemoryStore::new();
    let settings = populated();
    settings.save(&store).unwrap();
    settings.clear(&store).unwrap();

    let mut fresh = DeviceSettings::new(ApDefaults::new("Knob-AP", "knob"));
    fresh.game.wins = 99;
    fresh.init(&store).unwrap();
    assert_eq!(fresh, DeviceSettings::new(ApDefaults::new("Knob-AP", "knob")));
}

#[test]
fn test_serialized_field_order_follows_firmware() {
    let text = WiFiSettings::default().serialize();
    let order: Vec<String> = parse(&text).as_object().unwrap().keys().cloned().collect();
    assert_eq!(
        order,
        vec!["SSID", "PASS", "Hostname", "DHCP", "Address", "Gateway", "Subnet", "DNS1", "DNS2"]
    );
    assert!(text.starts_with("{\n  \"SSID\": \"\""));
}
