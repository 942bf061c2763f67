//! All device settings.

use super::{ApSettings, GameSettings, Settings, WiFiSettings};
use crate::config::ApDefaults;
use crate::error::SettingsError;
use crate::json::Document;
use crate::store::KeyValueStore;
use serde_json::{json, Value};

const KEY_AP: &str = "ApSettings";
const KEY_WIFI: &str = "WiFiSettings";
const KEY_GAME: &str = "GameSettings";

/// The access point, WiFi and game settings of one device.
///
/// Store operations run in the order access point, WiFi, game and stop at
/// the first failing group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSettings {
    pub ap: ApSettings,
    pub wifi: WiFiSettings,
    pub game: GameSettings,
}

impl DeviceSettings {
    /// Create settings with the given access point defaults.
    pub fn new(ap_defaults: ApDefaults) -> Self {
        Self {
            ap: ApSettings::new(ap_defaults),
            wifi: WiFiSettings::default(),
            game: GameSettings::default(),
        }
    }
}

impl Settings for DeviceSettings {
    fn init<S: KeyValueStore>(&mut self, store: &S) -> Result<(), SettingsError> {
        self.ap.init(store)?;
        self.wifi.init(store)?;
        self.game.init(store)
    }

    fn save<S: KeyValueStore>(&self, store: &S) -> Result<(), SettingsError> {
        self.ap.save(store)?;
        self.wifi.save(store)?;
        self.game.save(store)
    }

    fn clear<S: KeyValueStore>(&self, store: &S) -> Result<(), SettingsError> {
        self.ap.clear(store)?;
        self.wifi.clear(store)?;
        self.game.clear(store)
    }

    fn to_json(&self) -> Value {
        json!({
            KEY_AP: self.ap.to_json(),
            KEY_WIFI: self.wifi.to_json(),
            KEY_GAME: self.game.to_json(),
        })
    }

    // An absent or non-object section yields an empty document, which
    // leaves that group unchanged.
    fn merge(&mut self, doc: &Document) {
        self.ap.merge(&doc.child(KEY_AP));
        self.wifi.merge(&doc.child(KEY_WIFI));
        self.game.merge(&doc.child(KEY_GAME));
    }
}
