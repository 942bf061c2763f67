//! Persistent device settings.
//!
//! Each settings group is a flat record of named fields with defaults. Groups
//! are loaded from and saved to a [`KeyValueStore`] namespace field by field,
//! and are reported and updated as JSON objects whose keys are the field
//! names. Updates are partial: a field absent from the incoming JSON keeps its
//! current value, and text longer than the field's limit is truncated.
//!
//! The groups share no base type; they all implement [`Settings`].

mod ap;
mod device;
mod game;
mod wifi;

pub use ap::ApSettings;
pub use device::DeviceSettings;
pub use game::{GameSettings, Outcome};
pub use wifi::WiFiSettings;

use crate::error::SettingsError;
use crate::json::{self, Document};
use crate::store::KeyValueStore;
use serde_json::Value;

/// Operations shared by every settings group and by the aggregate.
pub trait Settings {
    /// Load every field from the store. Absent keys resolve to defaults.
    fn init<S: KeyValueStore>(&mut self, store: &S) -> Result<(), SettingsError>;

    /// Write every field to the store.
    fn save<S: KeyValueStore>(&self, store: &S) -> Result<(), SettingsError>;

    /// Remove every field's key from the store. In-memory values are kept.
    fn clear<S: KeyValueStore>(&self, store: &S) -> Result<(), SettingsError>;

    /// Current values as a JSON object keyed by field name.
    fn to_json(&self) -> Value;

    /// Overwrite the fields present in `doc`.
    fn merge(&mut self, doc: &Document);

    /// Current values as pretty-printed JSON text.
    fn serialize(&self) -> String {
        json::to_pretty(&self.to_json())
    }

    /// Update fields from JSON text.
    ///
    /// Fails without touching any field if `text` is empty or malformed.
    fn deserialize(&mut self, text: &str) -> Result<(), SettingsError> {
        let doc = Document::parse(text).map_err(|e| {
            tracing::warn!("Rejected settings update: {}", e);
            e
        })?;
        self.merge(&doc);
        Ok(())
    }
}
