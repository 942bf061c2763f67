//! Error types for settings persistence and JSON updates.

use thiserror::Error;

/// Errors reported by a [`KeyValueStore`](crate::store::KeyValueStore) backend.
///
/// A missing key is never an error; sessions report it as `None`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store (or the requested namespace) could not be opened.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The backend failed to read, write or remove a key.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Errors that can occur while loading, saving or updating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The JSON text handed to `deserialize` was empty.
    #[error("Empty settings document")]
    EmptyInput,

    /// The JSON text handed to `deserialize` was malformed.
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// The persistent store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SettingsError {
    /// True for the errors `deserialize` reports on rejected input.
    pub fn is_rejected_input(&self) -> bool {
        matches!(self, SettingsError::EmptyInput | SettingsError::Parse(_))
    }
}
