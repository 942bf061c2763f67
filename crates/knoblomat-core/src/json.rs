//! JSON documents with partial-update accessors.
//!
//! A [`Document`] is parsed once and then queried field by field. Every
//! accessor takes the field's current value and returns it unchanged when
//! the key is absent or holds a value of the wrong JSON type, so applying a
//! document only overwrites what it actually carries.

use crate::error::SettingsError;
use serde_json::{Map, Value};

/// A parsed JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    /// Parse a JSON text.
    ///
    /// Empty text and malformed JSON are rejected. Well-formed JSON that is
    /// not an object yields an empty document.
    pub fn parse(text: &str) -> Result<Self, SettingsError> {
        if text.is_empty() {
            return Err(SettingsError::EmptyInput);
        }

        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(value))
    }

    /// Wrap an already parsed value.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    /// True if the document carries no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Read a text field. Only an incoming value is truncated to `max_len`
    /// bytes; `current` is returned as is.
    pub fn text(&self, key: &str, current: &str, max_len: usize) -> String {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(|value| truncate(value, max_len))
            .unwrap_or(current)
            .to_string()
    }

    /// Read a boolean field.
    pub fn flag(&self, key: &str, current: bool) -> bool {
        self.fields
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(current)
    }

    /// Read an integer field. Values outside the `i32` range keep `current`.
    pub fn int(&self, key: &str, current: i32) -> i32 {
        self.fields
            .get(key)
            .and_then(Value::as_i64)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(current)
    }

    /// The named sub-object, or an empty document.
    pub fn child(&self, key: &str) -> Document {
        self.fields
            .get(key)
            .cloned()
            .map(Self::from_value)
            .unwrap_or_default()
    }
}

/// Shorten `text` to at most `max_len` bytes without splitting a character.
pub fn truncate(text: &str, max_len: usize) -> &str {
    if text.len() <= max_len {
        return text;
    }

    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Render a value as indented JSON text.
pub fn to_pretty(value: &Value) -> String {
    format!("{:#}", value)
}
