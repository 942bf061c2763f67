//! Namespaced key-value storage.
//!
//! Settings groups persist their fields through a [`KeyValueStore`]. Each
//! operation opens a [`Session`] on the group's namespace, performs typed
//! reads or writes, and closes the session by dropping it. Implementations:
//! - [`MemoryStore`] for tests and host tooling
//! - `NvsStore` in `knoblomat-esp32` (ESP-IDF non-volatile storage)
//! - `FileStore` in the Linux host tool (one JSON file per namespace)

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockWriteGuard};

/// An open session on one namespace of a [`KeyValueStore`].
///
/// Getters return `Ok(None)` for absent keys, and also for keys holding a
/// value of another type. The session is closed when it is dropped.
pub trait Session {
    /// Read a string value.
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Read a boolean value.
    fn get_bool(&self, key: &str) -> Result<Option<bool>, StoreError>;

    /// Read a 32-bit integer value.
    fn get_int(&self, key: &str) -> Result<Option<i32>, StoreError>;

    /// Write a string value.
    fn put_string(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Write a boolean value.
    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError>;

    /// Write a 32-bit integer value.
    fn put_int(&mut self, key: &str, value: i32) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key succeeds.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Read a string value, falling back to `default` when absent.
    fn string_or(&self, key: &str, default: &str) -> Result<String, StoreError> {
        Ok(self
            .get_string(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Read a boolean value, falling back to `default` when absent.
    fn bool_or(&self, key: &str, default: bool) -> Result<bool, StoreError> {
        Ok(self.get_bool(key)?.unwrap_or(default))
    }

    /// Read an integer value, falling back to `default` when absent.
    fn int_or(&self, key: &str, default: i32) -> Result<i32, StoreError> {
        Ok(self.get_int(key)?.unwrap_or(default))
    }
}

/// A persistent store partitioned into namespaces.
pub trait KeyValueStore {
    /// Session type returned by [`open`](KeyValueStore::open).
    type Session<'a>: Session
    where
        Self: 'a;

    /// Open a read-write session on `namespace`.
    fn open(&self, namespace: &str) -> Result<Self::Session<'_>, StoreError>;
}

/// A typed stored value.
///
/// The untagged representation keeps file-backed stores human readable:
/// `{"SSID": "knoblomat", "DHCP": true, "Wins": 3}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Bool(bool),
    Int(i32),
    String(String),
}

impl StoredValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoredValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StoredValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            StoredValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

type Namespaces = HashMap<String, HashMap<String, StoredValue>>;

/// In-memory key-value store.
///
/// Only one session can be open at a time; a session holds the store's
/// write lock until it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    namespaces: RwLock<Namespaces>,
    open_sessions: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently open.
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }

    /// Check whether `key` is stored in `namespace`.
    pub fn contains(&self, namespace: &str, key: &str) -> bool {
        self.namespaces
            .read()
            .map(|data| data.get(namespace).is_some_and(|ns| ns.contains_key(key)))
            .unwrap_or(false)
    }

    /// Sorted list of keys stored in `namespace`.
    pub fn keys(&self, namespace: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .namespaces
            .read()
            .map(|data| {
                data.get(namespace)
                    .map(|ns| ns.keys().cloned().collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryStore {
    type Session<'a> = MemorySession<'a>;

    fn open(&self, namespace: &str) -> Result<MemorySession<'_>, StoreError> {
        let entries = self
            .namespaces
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        self.open_sessions.fetch_add(1, Ordering::SeqCst);

        Ok(MemorySession {
            entries,
            namespace: namespace.to_string(),
            open_sessions: &self.open_sessions,
        })
    }
}

/// Session on a [`MemoryStore`] namespace.
pub struct MemorySession<'a> {
    entries: RwLockWriteGuard<'a, Namespaces>,
    namespace: String,
    open_sessions: &'a AtomicUsize,
}

impl MemorySession<'_> {
    fn get(&self, key: &str) -> Option<&StoredValue> {
        self.entries.get(&self.namespace)?.get(key)
    }

    fn put(&mut self, key: &str, value: StoredValue) {
        self.entries
            .entry(self.namespace.clone())
            .or_default()
            .insert(key.to_string(), value);
    }
}

impl Session for MemorySession<'_> {
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get(key).and_then(StoredValue::as_str).map(String::from))
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, StoreError> {
        Ok(self.get(key).and_then(StoredValue::as_bool))
    }

    fn get_int(&self, key: &str) -> Result<Option<i32>, StoreError> {
        Ok(self.get(key).and_then(StoredValue::as_int))
    }

    fn put_string(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.put(key, StoredValue::String(value.to_string()));
        Ok(())
    }

    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.put(key, StoredValue::Bool(value));
        Ok(())
    }

    fn put_int(&mut self, key: &str, value: i32) -> Result<(), StoreError> {
        self.put(key, StoredValue::Int(value));
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if let Some(ns) = self.entries.get_mut(&self.namespace) {
            ns.remove(key);
        }
        Ok(())
    }
}

impl Drop for MemorySession<'_> {
    fn drop(&mut self) {
        self.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_round_trip() {
        let store = MemoryStore::new();
        {
            let mut session = store.open("Test").unwrap();
            session.put_string("Name", "knoblomat").unwrap();
            session.put_bool("Flag", true).unwrap();
            session.put_int("Count", -7).unwrap();
        }

        let session = store.open("Test").unwrap();
        assert_eq!(session.get_string("Name").unwrap().as_deref(), Some("knoblomat"));
        assert_eq!(session.get_bool("Flag").unwrap(), Some(true));
        assert_eq!(session.get_int("Count").unwrap(), Some(-7));
    }

    #[test]
    fn test_absent_keys_use_defaults() {
        let store = MemoryStore::new();
        let session = store.open("Test").unwrap();

        assert_eq!(session.get_string("Missing").unwrap(), None);
        assert_eq!(session.string_or("Missing", "fallback").unwrap(), "fallback");
        assert!(session.bool_or("Missing", true).unwrap());
        assert_eq!(session.int_or("Missing", 42).unwrap(), 42);
    }

    #[test]
    fn test_type_mismatch_reads_as_absent() {
        let store = MemoryStore::new();
        let mut session = store.open("Test").unwrap();
        session.put_int("Value", 1).unwrap();

        assert_eq!(session.get_string("Value").unwrap(), None);
        assert_eq!(session.get_bool("Value").unwrap(), None);
        assert_eq!(session.int_or("Value", 0).unwrap(), 1);
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let store = MemoryStore::new();
        store.open("A").unwrap().put_string("SSID", "one").unwrap();
        store.open("B").unwrap().put_string("SSID", "two").unwrap();

        assert_eq!(store.open("A").unwrap().get_string("SSID").unwrap().as_deref(), Some("one"));
        assert_eq!(store.open("B").unwrap().get_string("SSID").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new();
        {
            let mut session = store.open("Test").unwrap();
            session.put_bool("Flag", false).unwrap();
            session.remove("Flag").unwrap();
            session.remove("NeverStored").unwrap();
        }

        assert!(!store.contains("Test", "Flag"));
        assert!(store.keys("Test").is_empty());
    }

    #[test]
    fn test_sessions_close_on_drop() {
        let store = MemoryStore::new();
        {
            let _session = store.open("Test").unwrap();
            assert_eq!(store.open_sessions(), 1);
        }
        assert_eq!(store.open_sessions(), 0);
    }

    #[test]
    fn test_stored_value_json_shape() {
        let mut ns = HashMap::new();
        ns.insert("DHCP".to_string(), StoredValue::Bool(true));
        ns.insert("Wins".to_string(), StoredValue::Int(3));
        ns.insert("SSID".to_string(), StoredValue::String("net".to_string()));

        let json = serde_json::to_value(&ns).unwrap();
        assert_eq!(json, serde_json::json!({"DHCP": true, "Wins": 3, "SSID": "net"}));

        let back: HashMap<String, StoredValue> = serde_json::from_value(json).unwrap();
        assert_eq!(back, ns);
    }
}
