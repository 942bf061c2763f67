//! File-backed key-value store.
//!
//! Each namespace is a flat JSON object in `<dir>/<namespace>.json`:
//!
//! ```json
//! { "DHCP": true, "SSID": "HomeNet", "Wins": 3 }
//! ```
//!
//! Every write rewrites the namespace file, so a failing write is reported
//! by the call that caused it. The new contents go to `<namespace>.json.tmp`
//! first and are renamed over the old file, so an interrupted write leaves
//! the previous contents in place.

use knoblomat_core::store::StoredValue;
use knoblomat_core::{KeyValueStore, Session, StoreError};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key-value store keeping one JSON file per namespace.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn namespace_path(&self, namespace: &str) -> Result<PathBuf, StoreError> {
        let valid = !namespace.is_empty()
            && namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::Unavailable(format!(
                "invalid namespace name: {:?}",
                namespace
            )));
        }
        Ok(self.dir.join(format!("{}.json", namespace)))
    }
}

impl KeyValueStore for FileStore {
    type Session<'a> = FileSession;

    fn open(&self, namespace: &str) -> Result<FileSession, StoreError> {
        let path = self.namespace_path(namespace)?;
        fs::create_dir_all(&self.dir).map_err(|e| {
            StoreError::Unavailable(format!("{}: {}", self.dir.display(), e))
        })?;

        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| StoreError::Backend(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::Unavailable(format!("{}: {}", path.display(), e))),
        };

        tracing::trace!("Opened namespace file {}", path.display());
        Ok(FileSession { path, entries })
    }
}

/// Session on one namespace file.
#[derive(Debug)]
pub struct FileSession {
    path: PathBuf,
    entries: BTreeMap<String, StoredValue>,
}

impl FileSession {
    fn persist(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| StoreError::Backend(format!("{}: {}", self.path.display(), e)))
    }

    fn put(&mut self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        self.persist()
    }
}

impl Session for FileSession {
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .entries
            .get(key)
            .and_then(StoredValue::as_str)
            .map(String::from))
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, StoreError> {
        Ok(self.entries.get(key).and_then(StoredValue::as_bool))
    }

    fn get_int(&self, key: &str) -> Result<Option<i32>, StoreError> {
        Ok(self.entries.get(key).and_then(StoredValue::as_int))
    }

    fn put_string(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.put(key, StoredValue::String(value.to_string()))
    }

    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.put(key, StoredValue::Bool(value))
    }

    fn put_int(&mut self, key: &str, value: i32) -> Result<(), StoreError> {
        self.put(key, StoredValue::Int(value))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}
