//! NVS (Non-Volatile Storage) settings store for ESP32.
//!
//! Every session opens its own `EspNvs` handle on the namespace and closes it
//! when dropped. Values use the same NVS item types as the Arduino
//! Preferences library (strings, `u8` booleans, `i32` integers), so devices
//! flashed with earlier firmware keep their settings.

use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
use esp_idf_svc::sys::EspError;
use knoblomat_core::{KeyValueStore, Session, StoreError};

fn backend(key: &str, err: EspError) -> StoreError {
    StoreError::Backend(format!("{}: {}", key, err))
}

/// Key-value store on the default NVS partition.
#[derive(Clone)]
pub struct NvsStore {
    partition: EspDefaultNvsPartition,
}

impl NvsStore {
    pub fn new(partition: EspDefaultNvsPartition) -> Self {
        Self { partition }
    }

    /// Take the default NVS partition. Can only succeed once per boot.
    pub fn take() -> Result<Self, EspError> {
        Ok(Self::new(EspDefaultNvsPartition::take()?))
    }
}

impl KeyValueStore for NvsStore {
    type Session<'a> = NvsSession;

    fn open(&self, namespace: &str) -> Result<NvsSession, StoreError> {
        let nvs = EspNvs::new(self.partition.clone(), namespace, true)
            .map_err(|e| StoreError::Unavailable(format!("namespace {}: {}", namespace, e)))?;
        Ok(NvsSession { nvs })
    }
}

/// Open NVS namespace handle.
pub struct NvsSession {
    nvs: EspNvs<NvsDefault>,
}

impl Session for NvsSession {
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        // str_len counts the NUL terminator
        let Some(len) = self.nvs.str_len(key).map_err(|e| backend(key, e))? else {
            return Ok(None);
        };
        let mut buf = vec![0u8; len + 1];
        self.nvs
            .get_str(key, &mut buf)
            .map(|value| value.map(String::from))
            .map_err(|e| backend(key, e))
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, StoreError> {
        self.nvs
            .get_u8(key)
            .map(|value| value.map(|v| v != 0))
            .map_err(|e| backend(key, e))
    }

    fn get_int(&self, key: &str) -> Result<Option<i32>, StoreError> {
        self.nvs.get_i32(key).map_err(|e| backend(key, e))
    }

    fn put_string(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.nvs.set_str(key, value).map_err(|e| backend(key, e))
    }

    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.nvs.set_u8(key, u8::from(value)).map_err(|e| backend(key, e))
    }

    fn put_int(&mut self, key: &str, value: i32) -> Result<(), StoreError> {
        self.nvs.set_i32(key, value).map_err(|e| backend(key, e))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.nvs.remove(key).map(|_| ()).map_err(|e| backend(key, e))
    }
}
