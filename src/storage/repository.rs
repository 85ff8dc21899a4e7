use super::{FileStore, KeyValueStore, MemoryStore};
use crate::config::{StorageConfig, StorageKeys};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Typed JSON access to a [`KeyValueStore`].
///
/// Reads never fail: a missing key, an unavailable backend or a blob that is
/// not valid JSON all read as empty. Writes report success as a `bool`.
pub struct Repository {
    store: Box<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl Repository {
    pub fn new(store: Box<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    /// In-memory repository with the default keys
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()), StorageKeys::default())
    }

    /// Build the backend described by the storage section of the config
    pub fn from_config(config: &StorageConfig) -> Self {
        let store: Box<dyn KeyValueStore> = match (&config.path, config.quota_bytes) {
            (Some(path), Some(quota)) => Box::new(FileStore::open(path).with_quota(quota)),
            (Some(path), None) => Box::new(FileStore::open(path)),
            (None, Some(quota)) => Box::new(MemoryStore::with_quota(quota)),
            (None, None) => Box::new(MemoryStore::new()),
        };
        debug!("Using {} storage backend", store.backend_name());
        Self::new(store, config.keys.clone())
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    fn load_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Reading '{}' failed: {}", key, e);
                None
            }
        }
    }

    fn load_value(&self, key: &str) -> Option<serde_json::Value> {
        let raw = self.load_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding corrupt value under '{}': {}", key, e);
                None
            }
        }
    }

    /// Load a JSON array, dropping elements that do not match `T`
    pub fn load_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.load_list_opt(key).unwrap_or_default()
    }

    /// Like [`Repository::load_list`], but `None` when nothing usable is
    /// stored under `key`, so a stored empty list stays distinguishable
    pub fn load_list_opt<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        match self.load_value(key)? {
            serde_json::Value::Array(items) => Some(decode_lenient(key, items)),
            _ => {
                warn!("Expected a list under '{}', treating as empty", key);
                None
            }
        }
    }

    /// Load a JSON object, dropping entries whose value does not match `V`
    pub fn load_map<V: DeserializeOwned>(&self, key: &str) -> HashMap<String, V> {
        match self.load_value(key) {
            Some(serde_json::Value::Object(entries)) => entries
                .into_iter()
                .filter_map(|(k, v)| match serde_json::from_value(v) {
                    Ok(value) => Some((k, value)),
                    Err(e) => {
                        warn!("Dropping malformed entry '{}' under '{}': {}", k, key, e);
                        None
                    }
                })
                .collect(),
            Some(_) => {
                warn!("Expected an object under '{}', treating as empty", key);
                HashMap::new()
            }
            None => HashMap::new(),
        }
    }

    /// Serialize and store `value`. Returns `false` when the write failed.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("Could not encode value for '{}': {}", key, e);
                return false;
            }
        };
        match self.store.set(key, json) {
            Ok(()) => true,
            Err(e) => {
                warn!("Writing '{}' failed: {}", key, e);
                false
            }
        }
    }

    pub fn remove(&self, key: &str) -> bool {
        match self.store.remove(key) {
            Ok(()) => true,
            Err(e) => {
                warn!("Removing '{}' failed: {}", key, e);
                false
            }
        }
    }
}

/// Decode each array element on its own so one bad record does not take the
/// rest of the list with it
pub fn decode_lenient<T: DeserializeOwned>(context: &str, items: Vec<serde_json::Value>) -> Vec<T> {
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if decoded.len() < total {
        warn!(
            "Dropped {} malformed record(s) from '{}'",
            total - decoded.len(),
            context
        );
    }
    decoded
}
