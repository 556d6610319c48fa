use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::shared::fs_atomic::atomic_write_file;

/// Sub-key under a module's entry that holds its operator-set values.
pub const MODULE_CONFIG_KEY: &str = "__config__";
pub const LOG_LEVEL_KEY: &str = "loglevel";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read store {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse store {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("store {path} must hold an object or null")]
    Shape { path: String },
    #[error("failed to encode store: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write store {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Nested mapping keyed by module storage id. A factory reset leaves it
/// `null`; any later write starts a fresh object.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigStore {
    root: Value,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    pub fn from_value(root: Value) -> Option<Self> {
        match root {
            Value::Object(_) | Value::Null => Some(Self { root }),
            _ => None,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    pub fn is_reset(&self) -> bool {
        self.root.is_null()
    }

    pub fn reset(&mut self) {
        self.root = Value::Null;
    }

    pub fn module_value(&self, storage_id: &str, key: &str) -> Option<&Value> {
        self.root
            .get(storage_id)?
            .get(MODULE_CONFIG_KEY)?
            .get(key)
    }

    pub fn module_config(&self, storage_id: &str) -> Option<&Map<String, Value>> {
        self.root
            .get(storage_id)?
            .get(MODULE_CONFIG_KEY)?
            .as_object()
    }

    pub fn set_module_value(&mut self, storage_id: &str, key: &str, value: Value) {
        let config = ensure_object(&mut self.root)
            .and_then(|root| object_entry(root, storage_id))
            .and_then(|entry| object_entry(entry, MODULE_CONFIG_KEY));
        if let Some(config) = config {
            config.insert(key.to_string(), value);
        }
    }

    pub fn log_level(&self, host_id: &str) -> Option<i64> {
        self.root.get(host_id)?.get(LOG_LEVEL_KEY)?.as_i64()
    }

    pub fn set_log_level(&mut self, host_id: &str, level: i64) {
        if let Some(entry) =
            ensure_object(&mut self.root).and_then(|root| object_entry(root, host_id))
        {
            entry.insert(LOG_LEVEL_KEY.to_string(), Value::from(level));
        }
    }
}

fn object_entry<'a>(
    map: &'a mut Map<String, Value>,
    key: &str,
) -> Option<&'a mut Map<String, Value>> {
    ensure_object(map.entry(key.to_string()).or_insert(Value::Null))
}

/// Replaces any non-object value with an empty object and borrows it. Always
/// `Some` once the replacement has happened.
fn ensure_object(value: &mut Value) -> Option<&mut Map<String, Value>> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    value.as_object_mut()
}

/// Missing files load as an empty store.
pub fn load_store(path: &Path) -> Result<ConfigStore, StoreError> {
    if !path.exists() {
        return Ok(ConfigStore::new());
    }
    let raw = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.display().to_string(),
        source,
    })?;
    if raw.trim().is_empty() {
        return Ok(ConfigStore::new());
    }
    let value: Value = serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    ConfigStore::from_value(value).ok_or_else(|| StoreError::Shape {
        path: path.display().to_string(),
    })
}

pub fn save_store(path: &Path, store: &ConfigStore) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.display().to_string(),
                source,
            })?;
        }
    }
    let mut body = serde_json::to_string_pretty(store.as_value()).map_err(StoreError::Encode)?;
    body.push('\n');
    atomic_write_file(path, body.as_bytes()).map_err(|source| StoreError::Write {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn module_values_create_intermediate_maps() {
        let mut store = ConfigStore::new();
        store.set_module_value("weather", "city", json!("Tashkent"));
        assert_eq!(
            store.as_value(),
            &json!({"weather": {"__config__": {"city": "Tashkent"}}})
        );
        assert_eq!(store.module_value("weather", "city"), Some(&json!("Tashkent")));
        assert_eq!(store.module_value("weather", "units"), None);
    }

    #[test]
    fn writes_after_reset_start_a_fresh_object() {
        let mut store = ConfigStore::from_value(json!({"main": {"loglevel": 20}})).expect("store");
        store.reset();
        assert!(store.is_reset());
        assert_eq!(store.log_level("main"), None);

        store.set_log_level("main", 10);
        assert_eq!(store.as_value(), &json!({"main": {"loglevel": 10}}));
    }

    #[test]
    fn non_object_entries_are_replaced() {
        let mut store = ConfigStore::from_value(json!({"weather": 5})).expect("store");
        store.set_module_value("weather", "city", json!(1));
        assert_eq!(store.module_config("weather"), json!({"city": 1}).as_object());
    }

    #[test]
    fn scalar_config_sections_and_host_entries_are_replaced() {
        let mut store =
            ConfigStore::from_value(json!({"weather": {"__config__": 3, "other": 1}, "main": "x"}))
                .expect("store");
        store.set_module_value("weather", "city", json!("Tashkent"));
        store.set_log_level("main", 30);
        assert_eq!(
            store.as_value(),
            &json!({
                "weather": {"__config__": {"city": "Tashkent"}, "other": 1},
                "main": {"loglevel": 30}
            })
        );
    }

    #[test]
    fn rejects_scalar_roots() {
        assert!(ConfigStore::from_value(json!([1])).is_none());
        assert!(ConfigStore::from_value(Value::Null).is_some());
    }
}
