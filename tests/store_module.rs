use modconf::store::{load_store, save_store, ConfigStore, StoreError};
use serde_json::json;
use std::fs;

#[test]
fn store_module_missing_file_loads_empty_store() {
    let temp = tempfile::tempdir().expect("tempdir");
    let store = load_store(&temp.path().join("store.json")).expect("load store");
    assert_eq!(store, ConfigStore::new());
    assert!(!store.is_reset());
}

#[test]
fn store_module_saves_and_reloads_values() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("state/store.json");

    let mut store = ConfigStore::new();
    store.set_module_value("weather", "city", json!("Tashkent"));
    store.set_log_level("main", 10);
    save_store(&path, &store).expect("save store");

    let raw = fs::read_to_string(&path).expect("read store");
    assert!(raw.ends_with("}\n"));
    let loaded = load_store(&path).expect("reload store");
    assert_eq!(loaded, store);
    assert_eq!(loaded.module_value("weather", "city"), Some(&json!("Tashkent")));
    assert_eq!(loaded.log_level("main"), Some(10));
}

#[test]
fn store_module_reset_store_persists_as_null() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("store.json");

    let mut store = ConfigStore::new();
    store.set_log_level("main", 20);
    store.reset();
    save_store(&path, &store).expect("save store");

    assert_eq!(fs::read_to_string(&path).expect("read store"), "null\n");
    assert!(load_store(&path).expect("reload store").is_reset());
}

#[test]
fn store_module_rejects_malformed_files() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("store.json");

    fs::write(&path, "{not json").expect("write store");
    assert!(matches!(load_store(&path), Err(StoreError::Parse { .. })));

    fs::write(&path, "[1, 2]").expect("write store");
    assert!(matches!(load_store(&path), Err(StoreError::Shape { .. })));
}

#[test]
fn store_module_overwrites_non_object_sections_from_disk() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("store.json");
    fs::write(&path, r#"{"weather": {"__config__": [1, 2]}, "main": 7}"#).expect("write store");

    let mut store = load_store(&path).expect("load store");
    store.set_module_value("weather", "units", json!("metric"));
    store.set_log_level("main", 40);

    assert_eq!(
        store.as_value(),
        &json!({"weather": {"__config__": {"units": "metric"}}, "main": {"loglevel": 40}})
    );
}
