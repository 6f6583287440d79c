use std::fs;
use std::sync::Once;

use pretty_assertions::assert_eq;
use tempfile::tempdir;
use thread_jump_engine::{
    load_settings, save_settings, ExtensionStorage, FallbackStore, MemoryStore, OriginLocalStore,
    PanelSettings, SettingValues, SettingsError, SettingsStore, PANEL_HEIGHT_KEY, PANEL_WIDTH_KEY,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(overlay_logging::initialize_for_tests);
}

/// Store that fails every call.
struct BrokenStore;

impl SettingsStore for BrokenStore {
    fn get(&self, _keys: &[&str]) -> Result<SettingValues, SettingsError> {
        Err(SettingsError::Unavailable("storage is gone".to_string()))
    }

    fn set(&mut self, _values: &SettingValues) -> Result<(), SettingsError> {
        Err(SettingsError::Unavailable("storage is gone".to_string()))
    }
}

/// Reads succeed with nothing stored; writes are refused.
struct ReadOnlyStore;

impl SettingsStore for ReadOnlyStore {
    fn get(&self, _keys: &[&str]) -> Result<SettingValues, SettingsError> {
        Ok(SettingValues::new())
    }

    fn set(&mut self, _values: &SettingValues) -> Result<(), SettingsError> {
        Err(SettingsError::Unavailable("read-only".to_string()))
    }
}

fn values(pairs: &[(&str, i64)]) -> SettingValues {
    pairs.iter().map(|(key, value)| (key.to_string(), *value)).collect()
}

#[test]
fn failing_store_yields_defaults() {
    init_logging();
    assert_eq!(
        load_settings(&BrokenStore),
        PanelSettings {
            panel_width: 400,
            panel_height: 500
        }
    );
    // Writes are swallowed too.
    save_settings(&mut BrokenStore, PanelSettings::default());
}

#[test]
fn missing_and_invalid_values_fall_back_per_key() {
    init_logging();
    let mut store = MemoryStore::new();
    store
        .set(&values(&[(PANEL_WIDTH_KEY, 720), (PANEL_HEIGHT_KEY, -5)]))
        .unwrap();
    assert_eq!(
        load_settings(&store),
        PanelSettings {
            panel_width: 720,
            panel_height: 500
        }
    );

    assert_eq!(load_settings(&MemoryStore::new()), PanelSettings::default());
}

#[test]
fn extension_storage_round_trips_and_keeps_other_keys() {
    init_logging();
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");
    fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

    let mut store = ExtensionStorage::new(&path);
    let saved = PanelSettings {
        panel_width: 512,
        panel_height: 384,
    };
    save_settings(&mut store, saved);

    assert_eq!(load_settings(&ExtensionStorage::new(&path)), saved);
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["theme"], "dark");
    assert_eq!(raw[PANEL_WIDTH_KEY], 512);
}

#[test]
fn missing_extension_file_reads_as_empty() {
    let dir = tempdir().unwrap();
    let store = ExtensionStorage::new(dir.path().join("absent.json"));
    assert_eq!(store.get(&[PANEL_WIDTH_KEY]).unwrap(), SettingValues::new());
}

#[test]
fn corrupt_extension_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");
    fs::write(&path, "[1, 2").unwrap();
    assert!(matches!(
        ExtensionStorage::new(&path).get(&[PANEL_WIDTH_KEY]),
        Err(SettingsError::Malformed(_))
    ));
}

#[test]
fn origin_store_is_shared_by_pages_of_one_origin() {
    init_logging();
    let dir = tempdir().unwrap();
    let mut first = OriginLocalStore::for_origin(dir.path(), "https://chat.example.com/c/1");
    save_settings(
        &mut first,
        PanelSettings {
            panel_width: 333,
            panel_height: 444,
        },
    );

    let same = OriginLocalStore::for_origin(dir.path(), "https://chat.example.com/c/2");
    let other = OriginLocalStore::for_origin(dir.path(), "https://other.example.com/c/1");
    assert_eq!(same.path(), first.path());
    assert_eq!(load_settings(&same).panel_width, 333);
    assert_eq!(load_settings(&other), PanelSettings::default());
}

#[test]
fn fallback_uses_local_store_when_primary_fails() {
    init_logging();
    let mut store = FallbackStore::new(BrokenStore, MemoryStore::new());
    let saved = PanelSettings {
        panel_width: 640,
        panel_height: 360,
    };
    save_settings(&mut store, saved);
    assert_eq!(load_settings(&store), saved);
}

#[test]
fn fallback_prefers_working_primary() {
    let mut primary = MemoryStore::new();
    primary.set(&values(&[(PANEL_WIDTH_KEY, 900)])).unwrap();
    let mut local = MemoryStore::new();
    local.set(&values(&[(PANEL_WIDTH_KEY, 300)])).unwrap();

    let store = FallbackStore::new(primary, local);
    assert_eq!(load_settings(&store).panel_width, 900);
}

#[test]
fn fallback_reads_back_what_a_read_only_primary_refused() {
    init_logging();
    let mut store = FallbackStore::new(ReadOnlyStore, MemoryStore::new());
    let saved = PanelSettings {
        panel_width: 620,
        panel_height: 410,
    };
    save_settings(&mut store, saved);
    assert_eq!(load_settings(&store), saved);
}

#[test]
fn fallback_fills_only_keys_the_primary_lacks() {
    let mut primary = MemoryStore::new();
    primary.set(&values(&[(PANEL_WIDTH_KEY, 900)])).unwrap();
    let mut local = MemoryStore::new();
    local
        .set(&values(&[(PANEL_WIDTH_KEY, 300), (PANEL_HEIGHT_KEY, 250)]))
        .unwrap();

    let store = FallbackStore::new(primary, local);
    assert_eq!(
        load_settings(&store),
        PanelSettings {
            panel_width: 900,
            panel_height: 250
        }
    );
}

#[test]
fn origin_store_creates_its_directory_and_leaves_one_file() {
    init_logging();
    let dir = tempdir().unwrap();
    let nested = dir.path().join("profile").join("thread_jump");
    let mut store = OriginLocalStore::for_origin(&nested, "https://chat.example.com/c/1");

    save_settings(
        &mut store,
        PanelSettings {
            panel_width: 500,
            panel_height: 600,
        },
    );
    save_settings(
        &mut store,
        PanelSettings {
            panel_width: 510,
            panel_height: 610,
        },
    );

    assert_eq!(load_settings(&store).panel_width, 510);
    assert_eq!(fs::read_dir(&nested).unwrap().count(), 1);
    assert!(store.path().is_file());
}

#[test]
fn settings_directory_that_is_a_file_is_rejected() {
    init_logging();
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "x").unwrap();

    let mut store = OriginLocalStore::for_origin(&blocker, "https://chat.example.com/c/1");
    let err = store.set(&values(&[(PANEL_WIDTH_KEY, 480)])).unwrap_err();
    assert!(matches!(err, SettingsError::StoreDir { dir: rejected, .. } if rejected == blocker));
}
