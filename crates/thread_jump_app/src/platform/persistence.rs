//! Panel geometry persistence on top of the engine's settings stores.

use std::path::Path;

use overlay_logging::overlay_info;
use thread_jump_core::PanelGeometry;
use thread_jump_engine::{
    load_settings, save_settings, ExtensionStorage, FallbackStore, OriginLocalStore,
    PanelSettings, SettingsStore,
};

const EXTENSION_STORAGE_FILENAME: &str = "extension_storage.json";
const LOCAL_STORE_DIR: &str = "local";

/// Extension storage in the profile, with the per-origin local store behind it.
pub(crate) fn open_settings_store(
    profile_dir: &Path,
    origin: &str,
) -> FallbackStore<ExtensionStorage, OriginLocalStore> {
    let primary = ExtensionStorage::new(profile_dir.join(EXTENSION_STORAGE_FILENAME));
    let local = OriginLocalStore::for_origin(profile_dir.join(LOCAL_STORE_DIR), origin);
    overlay_info!(
        "Settings: {:?}, falling back to {:?}",
        profile_dir.join(EXTENSION_STORAGE_FILENAME),
        local.path()
    );
    FallbackStore::new(primary, local)
}

pub(crate) fn load_geometry(store: &dyn SettingsStore) -> PanelGeometry {
    let settings = load_settings(store);
    PanelGeometry {
        width: settings.panel_width,
        height: settings.panel_height,
    }
}

pub(crate) fn save_geometry(store: &mut dyn SettingsStore, geometry: PanelGeometry) {
    save_settings(
        store,
        PanelSettings {
            panel_width: geometry.width,
            panel_height: geometry.height,
        },
    );
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;
    use thread_jump_core::PanelGeometry;

    use super::{load_geometry, open_settings_store, save_geometry};

    #[test]
    fn geometry_round_trips_through_the_profile() {
        let dir = tempdir().unwrap();
        let geometry = PanelGeometry {
            width: 610,
            height: 420,
        };
        {
            let mut store = open_settings_store(dir.path(), "https://chat.example.com");
            save_geometry(&mut store, geometry);
        }
        let store = open_settings_store(dir.path(), "https://chat.example.com");
        assert_eq!(load_geometry(&store), geometry);
        assert!(dir.path().join("extension_storage.json").exists());
    }

    #[test]
    fn unreadable_extension_storage_uses_the_origin_store() {
        let dir = tempdir().unwrap();
        // A directory where the JSON file should be makes every read and write fail.
        fs::create_dir_all(dir.path().join("extension_storage.json")).unwrap();
        let geometry = PanelGeometry {
            width: 350,
            height: 650,
        };

        let mut store = open_settings_store(dir.path(), "https://chat.example.com");
        save_geometry(&mut store, geometry);

        assert_eq!(load_geometry(&store), geometry);
        assert_eq!(fs::read_dir(dir.path().join("local")).unwrap().count(), 1);
    }

    #[test]
    fn fresh_profile_gives_default_geometry() {
        let dir = tempdir().unwrap();
        let store = open_settings_store(dir.path(), "https://chat.example.com");
        assert_eq!(load_geometry(&store), PanelGeometry::default());
    }
}
