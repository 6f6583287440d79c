//! Key-value settings storage for the panel size.
//!
//! Reads and writes are best-effort: any failure is logged and the built-in defaults
//! (400×500) stand in for whatever could not be read.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use overlay_logging::{overlay_debug, overlay_warn};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::origin_store_filename;

pub const PANEL_WIDTH_KEY: &str = "panel_width";
pub const PANEL_HEIGHT_KEY: &str = "panel_height";
const DEFAULT_WIDTH: u32 = 400;
const DEFAULT_HEIGHT: u32 = 500;

pub type SettingValues = BTreeMap<String, i64>;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings store unavailable: {0}")]
    Unavailable(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed settings data: {0}")]
    Malformed(String),
    #[error("settings directory {} is not usable: {reason}", .dir.display())]
    StoreDir { dir: PathBuf, reason: String },
}

/// Generic key-value collaborator. Missing keys are simply absent from the result.
pub trait SettingsStore {
    fn get(&self, keys: &[&str]) -> Result<SettingValues, SettingsError>;
    fn set(&mut self, values: &SettingValues) -> Result<(), SettingsError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSettings {
    pub panel_width: u32,
    pub panel_height: u32,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            panel_width: DEFAULT_WIDTH,
            panel_height: DEFAULT_HEIGHT,
        }
    }
}

/// Loads the stored panel size. Never fails: unreadable or invalid values become defaults.
pub fn load_settings(store: &dyn SettingsStore) -> PanelSettings {
    let values = match store.get(&[PANEL_WIDTH_KEY, PANEL_HEIGHT_KEY]) {
        Ok(values) => values,
        Err(err) => {
            overlay_warn!("Failed to read panel settings, using defaults: {}", err);
            return PanelSettings::default();
        }
    };
    let settings = PanelSettings {
        panel_width: dimension(&values, PANEL_WIDTH_KEY, DEFAULT_WIDTH),
        panel_height: dimension(&values, PANEL_HEIGHT_KEY, DEFAULT_HEIGHT),
    };
    overlay_debug!("Loaded panel settings {:?}", settings);
    settings
}

/// Stores the panel size. Failures are logged and swallowed.
pub fn save_settings(store: &mut dyn SettingsStore, settings: PanelSettings) {
    let values = SettingValues::from([
        (PANEL_WIDTH_KEY.to_string(), i64::from(settings.panel_width)),
        (PANEL_HEIGHT_KEY.to_string(), i64::from(settings.panel_height)),
    ]);
    if let Err(err) = store.set(&values) {
        overlay_warn!("Failed to store panel settings {:?}: {}", settings, err);
    }
}

fn dimension(values: &SettingValues, key: &str, default: u32) -> u32 {
    match values.get(key) {
        None => default,
        Some(&value) => match u32::try_from(value) {
            Ok(px) if px > 0 => px,
            _ => {
                overlay_warn!("Ignoring stored {} = {}", key, value);
                default
            }
        },
    }
}

fn pick(values: SettingValues, keys: &[&str]) -> SettingValues {
    values
        .into_iter()
        .filter(|(key, _)| keys.contains(&key.as_str()))
        .collect()
}

/// In-process store; also the fallback when nothing else is available.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: SettingValues,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, keys: &[&str]) -> Result<SettingValues, SettingsError> {
        Ok(pick(self.values.clone(), keys))
    }

    fn set(&mut self, values: &SettingValues) -> Result<(), SettingsError> {
        self.values
            .extend(values.iter().map(|(key, value)| (key.clone(), *value)));
        Ok(())
    }
}

/// Platform extension storage: one JSON object file shared by all origins.
#[derive(Debug, Clone)]
pub struct ExtensionStorage {
    path: PathBuf,
}

impl ExtensionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_object(&self) -> Result<Map<String, Value>, SettingsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(object)) => Ok(object),
            Ok(_) => Err(SettingsError::Malformed(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
            Err(err) => Err(SettingsError::Malformed(err.to_string())),
        }
    }
}

impl SettingsStore for ExtensionStorage {
    fn get(&self, keys: &[&str]) -> Result<SettingValues, SettingsError> {
        let object = self.read_object()?;
        Ok(keys
            .iter()
            .filter_map(|key| {
                object
                    .get(*key)
                    .and_then(Value::as_i64)
                    .map(|value| (key.to_string(), value))
            })
            .collect())
    }

    fn set(&mut self, values: &SettingValues) -> Result<(), SettingsError> {
        let mut object = self.read_object()?;
        for (key, value) in values {
            object.insert(key.clone(), Value::from(*value));
        }
        let content = serde_json::to_string_pretty(&Value::Object(object))
            .map_err(|err| SettingsError::Malformed(err.to_string()))?;
        let (dir, filename) = split_path(&self.path)?;
        write_store_file(&dir, &filename, &content)?;
        Ok(())
    }
}

/// Per-origin local store: a RON map in a file named after the page origin.
#[derive(Debug, Clone)]
pub struct OriginLocalStore {
    dir: PathBuf,
    filename: String,
}

impl OriginLocalStore {
    pub fn for_origin(dir: impl Into<PathBuf>, page_url: &str) -> Self {
        Self {
            dir: dir.into(),
            filename: origin_store_filename(page_url),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }

    fn read_all(&self) -> Result<SettingValues, SettingsError> {
        let content = match fs::read_to_string(self.path()) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(SettingValues::new()),
            Err(err) => return Err(err.into()),
        };
        ron::from_str(&content).map_err(|err| SettingsError::Malformed(err.to_string()))
    }
}

impl SettingsStore for OriginLocalStore {
    fn get(&self, keys: &[&str]) -> Result<SettingValues, SettingsError> {
        Ok(pick(self.read_all()?, keys))
    }

    fn set(&mut self, values: &SettingValues) -> Result<(), SettingsError> {
        let mut all = self.read_all().unwrap_or_else(|err| {
            overlay_warn!("Replacing unreadable store {:?}: {}", self.path(), err);
            SettingValues::new()
        });
        all.extend(values.iter().map(|(key, value)| (key.clone(), *value)));
        let content = ron::ser::to_string_pretty(&all, ron::ser::PrettyConfig::new())
            .map_err(|err| SettingsError::Malformed(err.to_string()))?;
        write_store_file(&self.dir, &self.filename, &content)?;
        Ok(())
    }
}

/// Tries the platform store first and falls back to the local one when it fails.
/// Reads fill keys the platform store lacks from the local store.
#[derive(Debug, Clone)]
pub struct FallbackStore<P, L> {
    primary: P,
    local: L,
}

impl<P: SettingsStore, L: SettingsStore> FallbackStore<P, L> {
    pub fn new(primary: P, local: L) -> Self {
        Self { primary, local }
    }
}

impl<P: SettingsStore, L: SettingsStore> SettingsStore for FallbackStore<P, L> {
    fn get(&self, keys: &[&str]) -> Result<SettingValues, SettingsError> {
        let mut values = match self.primary.get(keys) {
            Ok(values) => values,
            Err(err) => {
                overlay_debug!("Primary settings store failed on read ({}), using local", err);
                return self.local.get(keys);
            }
        };
        // Writes the primary refused landed in the local store.
        let missing: Vec<&str> = keys
            .iter()
            .copied()
            .filter(|key| !values.contains_key(*key))
            .collect();
        if missing.is_empty() {
            return Ok(values);
        }
        match self.local.get(&missing) {
            Ok(local) => values.extend(local),
            Err(err) => overlay_debug!("Local settings store failed on read: {}", err),
        }
        Ok(values)
    }

    fn set(&mut self, values: &SettingValues) -> Result<(), SettingsError> {
        match self.primary.set(values) {
            Ok(()) => Ok(()),
            Err(err) => {
                overlay_debug!("Primary settings store failed on write ({}), using local", err);
                self.local.set(values)
            }
        }
    }
}

fn split_path(path: &Path) -> Result<(PathBuf, String), SettingsError> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            SettingsError::Unavailable(format!("{} has no file name", path.display()))
        })?;
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((dir, filename.to_string()))
}

/// Replaces `{dir}/{filename}` through a temp file and a rename, so a reader never sees a
/// half-written settings file. Creates `dir` when missing.
fn write_store_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf, SettingsError> {
    let unusable = |reason: String| SettingsError::StoreDir {
        dir: dir.to_path_buf(),
        reason,
    };
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => return Err(unusable("not a directory".to_string())),
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|err| unusable(err.to_string()))?;
        }
        Err(err) => return Err(unusable(err.to_string())),
    }

    let target = dir.join(filename);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(&target).map_err(|err| err.error)?;
    overlay_debug!("Wrote settings file {:?}", target);
    Ok(target)
}
