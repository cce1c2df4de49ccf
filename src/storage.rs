//! Persisted key/value storage
//!
//! The game only persists one value (the selected difficulty), but the store
//! itself is a plain string map so hosts can back it with whatever they have:
//! a JSON file on native, LocalStorage in the browser, or memory in tests.
//! Storage failures are logged and swallowed; they never stop a session.

use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

use crate::settings::{DIFFICULTY_KEY, Difficulty};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Read the persisted difficulty, falling back to the default
pub fn load_difficulty(store: &impl KeyValueStore) -> Difficulty {
    match store.get(DIFFICULTY_KEY) {
        None => Difficulty::default(),
        Some(raw) => Difficulty::parse(&raw).unwrap_or_else(|| {
            log::warn!("Ignoring unrecognised stored difficulty {:?}", raw);
            Difficulty::default()
        }),
    }
}

pub fn save_difficulty(store: &mut impl KeyValueStore, difficulty: Difficulty) {
    store.set(DIFFICULTY_KEY, difficulty.as_str());
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Whole map persisted as one JSON object, written through on every `set`
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    /// Open a store; a missing or corrupt file starts out empty
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries: HashMap<String, String> = match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(entries) => {
                    log::info!("Loaded settings from {}", path.display());
                    entries
                }
                Err(e) => {
                    log::warn!("Corrupt settings file {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings file at {}, using defaults", path.display());
                HashMap::new()
            }
            Err(e) => {
                log::warn!("Failed to read settings file {}: {}", path.display(), e);
                HashMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) {
        let json = match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to encode settings: {}", e);
                return;
            }
        };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(dir) {
                log::warn!("Failed to create {}: {}", dir.display(), e);
                return;
            }
        }
        match std::fs::write(&self.path, json) {
            Ok(()) => log::debug!("Settings saved to {}", self.path.display()),
            Err(e) => log::warn!("Failed to write {}: {}", self.path.display(), e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush();
    }
}

/// Browser LocalStorage, constructed by the page's adapter when it creates
/// its [`Session`](crate::Session)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    log::warn!("LocalStorage rejected write of {}", key);
                }
            }
            None => log::warn!("LocalStorage unavailable, {} not saved", key),
        }
    }
}
