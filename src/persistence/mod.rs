//! Key-value storage for scalar scores
//!
//! Backends:
//! - `MemoryStore`: in-process map (tests, headless runs)
//! - `JsonFileStore`: JSON object on disk (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)

use std::collections::HashMap;

use crate::error::GameError;

/// A store of non-negative integers keyed by name
pub trait ScoreStore {
    fn get(&self, key: &str) -> Option<u64>;
    fn set(&mut self, key: &str, value: u64) -> Result<(), GameError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Option<u64> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: u64) -> Result<(), GameError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Values kept in a JSON object file, rewritten on every `set`
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
    values: HashMap<String, u64>,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    /// Open the store, starting empty if the file is missing or unreadable
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("Ignoring malformed score file {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, values }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn flush(&self) -> Result<(), GameError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(&self.values)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<u64> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: u64) -> Result<(), GameError> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}

/// Browser LocalStorage; values are stored as decimal strings
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
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
impl ScoreStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<u64> {
        let storage = Self::storage()?;
        let raw = storage.get_item(key).ok().flatten()?;
        raw.trim().parse().ok()
    }

    fn set(&mut self, key: &str, value: u64) -> Result<(), GameError> {
        let storage = Self::storage().ok_or_else(|| {
            GameError::Io(std::io::Error::other("LocalStorage unavailable"))
        })?;
        storage
            .set_item(key, &value.to_string())
            .map_err(|_| GameError::Io(std::io::Error::other("LocalStorage write failed")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("best"), None);
        store.set("best", 42).unwrap();
        assert_eq!(store.get("best"), Some(42));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_json_file_store_persists() {
        let dir = std::env::temp_dir().join(format!("phrase-rally-store-{}", std::process::id()));
        let path = dir.join("scores.json");
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path);
        assert_eq!(store.get("best"), None);
        store.set("best", 1234).unwrap();

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("best"), Some(1234));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_json_file_store_ignores_garbage() {
        let dir = std::env::temp_dir().join(format!("phrase-rally-garbage-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scores.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("best"), None);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
