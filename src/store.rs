use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const APP_DIR: &str = "league_almanac";
const STORE_FILE: &str = "stats_cache.json";
const STORE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store contents unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned,
}

/// Durable string key-value storage. Implementations use interior
/// mutability so one store can back several callers.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
    fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys()
    }
}

impl<T: KvStore + ?Sized> KvStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
    fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let guard = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut guard = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut guard = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        guard.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let guard = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.keys().cloned().collect())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StoreFile {
    version: u32,
    entries: BTreeMap<String, String>,
}

impl StoreFile {
    fn empty() -> Self {
        Self {
            version: STORE_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// Single JSON file holding every key. Loaded lazily on first use and
/// rewritten through a temp file on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: Mutex<Option<StoreFile>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn with_file<R>(
        &self,
        f: impl FnOnce(&mut StoreFile) -> R,
        persist: bool,
    ) -> Result<R, StoreError> {
        let mut guard = self.state.lock().map_err(|_| StoreError::Poisoned)?;
        if guard.is_none() {
            *guard = Some(load_store_file(&self.path)?);
        }
        let Some(file) = guard.as_mut() else {
            return Err(StoreError::Poisoned);
        };
        let out = f(file);
        if persist {
            save_store_file(&self.path, file)?;
        }
        Ok(out)
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with_file(|file| file.entries.get(key).cloned(), false)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.with_file(
            |file| {
                file.entries.insert(key.to_string(), value.to_string());
            },
            true,
        )
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.with_file(
            |file| {
                file.entries.remove(key);
            },
            true,
        )
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.with_file(|file| file.entries.keys().cloned().collect(), false)
    }
}

fn load_store_file(path: &Path) -> Result<StoreFile, StoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(StoreFile::empty()),
        Err(err) => return Err(err.into()),
    };
    let file = match serde_json::from_str::<StoreFile>(&raw) {
        Ok(file) => file,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "store file unreadable; starting empty");
            return Ok(StoreFile::empty());
        }
    };
    if file.version != STORE_VERSION {
        debug!(
            path = %path.display(),
            version = file.version,
            "store file version changed; starting empty"
        );
        return Ok(StoreFile::empty());
    }
    Ok(file)
}

fn save_store_file(path: &Path, file: &StoreFile) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(file)?;
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn app_cache_dir() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(APP_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(APP_DIR))
}

pub fn default_store_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(STORE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_file_loads_as_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        fs::write(&path, "{ not json").unwrap();

        let file = load_store_file(&path).unwrap();
        assert_eq!(file.version, STORE_VERSION);
        assert!(file.entries.is_empty());
    }

    #[test]
    fn corrupt_file_is_replaced_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        fs::write(&path, "garbage").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(FileStore::new(&path).get("k").unwrap().as_deref(), Some("v"));
    }
}
