//! Client-persisted state that survives restarts
//!
//! A [`LocalStore`] maps string keys to raw JSON text. [`FileStore`] keeps one
//! `<key>.json` file per key under a directory:
//!
//! ```text
//! <storage_dir>/
//! ├── cinevisor-user-info.json   # UserInfo snapshot
//! └── cinevisor-auth-token.json  # auth session
//! ```

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Key the UserInfo snapshot is stored under
pub const USER_INFO_KEY: &str = "cinevisor-user-info";

/// Raw key/value storage
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Read and deserialize the value under `key`
pub fn get_item<T: DeserializeOwned>(store: &dyn LocalStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Serialize `value` and store it under `key`
pub fn set_item<T: Serialize + ?Sized>(store: &dyn LocalStore, key: &str, value: &T) -> Result<()> {
    let text = serde_json::to_string(value)?;
    store.set(key, &text)
}

pub fn remove_item(store: &dyn LocalStore, key: &str) -> Result<()> {
    store.remove(key)
}

/// Filesystem-backed LocalStore
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(Error::general(format!("invalid storage key: {}", key)));
        }
        Ok(self.base.join(format!("{}.json", key)))
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path(key)?) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key)?;
        std::fs::create_dir_all(&self.base)?;

        // Write then rename, so a crash never leaves half a file behind
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        debug!("stored {}", key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory LocalStore
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| Error::general("memory store lock poisoned"))
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.items()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let store = FileStore::new(dir.path());
        set_item(&store, USER_INFO_KEY, &json!({ "id": "u1" })).unwrap();

        let reopened = FileStore::new(dir.path());
        let value: Option<serde_json::Value> = get_item(&reopened, USER_INFO_KEY).unwrap();
        assert_eq!(value, Some(json!({ "id": "u1" })));

        remove_item(&reopened, USER_INFO_KEY).unwrap();
        assert!(reopened.get(USER_INFO_KEY).unwrap().is_none());
        // Removing twice is fine
        remove_item(&reopened, USER_INFO_KEY).unwrap();
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.set("../escape", "{}").is_err());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.get("k").unwrap().is_none());
        store.set("k", "1").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("1"));
    }
}
