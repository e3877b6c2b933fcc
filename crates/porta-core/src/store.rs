//! Persistence adapter used by identity backends to remember a session.
//!
//! The application never reads or writes these values directly. Backends
//! store opaque strings under their own keys.
//!
//! `FileStore` keeps a flat JSON map in `<base>/session.json` with restricted
//! permissions (0600). Values are never logged.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};

use crate::config::paths;

/// Session store filename.
const SESSION_STORE_FILE: &str = "session.json";

/// String key/value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// JSON-file backed store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store at the default location under `PORTA_HOME`.
    pub fn default_location() -> Self {
        Self::new(paths::porta_home().join(SESSION_STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents, or `None` when the file is missing or blank.
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session store {}", self.path.display()))?;
        Ok(Some(contents).filter(|c| !c.trim().is_empty()))
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        let Some(contents) = self.read()? else {
            return Ok(HashMap::new());
        };
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session store {}", self.path.display()))
    }

    /// Like `load`, but an unparseable file counts as empty so the next write
    /// replaces it.
    fn load_for_update(&self) -> Result<HashMap<String, String>> {
        let Some(contents) = self.read()? else {
            return Ok(HashMap::new());
        };
        match serde_json::from_str(&contents) {
            Ok(entries) => Ok(entries),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "discarding corrupt session store"
                );
                Ok(HashMap::new())
            }
        }
    }

    /// Writes a temp file next to the store and renames it into place.
    fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(entries).context("Failed to serialize session store")?;

        let tmp_path = self.path.with_extension("json.tmp");
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(&tmp_path)
            .with_context(|| format!("Failed to open {} for writing", tmp_path.display()))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write to {}", tmp_path.display()))?;
        file.sync_all()
            .with_context(|| format!("Failed to flush {}", tmp_path.display()))?;
        drop(file);

        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                self.path.display()
            )
        })
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        // A poisoned lock only means another writer panicked; the file is
        // re-read on every call.
        self.lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.guard();
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.guard();
        let mut entries = self.load_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.guard();
        let mut entries = self.load_for_update()?;
        let removed = entries.remove(key).is_some();
        if entries.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path)
                    .with_context(|| format!("Failed to remove {}", self.path.display()))?;
            }
            return Ok(());
        }
        if !removed {
            return Ok(());
        }
        self.save(&entries)
    }
}

/// Volatile store; sessions are forgotten when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_file_store_roundtrip_and_remove() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("session.json"));

        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v1").unwrap();
        store.set("other", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v1"));

        // A second handle on the same file sees the same data.
        let reopened = FileStore::new(store.path());
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("v2"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        assert!(store.path().exists());

        store.remove("other").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_remove_missing_key_is_ok() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));
        store.remove("missing").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let err = FileStore::new(&path).get("k").unwrap_err();
        assert!(err.to_string().contains("Failed to parse session store"));
    }

    #[test]
    fn test_file_store_replaces_corrupt_file_on_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{\"authUser:k:[DEFAULT]\": \"{\\\"uid").unwrap();
        let store = FileStore::new(&path);

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert!(!dir.path().join("session.json.tmp").exists());

        fs::write(&path, "not json").unwrap();
        store.remove("k").unwrap();
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));
        store.set("k", "v").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
