//! # Key-Value Storage
//!
//! Persisted string entries backing the session.
//!
//! ## Backends
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       KeyValueStore (trait)                             │
//! │                                                                         │
//! │   ┌──────────────────────────┐      ┌────────────────────────────────┐  │
//! │   │ MemoryStore              │      │ FileStore                      │  │
//! │   │ HashMap behind a mutex   │      │ JSON object in one file        │  │
//! │   │ tests, ephemeral shells  │      │ {"token": "...", "user": "…"}  │  │
//! │   └──────────────────────────┘      └────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `FileStore` rewrites the whole file on every mutation, through a sibling
//! `.tmp` file renamed over the original. A missing file is an empty store.
//! A file that is not a JSON object of strings is reported as
//! [`StorageError::Corrupt`] by `get`, and discarded by `set` and `remove`,
//! which write a fresh file in its place.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, warn};

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage backend failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file does not hold a JSON object of strings.
    #[error("Corrupt storage file {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// Another thread panicked while holding the store lock.
    #[error("Storage lock poisoned")]
    Poisoned,
}

// =============================================================================
// KeyValueStore Trait
// =============================================================================

/// String key-value persistence.
pub trait KeyValueStore: Send + Sync {
    /// Returns the entry for `key`, or `None` when absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Inserts or replaces the entry for `key`.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes the entry for `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-process store; contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// FileStore
// =============================================================================

/// Store persisted as a JSON object in a single file.
///
/// The mutex serializes read-modify-write cycles within this process.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Opens a store at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<BTreeMap<String, String>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let contents = serde_json::to_string_pretty(entries).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        // readers see either the old file or the new one, never a prefix
        let staging = self.staging_path();
        std::fs::write(&staging, contents).map_err(io_err)?;
        std::fs::rename(&staging, &self.path).map_err(io_err)?;

        debug!(path = ?self.path, entries = entries.len(), "Storage file written");
        Ok(())
    }

    /// Entries to mutate. A corrupt file is discarded so the next write
    /// replaces it; the flag reports that a rewrite is due.
    fn load_for_write(&self) -> StorageResult<(BTreeMap<String, String>, bool)> {
        match self.load() {
            Ok(entries) => Ok((entries, false)),
            Err(StorageError::Corrupt { path, message }) => {
                warn!(?path, %message, "Discarding corrupt storage file");
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let (mut entries, _) = self.load_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let (mut entries, reset) = self.load_for_write()?;
        if entries.remove(key).is_some() || reset {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
