// JobBoard - platform/storage.rs
//
// Client-local key-value storage: the `KeyValueStorage` trait plus an
// in-memory backend (tests, embedding) and a directory-backed backend
// (the CLI).
//
// Design principles:
// - Values are opaque UTF-8 strings; JSON encoding lives in the helpers
//   `read_json` / `write_json`, not in the backends.
// - `FileStorage` writes atomically (write -> temp, rename -> final) so a
//   crash during a write never corrupts the previous value of a key.
// - Each key is its own file, so writers of different keys never clobber
//   each other. Writers of the same key are last-write-wins.

use crate::util::constants::{MAX_STORAGE_KEY_LEN, STORAGE_FILE_EXTENSION};
use crate::util::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Minimal Web-Storage-like interface (`getItem` / `setItem` /
/// `removeItem`).
pub trait KeyValueStorage {
    /// Value stored under `key`, or `None` when the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// Reject keys that could escape a storage directory or collide after
/// case-folding on some filesystems.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_STORAGE_KEY_LEN
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey {
            key: key.to_string(),
        })
    }
}

// =============================================================================
// JSON helpers
// =============================================================================

/// Read and decode the JSON value under `key`.
pub fn read_json<T, S>(storage: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStorage + ?Sized,
{
    match storage.get_item(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Json {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Encode `value` as JSON and store it under `key`.
pub fn write_json<T, S>(storage: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStorage + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|source| StorageError::Json {
        key: key.to_string(),
        source,
    })?;
    storage.set_item(key, &json)
}

// =============================================================================
// In-memory backend
// =============================================================================

/// In-memory storage.
///
/// Clones share the same underlying map, the way every script on a page
/// sees the same `localStorage`. Reopening a store over a clone is the
/// in-memory equivalent of reloading the page.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create a new empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.data.borrow().is_empty()
    }

    /// Check if a key exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.borrow().contains_key(key)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        Ok(self.data.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.data.borrow_mut().remove(key);
        Ok(())
    }
}

// =============================================================================
// Directory backend
// =============================================================================

/// One file per key (`<dir>/<key>.json`).
///
/// The directory is created on first write; reads from a missing
/// directory behave like an empty storage.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self
            .dir
            .join(format!("{key}.{STORAGE_FILE_EXTENSION}")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                path,
                operation: "read",
                source,
            }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            operation: "create directory",
            source,
        })?;

        // Atomic write: a crash between write and rename loses the new value
        // but never corrupts the old one.
        let tmp = path.with_extension(format!("{STORAGE_FILE_EXTENSION}.tmp"));
        std::fs::write(&tmp, value.as_bytes()).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            operation: "write",
            source,
        })?;

        std::fs::rename(&tmp, &path).map_err(|source| {
            // Clean up the temp file on failure; ignore any secondary error.
            let _ = std::fs::remove_file(&tmp);
            StorageError::Io {
                path: path.clone(),
                operation: "rename",
                source,
            }
        })?;

        tracing::trace!(key, bytes = value.len(), "Storage key written");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::trace!(key, "Storage key removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                path,
                operation: "remove",
                source,
            }),
        }
    }
}

// =============================================================================
// Unit tests
// =============================================================================
