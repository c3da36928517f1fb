//! Raw key-value storage backends.
//!
//! A backend stores strings under string keys, like a browser's
//! `localStorage`.  Backends report failures; the
//! [`NamespacedStore`](super::persisted::NamespacedStore) on top of them is
//! what swallows those failures.
//!
//! - [`MemoryBackend`] keeps items in process memory.
//! - [`FileBackend`] keeps items in a JSON object file on disk, re-read on
//!   every access and rewritten on every change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for storage backend operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing storage at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The storage file is not a JSON object of strings.
    #[error("storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Storage is disabled or otherwise not usable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// String-to-string storage.
pub trait KeyValueBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage.  Never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBackend {
    items: BTreeMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item; useful for seeding storage before the store reads it.
    pub fn with_item(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.items.insert(key.into(), value.into());
        self
    }

    /// All raw items, keyed by their namespaced key.
    pub fn items(&self) -> &BTreeMap<String, String> {
        &self.items
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Storage persisted as a JSON object file.
///
/// A missing file reads as empty; the file and its directory are created on
/// the first write.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(StorageError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| StorageError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content =
            serde_json::to_string_pretty(items).map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        std::fs::write(&self.path, content).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueBackend for FileBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let mut items = self.read_all()?;
        if items.remove(key).is_some() {
            self.write_all(&items)?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("ide_config_test_{}", Uuid::new_v4()))
    }

    #[test]
    fn test_memory_backend_set_get_remove() {
        let mut backend = MemoryBackend::new();

        backend.set_item("k", "v").unwrap();
        assert_eq!(backend.get_item("k").unwrap().as_deref(), Some("v"));

        backend.remove_item("k").unwrap();
        assert_eq!(backend.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_file_backend_missing_file_reads_as_empty() {
        let backend = FileBackend::new(temp_dir().join("storage.json"));

        assert_eq!(backend.get_item("anything").unwrap(), None);
    }

    #[test]
    fn test_file_backend_creates_directory_and_persists_items() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("nested").join("storage.json");
        let mut backend = FileBackend::new(&path);

        // Act
        backend.set_item("ide-config:theme", "dark").unwrap();
        let reopened = FileBackend::new(&path);

        // Assert
        assert_eq!(
            reopened.get_item("ide-config:theme").unwrap().as_deref(),
            Some("dark")
        );

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_file_backend_remove_item() {
        let dir = temp_dir();
        let mut backend = FileBackend::new(dir.join("storage.json"));
        backend.set_item("a", "1").unwrap();
        backend.set_item("b", "2").unwrap();

        backend.remove_item("a").unwrap();

        assert_eq!(backend.get_item("a").unwrap(), None);
        assert_eq!(backend.get_item("b").unwrap().as_deref(), Some("2"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_file_backend_corrupt_file_is_reported() {
        // Arrange
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("storage.json");
        std::fs::write(&path, "[[[ not json").unwrap();
        let backend = FileBackend::new(&path);

        // Act
        let result = backend.get_item("theme");

        // Assert
        assert!(matches!(result, Err(StorageError::Corrupt { .. })));
        std::fs::remove_dir_all(&dir).ok();
    }
}
