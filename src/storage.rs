//! Persistent key-value storage
//!
//! This module provides string-keyed slots that survive across application
//! runs. The file-backed implementation keeps one JSON file per key in the
//! system's standard data directory.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to determine data directory location
    #[error("Failed to determine data directory location")]
    DataDirectoryNotFound,

    /// Failed to create or access data directory
    #[error("Failed to create data directory at {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read stored data
    #[error("Failed to read storage file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write stored data
    #[error("Failed to write storage file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to serialize data for storage
    #[error("Failed to serialize data: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// A persistent store of string values under string keys.
pub trait Storage {
    /// Returns the value stored under `key`, or None if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-backed storage, one `<key>.json` file per key.
#[derive(Debug)]
pub struct FileStorage {
    /// The directory where stored data lives
    data_dir: PathBuf,
}

impl FileStorage {
    /// Opens or creates file storage in the given directory
    ///
    /// Without a directory, the system's standard data directory for the
    /// application is used.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let storage = FileStorage::open(None)?;
    /// storage.set("favorites", "[]")?;
    /// ```
    pub fn open(data_dir: Option<&Path>) -> Result<Self, StorageError> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => directories::ProjectDirs::from("", "", "show-spotter")
                .ok_or(StorageError::DataDirectoryNotFound)?
                .data_dir()
                .to_path_buf(),
        };

        fs::create_dir_all(&data_dir).map_err(|e| StorageError::DirectoryCreationFailed {
            path: data_dir.clone(),
            source: e,
        })?;

        Ok(Self { data_dir })
    }

    /// Returns the path to the data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", sanitize_name(key)))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let file_path = self.file_path(key);

        if !file_path.exists() {
            return Ok(None);
        }

        fs::read_to_string(&file_path)
            .map(Some)
            .map_err(|e| StorageError::ReadFailed {
                path: file_path,
                source: e,
            })
    }

    /// Writes to a uniquely named temporary file first, then renames it over
    /// the target so a crash never leaves a half-written value behind.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let file_path = self.file_path(key);
        let temp_path = self
            .data_dir
            .join(format!(".{}_{}.tmp", sanitize_name(key), ulid::Ulid::new()));

        fs::write(&temp_path, value).map_err(|e| StorageError::WriteFailed {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, &file_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            StorageError::WriteFailed {
                path: file_path,
                source: e,
            }
        })
    }
}

/// Storage that lives only as long as the value itself.
///
/// Used when persistence is disabled and in tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: Storage + ?Sized> Storage for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Sanitizes a key for use in file paths
///
/// Converts to lowercase and replaces all characters that are not
/// a-z, 0-9, or hyphen with underscores.
fn sanitize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("favorites"), "favorites");
        assert_eq!(sanitize_name("With Spaces"), "with_spaces");
        assert_eq!(sanitize_name("With-Hyphens"), "with-hyphens");
        assert_eq!(sanitize_name("../escape"), "___escape");
    }

    #[test]
    fn test_file_storage_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(Some(dir.path())).unwrap();

        assert_eq!(storage.get("favorites").unwrap(), None);
    }

    #[test]
    fn test_file_storage_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(Some(dir.path())).unwrap();

        storage.set("favorites", "[1,2]").unwrap();
        storage.set("favorites", "[3]").unwrap();

        assert_eq!(storage.get("favorites").unwrap().as_deref(), Some("[3]"));
        assert!(dir.path().join("favorites.json").is_file());
    }

    #[test]
    fn test_file_storage_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(Some(dir.path())).unwrap();

        storage.set("favorites", "[]").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["favorites.json"]);
    }

    #[test]
    fn test_file_storage_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        let storage = FileStorage::open(Some(&nested)).unwrap();

        assert!(nested.is_dir());
        assert_eq!(storage.data_dir(), nested.as_path());
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("favorites").unwrap(), None);

        storage.set("favorites", "[]").unwrap();
        assert_eq!(storage.get("favorites").unwrap().as_deref(), Some("[]"));
    }
}
