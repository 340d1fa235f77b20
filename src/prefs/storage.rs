//! Durable storage for the preference record.
//!
//! The record is one JSON string under a fixed key. Storage backends only
//! move bytes; parsing and defaulting happen in the store.

use crate::defaults;
use crate::error::{Result, VoznavError};
use std::fs;
use std::path::PathBuf;

/// Trait for preference record persistence.
///
/// This trait allows swapping implementations (real file storage vs memory).
pub trait PrefsStorage: Send {
    /// Read the raw persisted record, if any.
    fn load(&mut self) -> Result<Option<String>>;

    /// Write the raw record, replacing any previous value.
    fn save(&mut self, json: &str) -> Result<()>;
}

/// File-backed storage: `<dir>/<STORAGE_KEY>.json`.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            path: dir.join(format!("{}.json", defaults::STORAGE_KEY)),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl PrefsStorage for FileStorage {
    fn load(&mut self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VoznavError::Storage {
                message: format!("read {}: {}", self.path.display(), e),
            }),
        }
    }

    fn save(&mut self, json: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| VoznavError::Storage {
                message: format!("create {}: {}", parent.display(), e),
            })?;
        }
        fs::write(&self.path, json).map_err(|e| VoznavError::Storage {
            message: format!("write {}: {}", self.path.display(), e),
        })
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    value: Option<String>,
    fail_saves: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a pre-seeded record.
    pub fn with_value(json: &str) -> Self {
        Self {
            value: Some(json.to_string()),
            fail_saves: false,
        }
    }

    /// Configure the storage to fail on save.
    pub fn with_failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    /// The currently stored record, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl PrefsStorage for MemoryStorage {
    fn load(&mut self) -> Result<Option<String>> {
        Ok(self.value.clone())
    }

    fn save(&mut self, json: &str) -> Result<()> {
        if self.fail_saves {
            return Err(VoznavError::Storage {
                message: "memory storage configured to fail".to_string(),
            });
        }
        self.value = Some(json.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path().to_path_buf());

        assert_eq!(storage.load().unwrap(), None);

        storage.save(r#"{"highContrast":true}"#).unwrap();
        assert_eq!(
            storage.load().unwrap(),
            Some(r#"{"highContrast":true}"#.to_string())
        );
    }

    #[test]
    fn test_file_storage_uses_fixed_key() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf());

        let name = storage.path().file_name().unwrap().to_string_lossy();
        assert_eq!(name, "voznav.accessibility.json");
    }

    #[test]
    fn test_file_storage_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut storage = FileStorage::new(nested);

        storage.save("{}").unwrap();
        assert_eq!(storage.load().unwrap(), Some("{}".to_string()));
    }

    #[test]
    fn test_memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.load().unwrap(), None);

        storage.save("{}").unwrap();
        assert_eq!(storage.load().unwrap(), Some("{}".to_string()));
        assert_eq!(storage.value(), Some("{}"));
    }

    #[test]
    fn test_memory_storage_failing_saves() {
        let mut storage = MemoryStorage::new().with_failing_saves();
        assert!(storage.save("{}").is_err());
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn test_memory_storage_preseeded() {
        let mut storage = MemoryStorage::with_value(r#"{"fontScale":1.2}"#);
        assert_eq!(
            storage.load().unwrap(),
            Some(r#"{"fontScale":1.2}"#.to_string())
        );
    }
}
