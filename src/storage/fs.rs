// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-file storage operations.
//!
//! Each entity is stored as a single JSON file. Updates go through a
//! temp-file-plus-rename so readers never observe a partial write; inserts
//! that must be unique (space creation) go through `create_json`, which
//! relies on the filesystem's `create_new` guarantee to reject a concurrent
//! duplicate instead of overwriting it.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use super::StoragePaths;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Entity already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Storage not initialized
    #[error("Storage not initialized")]
    NotInitialized,
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// File-backed storage manager.
#[derive(Debug)]
pub struct FileStorage {
    paths: StoragePaths,
    initialized: bool,
}

impl FileStorage {
    /// Create a new FileStorage instance.
    ///
    /// Does NOT create the directory structure. Call `initialize()` first.
    pub fn new(paths: StoragePaths) -> Self {
        Self {
            paths,
            initialized: false,
        }
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Initialize the storage directory structure.
    ///
    /// Safe to call multiple times (idempotent).
    pub fn initialize(&mut self) -> StorageResult<()> {
        let dirs = [
            self.paths.spaces_dir(),
            self.paths.content_dir(),
            self.paths.uploads_dir(),
        ];

        for dir in dirs {
            fs::create_dir_all(&dir)?;
        }

        self.initialized = true;
        Ok(())
    }

    /// Check that the data directory is present and writable.
    pub fn health_check(&self) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let test_file = self.paths.root().join(".health_check");
        fs::write(&test_file, b"health_check")?;
        fs::remove_file(&test_file)?;
        Ok(())
    }

    // ========== Generic JSON Operations ==========

    /// Read a JSON file and deserialize it.
    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> StorageResult<T> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let value = serde_json::from_reader(reader)?;
        Ok(value)
    }

    /// Write a JSON file (atomic write via rename).
    pub fn write_json<T: Serialize>(&self, path: impl AsRef<Path>, value: &T) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }

        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Create a JSON file that must not already exist.
    ///
    /// The uniqueness check and the creation are a single filesystem
    /// operation (`create_new`), so two concurrent inserts for the same
    /// path cannot both succeed: the loser gets `AlreadyExists`.
    pub fn create_json<T: Serialize>(
        &self,
        path: impl AsRef<Path>,
        value: &T,
    ) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let path = path.as_ref();
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    StorageError::AlreadyExists(path.display().to_string())
                } else {
                    StorageError::Io(e)
                }
            })?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush().map_err(StorageError::Io)?;
        Ok(())
    }

    /// Check if a file exists.
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().exists()
    }

    /// Delete a file.
    pub fn delete(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }
        fs::remove_file(path.as_ref())?;
        Ok(())
    }

    /// List file stems in a directory matching an extension.
    pub fn list_files(&self, dir: impl AsRef<Path>, extension: &str) -> StorageResult<Vec<String>> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext == extension {
                        if let Some(stem) = path.file_stem() {
                            if let Some(id) = stem.to_str() {
                                ids.push(id.to_string());
                            }
                        }
                    }
                }
            }
        }
        Ok(ids)
    }

    // ========== Raw File Operations (uploaded images) ==========

    /// Write raw bytes to a file.
    pub fn write_bytes(&self, path: impl AsRef<Path>, data: &[u8]) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Probe {
        id: String,
        value: u32,
    }

    fn test_storage() -> (FileStorage, TempDir) {
        let tmp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(StoragePaths::new(tmp.path()));
        storage.initialize().unwrap();
        (storage, tmp)
    }

    #[test]
    fn uninitialized_storage_refuses_operations() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(StoragePaths::new(tmp.path()));
        let result: StorageResult<Probe> = storage.read_json(tmp.path().join("x.json"));
        assert!(matches!(result, Err(StorageError::NotInitialized)));
    }

    #[test]
    fn write_then_read_roundtrip() {
        let (storage, tmp) = test_storage();
        let path = tmp.path().join("probe.json");
        let probe = Probe {
            id: "p1".into(),
            value: 42,
        };

        storage.write_json(&path, &probe).unwrap();
        let loaded: Probe = storage.read_json(&path).unwrap();
        assert_eq!(loaded, probe);
    }

    #[test]
    fn create_json_rejects_duplicates() {
        let (storage, tmp) = test_storage();
        let path = tmp.path().join("unique.json");
        let probe = Probe {
            id: "p1".into(),
            value: 1,
        };

        storage.create_json(&path, &probe).unwrap();
        let second = storage.create_json(&path, &probe);
        assert!(matches!(second, Err(StorageError::AlreadyExists(_))));

        // The original content is untouched.
        let loaded: Probe = storage.read_json(&path).unwrap();
        assert_eq!(loaded.value, 1);
    }

    #[test]
    fn delete_removes_file() {
        let (storage, tmp) = test_storage();
        let path = tmp.path().join("gone.json");
        storage
            .write_json(
                &path,
                &Probe {
                    id: "x".into(),
                    value: 0,
                },
            )
            .unwrap();
        assert!(storage.exists(&path));

        storage.delete(&path).unwrap();
        assert!(!storage.exists(&path));
    }

    #[test]
    fn list_files_filters_by_extension() {
        let (storage, tmp) = test_storage();
        let dir = tmp.path().join("items");
        for id in ["a", "b"] {
            storage
                .write_json(
                    dir.join(format!("{id}.json")),
                    &Probe {
                        id: id.into(),
                        value: 0,
                    },
                )
                .unwrap();
        }
        storage.write_bytes(dir.join("noise.txt"), b"noise").unwrap();

        let mut ids = storage.list_files(&dir, "json").unwrap();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn list_files_on_missing_dir_is_empty() {
        let (storage, tmp) = test_storage();
        let ids = storage.list_files(tmp.path().join("nothing"), "json").unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn health_check_passes_on_initialized_storage() {
        let (storage, _tmp) = test_storage();
        assert!(storage.health_check().is_ok());
    }
}
