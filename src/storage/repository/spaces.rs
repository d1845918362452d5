// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Space repository: the secret store.
//!
//! Each space is one JSON file under `<data>/spaces/` holding the two
//! password hashes. Spaces are immutable after creation; the only write
//! path is the initial insert, which must lose cleanly to a concurrent
//! creation of the same name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{FileStorage, StorageError, StorageResult};

/// A space record as stored on disk.
///
/// The two hashes are independently salted Argon2id PHC strings. They are
/// never returned by the API and never logged; this type deliberately does
/// not implement `Debug`.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoredSpace {
    /// Unique space name (validated at creation, immutable).
    pub name: String,
    /// Hash of the read-only password.
    pub view_secret_hash: String,
    /// Hash of the full-control password.
    pub admin_secret_hash: String,
    /// When the space was created.
    pub created_at: DateTime<Utc>,
}

/// Repository for space operations.
pub struct SpaceRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> SpaceRepository<'a> {
    /// Create a new SpaceRepository.
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Check if a space exists.
    pub fn exists(&self, space_name: &str) -> bool {
        self.storage.exists(self.storage.paths().space(space_name))
    }

    /// Get a space by name.
    pub fn get(&self, space_name: &str) -> StorageResult<StoredSpace> {
        let path = self.storage.paths().space(space_name);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("Space {space_name}")));
        }
        self.storage.read_json(path)
    }

    /// Create a new space.
    ///
    /// Concurrent creations of the same name are resolved by the store:
    /// exactly one insert succeeds, the rest fail with `AlreadyExists`.
    pub fn create(&self, space: &StoredSpace) -> StorageResult<()> {
        self.storage
            .create_json(self.storage.paths().space(&space.name), space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use tempfile::TempDir;

    fn test_storage() -> (FileStorage, TempDir) {
        let tmp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(StoragePaths::new(tmp.path()));
        storage.initialize().unwrap();
        (storage, tmp)
    }

    fn test_space(name: &str) -> StoredSpace {
        StoredSpace {
            name: name.to_string(),
            view_secret_hash: "$argon2id$v=19$m=19456,t=2,p=1$view$hash".to_string(),
            admin_secret_hash: "$argon2id$v=19$m=19456,t=2,p=1$admin$hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn create_then_get_space() {
        let (storage, _tmp) = test_storage();
        let repo = SpaceRepository::new(&storage);

        let space = test_space("demo-space");
        repo.create(&space).unwrap();

        assert!(repo.exists("demo-space"));
        let loaded = repo.get("demo-space").unwrap();
        assert_eq!(loaded.name, "demo-space");
        assert_eq!(loaded.view_secret_hash, space.view_secret_hash);
        assert_eq!(loaded.admin_secret_hash, space.admin_secret_hash);
    }

    #[test]
    fn get_missing_space_errors() {
        let (storage, _tmp) = test_storage();
        let repo = SpaceRepository::new(&storage);

        assert!(!repo.exists("nothing"));
        let result = repo.get("nothing");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn duplicate_create_is_rejected_and_does_not_overwrite() {
        let (storage, _tmp) = test_storage();
        let repo = SpaceRepository::new(&storage);

        let original = test_space("taken");
        repo.create(&original).unwrap();

        let mut imposter = test_space("taken");
        imposter.admin_secret_hash = "$argon2id$other".to_string();
        let result = repo.create(&imposter);
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));

        let loaded = repo.get("taken").unwrap();
        assert_eq!(loaded.admin_secret_hash, original.admin_secret_hash);
    }
}
