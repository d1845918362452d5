// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the on-disk data layout.

use std::path::{Path, PathBuf};

/// Default base directory for persistent data.
pub const DATA_ROOT: &str = "./data";

/// Storage path utilities for the data directory.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persistent data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== Space Paths ==========

    /// Directory containing all spaces.
    pub fn spaces_dir(&self) -> PathBuf {
        self.root.join("spaces")
    }

    /// Path to a specific space file. Space names are validated at creation
    /// (alphanumeric plus hyphen/underscore), so they are safe as file names.
    pub fn space(&self, space_name: &str) -> PathBuf {
        self.spaces_dir().join(format!("{space_name}.json"))
    }

    // ========== Content Paths ==========

    /// Directory containing all content entries.
    pub fn content_dir(&self) -> PathBuf {
        self.root.join("content")
    }

    /// Path to a specific content entry file.
    pub fn content_entry(&self, content_id: &str) -> PathBuf {
        self.content_dir().join(format!("{content_id}.json"))
    }

    // ========== Upload Paths ==========

    /// Directory containing uploaded image files.
    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    /// Path to a specific uploaded file.
    pub fn upload(&self, stored_name: &str) -> PathBuf {
        self.uploads_dir().join(stored_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_use_data_root() {
        let paths = StoragePaths::default();
        assert_eq!(paths.root(), Path::new("./data"));
    }

    #[test]
    fn custom_root_for_testing() {
        let paths = StoragePaths::new("/tmp/test-data");
        assert_eq!(paths.root(), Path::new("/tmp/test-data"));
        assert_eq!(
            paths.space("demo-space"),
            PathBuf::from("/tmp/test-data/spaces/demo-space.json")
        );
    }

    #[test]
    fn space_paths_are_correct() {
        let paths = StoragePaths::new("/data");
        assert_eq!(paths.spaces_dir(), PathBuf::from("/data/spaces"));
        assert_eq!(paths.space("s1"), PathBuf::from("/data/spaces/s1.json"));
    }

    #[test]
    fn content_paths_are_correct() {
        let paths = StoragePaths::new("/data");
        assert_eq!(paths.content_dir(), PathBuf::from("/data/content"));
        assert_eq!(
            paths.content_entry("c-123"),
            PathBuf::from("/data/content/c-123.json")
        );
    }

    #[test]
    fn upload_paths_are_correct() {
        let paths = StoragePaths::new("/data");
        assert_eq!(paths.uploads_dir(), PathBuf::from("/data/uploads"));
        assert_eq!(
            paths.upload("173-abc.png"),
            PathBuf::from("/data/uploads/173-abc.png")
        );
    }
}
