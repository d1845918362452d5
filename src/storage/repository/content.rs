// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Content repository.
//!
//! Each content entry is one JSON file under `<data>/content/`, bound to
//! its owning space by name. Lookups are always scoped to a space so an
//! entry id from one space cannot address an entry in another.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{FileStorage, StorageError, StorageResult};

/// Metadata for an uploaded image attached to a content entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    /// File name as supplied by the uploader (display only).
    pub original_name: String,
    /// Server-generated file name under the uploads directory.
    pub stored_name: String,
    /// MIME type recorded at upload time.
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
}

/// A content entry as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredContent {
    /// Unique entry identifier (UUID).
    pub id: String,
    /// Name of the owning space.
    pub space_name: String,
    /// Text body (may be empty).
    pub text: String,
    /// Attached images.
    pub images: Vec<StoredImage>,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// When the entry was last updated.
    pub updated_at: DateTime<Utc>,
}

/// One page of content entries, newest first.
pub struct ContentPage {
    pub entries: Vec<StoredContent>,
    pub has_more: bool,
}

/// Repository for content operations.
pub struct ContentRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> ContentRepository<'a> {
    /// Create a new ContentRepository.
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Get a content entry, scoped to a space.
    ///
    /// An entry that exists but belongs to a different space is reported
    /// as not found.
    pub fn get(&self, space_name: &str, content_id: &str) -> StorageResult<StoredContent> {
        let path = self.storage.paths().content_entry(content_id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("Content {content_id}")));
        }
        let entry: StoredContent = self.storage.read_json(path)?;
        if entry.space_name != space_name {
            return Err(StorageError::NotFound(format!("Content {content_id}")));
        }
        Ok(entry)
    }

    /// Create a new content entry.
    pub fn create(&self, entry: &StoredContent) -> StorageResult<()> {
        self.storage
            .create_json(self.storage.paths().content_entry(&entry.id), entry)
    }

    /// Update an existing content entry.
    pub fn update(&self, entry: &StoredContent) -> StorageResult<()> {
        let path = self.storage.paths().content_entry(&entry.id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("Content {}", entry.id)));
        }
        self.storage.write_json(path, entry)
    }

    /// Delete a content entry, returning the deleted record so callers can
    /// clean up its image files.
    pub fn delete(&self, space_name: &str, content_id: &str) -> StorageResult<StoredContent> {
        let entry = self.get(space_name, content_id)?;
        self.storage
            .delete(self.storage.paths().content_entry(content_id))?;
        Ok(entry)
    }

    /// List one page of a space's content, newest first.
    pub fn list_page(&self, space_name: &str, page: usize, limit: usize) -> StorageResult<ContentPage> {
        let ids = self
            .storage
            .list_files(self.storage.paths().content_dir(), "json")?;

        let mut entries = Vec::new();
        for id in ids {
            match self.storage.read_json::<StoredContent>(self.storage.paths().content_entry(&id)) {
                Ok(entry) if entry.space_name == space_name => entries.push(entry),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Failed to read content {}: {}", id, e);
                }
            }
        }

        // Newest first; id as tie-breaker for a stable order.
        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let total = entries.len();
        let offset = page.saturating_sub(1).saturating_mul(limit);
        let page_entries: Vec<StoredContent> =
            entries.into_iter().skip(offset).take(limit).collect();
        let has_more = offset + page_entries.len() < total;

        Ok(ContentPage {
            entries: page_entries,
            has_more,
        })
    }
}
