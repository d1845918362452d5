// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage backed by plain JSON files.
//!
//! ## Storage Layout
//!
//! ```text
//! <data>/
//!   spaces/
//!     {space_name}.json   # Password hashes + metadata (never served raw)
//!   content/
//!     {content_id}.json   # Text + image metadata, bound to a space
//!   uploads/
//!     {stored_name}       # Uploaded image files, server-generated names
//! ```
//!
//! Space creation is the only insert that needs a uniqueness guarantee;
//! it maps to an atomic `create_new` on the space file, so concurrent
//! creations of the same name cannot both succeed.

pub mod fs;
pub mod paths;
pub mod repository;

pub use fs::{FileStorage, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{
    ContentPage, ContentRepository, SpaceRepository, StoredContent, StoredImage, StoredSpace,
};
