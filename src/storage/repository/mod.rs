// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repositories over the JSON-file store.

pub mod content;
pub mod spaces;

pub use content::{ContentPage, ContentRepository, StoredContent, StoredImage};
pub use spaces::{SpaceRepository, StoredSpace};
