// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::storage::FileStorage;

/// Shared application state.
///
/// The storage layer is the only shared resource; token keys are immutable
/// after construction. Neither needs a lock: storage relies on filesystem
/// atomicity for its single racy insert, and token validation is purely
/// computational.
#[derive(Clone)]
pub struct AppState {
    storage: Arc<FileStorage>,
    token_keys: Arc<TokenKeys>,
}

impl AppState {
    /// Create application state from initialized storage and token keys.
    pub fn new(storage: FileStorage, token_keys: TokenKeys) -> Self {
        Self {
            storage: Arc::new(storage),
            token_keys: Arc::new(token_keys),
        }
    }

    /// Access the storage layer.
    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    /// Access the capability token keys.
    pub fn token_keys(&self) -> &TokenKeys {
        &self.token_keys
    }
}
