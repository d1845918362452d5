// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response data structures for the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation. Wire field names are camelCase.
//!
//! ## Space Name Type
//!
//! The [`SpaceName`] newtype carries the validated form of a space name:
//! 3-40 characters, alphanumeric plus hyphen and underscore. Validation
//! happens once at the boundary; everything behind it can treat the name
//! as safe (including as a file name in the storage layer).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::Role;
use crate::storage::{StoredContent, StoredImage, StoredSpace};

// =============================================================================
// Space Name Type
// =============================================================================

/// A validated space name.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct SpaceName(String);

impl SpaceName {
    /// Minimum name length.
    pub const MIN_LEN: usize = 3;
    /// Maximum name length.
    pub const MAX_LEN: usize = 40;

    /// Validate a raw name. Returns `None` if the name is out of bounds or
    /// contains characters outside `[A-Za-z0-9_-]`.
    pub fn parse(raw: &str) -> Option<SpaceName> {
        let len_ok = (Self::MIN_LEN..=Self::MAX_LEN).contains(&raw.len());
        let chars_ok = raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if len_ok && chars_ok {
            Some(SpaceName(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SpaceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SpaceName> for String {
    fn from(value: SpaceName) -> Self {
        value.0
    }
}

// =============================================================================
// Space Models
// =============================================================================

/// Request to create a new space.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpaceRequest {
    /// Desired space name.
    pub name: String,
    /// Password granting read-only access.
    pub view_password: String,
    /// Password granting full control. Must differ from the view password.
    pub admin_password: String,
}

/// Public view of a space (no secret material).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpaceSummary {
    /// The space name.
    pub name: String,
    /// When the space was created.
    pub created_at: DateTime<Utc>,
}

impl From<StoredSpace> for SpaceSummary {
    fn from(space: StoredSpace) -> Self {
        Self {
            name: space.name,
            created_at: space.created_at,
        }
    }
}

/// Response after creating a space.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpaceResponse {
    pub ok: bool,
    /// Capability token for the creator (admin role).
    pub token: String,
    /// The created space.
    pub space: SpaceSummary,
}

/// Response for the existence probe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExistsResponse {
    pub exists: bool,
}

/// Request to log in to a space.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// The view or admin password. Which one it is determines the role.
    #[serde(default)]
    pub password: Option<String>,
}

/// Response after a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub ok: bool,
    /// Capability token bound to the space and resolved role.
    pub token: String,
    /// The role the supplied password resolved to.
    pub role: Role,
}

// =============================================================================
// Content Models
// =============================================================================

/// Pagination parameters for content listing.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PageQuery {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: usize,
    /// Page size.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    10
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

/// Pagination metadata returned alongside a content page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub has_more: bool,
}

/// Public view of a content entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    /// Unique entry identifier.
    pub id: String,
    /// Text body (may be empty).
    pub text: String,
    /// Attached images.
    pub images: Vec<StoredImage>,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// When the entry was last updated.
    pub updated_at: DateTime<Utc>,
}

impl From<StoredContent> for ContentEntry {
    fn from(entry: StoredContent) -> Self {
        Self {
            id: entry.id,
            text: entry.text,
            images: entry.images,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// A space together with one page of its content.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpaceWithContents {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub contents: Vec<ContentEntry>,
}

/// Response for the space view endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpaceResponse {
    pub ok: bool,
    pub space: SpaceWithContents,
    pub pagination: Pagination,
}

/// Request to update a content entry's text.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateContentRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Response wrapping a single content entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub ok: bool,
    pub content: ContentEntry,
}

/// Generic acknowledgement response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub ok: bool,
    pub message: String,
}
