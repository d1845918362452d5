// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access roles for spaces.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Access role for a space.
///
/// There is no per-user identity: a role is derived at login from which of
/// the space's two secrets matched, and travels only inside the capability
/// token.
///
/// - `Admin` - Full control: read, create, update, delete content
/// - `Viewer` - Read-only access to the space's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full control over the space's content.
    Admin,
    /// Read-only access.
    Viewer,
}

impl Role {
    /// Check if this role has at least the privileges of the required role.
    pub fn has_privilege(&self, required: Role) -> bool {
        match (self, required) {
            // Admin can do anything
            (Role::Admin, _) => true,
            // Viewer can do viewer things
            (Role::Viewer, Role::Viewer) => true,
            _ => false,
        }
    }

    /// Parse role from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "viewer" => Some(Role::Viewer),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Viewer => write!(f, "viewer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_has_all_privileges() {
        assert!(Role::Admin.has_privilege(Role::Admin));
        assert!(Role::Admin.has_privilege(Role::Viewer));
    }

    #[test]
    fn viewer_only_has_viewer_privilege() {
        assert!(!Role::Viewer.has_privilege(Role::Admin));
        assert!(Role::Viewer.has_privilege(Role::Viewer));
    }

    #[test]
    fn from_str_parses_correctly() {
        assert_eq!(Role::from_str("admin"), Some(Role::Admin));
        assert_eq!(Role::from_str("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_str("Viewer"), Some(Role::Viewer));
        assert_eq!(Role::from_str("editor"), None);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
        assert_eq!(serde_json::to_string(&Role::Viewer).unwrap(), r#""viewer""#);
    }
}
