// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Capability token claims.

use serde::{Deserialize, Serialize};

use super::roles::Role;

/// Claims carried by a capability token.
///
/// A token binds a space name to a role for a bounded time window. It is
/// never persisted server-side; validity is determined entirely by the
/// signature and the embedded expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Name of the space this token was minted for.
    pub space: String,

    /// Role resolved at login time.
    pub role: Role,

    /// Issued-at timestamp (Unix seconds).
    pub iat: i64,

    /// Expiry timestamp (Unix seconds, exclusive upper bound).
    pub exp: i64,
}

impl AccessClaims {
    /// Check if this token grants full control.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_lowercase_role() {
        let claims = AccessClaims {
            space: "demo-space".to_string(),
            role: Role::Viewer,
            iat: 1700000000,
            exp: 1700003600,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["space"], "demo-space");
        assert_eq!(json["role"], "viewer");
        assert_eq!(json["iat"], 1700000000);
        assert_eq!(json["exp"], 1700003600);
    }

    #[test]
    fn is_admin_checks_role() {
        let mut claims = AccessClaims {
            space: "s".to_string(),
            role: Role::Admin,
            iat: 0,
            exp: 1,
        };
        assert!(claims.is_admin());
        claims.role = Role::Viewer;
        assert!(!claims.is_admin());
    }
}
