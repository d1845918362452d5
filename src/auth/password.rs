// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential verification for the dual-secret scheme.
//!
//! Every space stores two independently salted Argon2id hashes: one for the
//! view password and one for the admin password. Plaintext passwords are
//! never persisted, never compared against each other, and never logged.
//! Role derivation is a pure function over the two stored hashes so the
//! ordering contract (admin checked first) stays explicit and testable.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::roles::Role;

/// Minimum length for both the view and the admin password at creation.
pub const MIN_SECRET_LEN: usize = 6;

/// Outcome of checking a plaintext password against a space's two hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretMatch {
    /// The admin secret matched.
    Admin,
    /// The view secret matched.
    Viewer,
    /// Neither secret matched.
    NoMatch,
}

impl SecretMatch {
    /// The role this match resolves to, if any.
    pub fn role(self) -> Option<Role> {
        match self {
            SecretMatch::Admin => Some(Role::Admin),
            SecretMatch::Viewer => Some(Role::Viewer),
            SecretMatch::NoMatch => None,
        }
    }
}

/// Hash a plaintext secret with a fresh random salt.
///
/// Returns the PHC string form, which embeds algorithm, parameters, and salt.
pub fn hash_secret(plaintext: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)?
        .to_string())
}

/// Verify a plaintext secret against a stored PHC hash string.
///
/// An unparsable stored hash counts as a non-match, so a corrupted record
/// is indistinguishable from a wrong password.
pub fn verify_secret(plaintext: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

/// Resolve which of a space's two secrets a plaintext password matches.
///
/// The admin hash is always checked first; if both verifications would
/// succeed, admin wins. The ordering is fixed and deterministic.
pub fn derive_role(plaintext: &str, admin_hash: &str, view_hash: &str) -> SecretMatch {
    if verify_secret(plaintext, admin_hash) {
        return SecretMatch::Admin;
    }
    if verify_secret(plaintext, view_hash) {
        return SecretMatch::Viewer;
    }
    SecretMatch::NoMatch
}
