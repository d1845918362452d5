// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! This module implements the dual-secret access scheme for spaces.
//!
//! ## Auth Flow
//!
//! 1. Client submits a space name and a password to the login endpoint
//! 2. The credential verifier resolves a role from whichever of the space's
//!    two stored hashes matched (admin checked first)
//! 3. A signed capability token binding `{space, role}` is minted, valid
//!    for one hour
//! 4. The client attaches `Authorization: Bearer <token>` to every
//!    subsequent request
//! 5. Extractors re-validate the token on each request and enforce that the
//!    embedded space matches the space being acted on, and that mutations
//!    carry the admin role
//!
//! ## Security
//!
//! - Passwords are stored as independently salted Argon2id hashes
//! - Tokens are stateless; there is no server-side session and no
//!   revocation list - a leaked token stays valid until natural expiry
//! - The signing key comes from configuration and is injected into
//!   application state, never read from ambient globals

pub mod claims;
pub mod error;
pub mod extractor;
pub mod keys;
pub mod password;
pub mod roles;

pub use claims::AccessClaims;
pub use error::AuthError;
pub use extractor::{AdminAccess, SpaceAccess};
pub use keys::{TokenKeys, TOKEN_LIFETIME_SECS};
pub use password::{derive_role, hash_secret, verify_secret, SecretMatch, MIN_SECRET_LEN};
pub use roles::Role;
