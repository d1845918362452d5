// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Capability token issuing and verification.
//!
//! Tokens are HS256 JWTs signed with a process-wide secret supplied through
//! configuration. Any instance holding the same key can validate any token,
//! so no coordination between instances is needed. There is no refresh and
//! no revocation; a token is valid until its embedded expiry.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::AccessClaims;
use super::error::AuthError;
use super::roles::Role;

/// Token lifetime in seconds (1 hour). No refresh mechanism exists; clients
/// must re-authenticate after expiry.
pub const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Signing and verification keys for capability tokens.
///
/// Constructed once at startup from the configured secret and injected into
/// application state; the key is never read from ambient globals.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    /// Create token keys from the shared secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Mint a token binding `space` to `role`, expiring in one hour.
    pub fn issue(&self, space: &str, role: Role) -> Result<String, AuthError> {
        self.issue_at(space, role, Utc::now().timestamp())
    }

    /// Mint a token with an explicit issued-at timestamp.
    pub fn issue_at(&self, space: &str, role: Role, now: i64) -> Result<String, AuthError> {
        let claims = AccessClaims {
            space: space.to_string(),
            role,
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| AuthError::MalformedToken)
    }

    /// Verify a token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token against an explicit current timestamp.
    ///
    /// Expiry is checked here rather than by the JWT library: the bound is
    /// exclusive (a token checked at exactly `exp` is already expired) and
    /// the expired case must stay distinguishable from a bad signature.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<AccessClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data =
            decode::<AccessClaims>(token, &self.decoding, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AuthError::InvalidSignature
                    }
                    _ => AuthError::MalformedToken,
                }
            })?;

        let claims = data.claims;
        if now >= claims.exp {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}
