// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors enforcing the access control gate.
//!
//! Every protected request passes through an ordered sequence of checks,
//! each terminal on failure:
//!
//! 1. **Authenticate** - validate the bearer token's signature and expiry
//! 2. **Authorize-space** - the token's embedded space must match the
//!    `{space_name}` segment of the request path
//! 3. **Authorize-role** - mutating operations additionally require the
//!    admin role
//!
//! [`SpaceAccess`] runs stages 1-2 and is sufficient for read-only access;
//! [`AdminAccess`] runs all three. Space creation and login have no token
//! yet and bypass the gate entirely.

use axum::{
    extract::{FromRequestParts, Path},
    http::{header::AUTHORIZATION, request::Parts},
    RequestPartsExt,
};
use serde::Deserialize;

use super::{claims::AccessClaims, error::AuthError};
use crate::state::AppState;

/// Path parameters shared by all space-scoped routes.
#[derive(Debug, Deserialize)]
struct SpacePathSegment {
    space_name: String,
}

/// Extractor for space-scoped access with any role.
///
/// # Example
///
/// ```rust,ignore
/// async fn get_space(
///     SpaceAccess(claims): SpaceAccess,
///     State(state): State<AppState>,
/// ) -> Result<Json<SpaceResponse>, ApiError> {
///     // claims.space is guaranteed to match the {space_name} path segment
/// }
/// ```
pub struct SpaceAccess(pub AccessClaims);

impl FromRequestParts<AppState> for SpaceAccess {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Stage 1: authenticate the bearer token.
        let token = bearer_token(parts)?;
        let claims = state.token_keys().verify(token).inspect_err(|e| {
            tracing::debug!(error = ?e, "capability token rejected");
        })?;

        // Stage 2: the token must be bound to the space named in the path.
        // A token minted for space A is useless against space B even though
        // both were signed with the same key.
        let Path(SpacePathSegment { space_name }) = parts
            .extract::<Path<SpacePathSegment>>()
            .await
            .map_err(|_| AuthError::SpaceMismatch)?;

        if claims.space != space_name {
            tracing::debug!(
                token_space = %claims.space,
                request_space = %space_name,
                "token presented against a different space"
            );
            return Err(AuthError::SpaceMismatch);
        }

        Ok(SpaceAccess(claims))
    }
}

/// Extractor for space-scoped access requiring the admin role.
pub struct AdminAccess(pub AccessClaims);

impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SpaceAccess(claims) = SpaceAccess::from_request_parts(parts, state).await?;

        // Stage 3: mutating operations require full control.
        if !claims.is_admin() {
            return Err(AuthError::AdminRequired);
        }

        Ok(AdminAccess(claims))
    }
}

/// Extract the bearer token from the Authorization header.
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidAuthHeader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Role, TokenKeys};
    use crate::state::AppState;
    use crate::storage::{FileStorage, StoragePaths};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use chrono::Utc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn read_probe(SpaceAccess(claims): SpaceAccess) -> String {
        claims.space
    }

    async fn admin_probe(AdminAccess(claims): AdminAccess) -> String {
        claims.space
    }

    fn test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut storage = FileStorage::new(StoragePaths::new(temp_dir.path()));
        storage.initialize().expect("Failed to initialize storage");
        let state = AppState::new(storage, TokenKeys::new(b"test-signing-secret"));
        (state, temp_dir)
    }

    fn test_router(state: AppState) -> Router {
        Router::new()
            .route("/spaces/{space_name}", get(read_probe))
            .route("/spaces/{space_name}/admin", get(admin_probe))
            .with_state(state)
    }

    async fn send(
        app: Router,
        uri: &str,
        bearer: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn missing_token_is_rejected_with_401() {
        let (state, _tmp) = test_state();
        let (status, body) = send(test_router(state), "/spaces/demo", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Access token required");
    }

    #[tokio::test]
    async fn garbled_header_is_rejected_with_401() {
        let (state, _tmp) = test_state();
        let app = test_router(state);
        let request = Request::builder()
            .uri("/spaces/demo")
            .header(AUTHORIZATION, "Token abc")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_for_the_right_space_passes() {
        let (state, _tmp) = test_state();
        let token = state.token_keys().issue("demo", Role::Viewer).unwrap();
        let app = test_router(state);

        let request = Request::builder()
            .uri("/spaces/demo")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"demo");
    }

    #[tokio::test]
    async fn token_for_another_space_is_rejected() {
        let (state, _tmp) = test_state();
        let token = state.token_keys().issue("space-a", Role::Admin).unwrap();
        let (status, body) = send(test_router(state), "/spaces/space-b", Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Unauthorized for this space");
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let (state, _tmp) = test_state();
        let stale = Utc::now().timestamp() - 2 * crate::auth::TOKEN_LIFETIME_SECS;
        let token = state
            .token_keys()
            .issue_at("demo", Role::Admin, stale)
            .unwrap();
        let (status, body) = send(test_router(state), "/spaces/demo", Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn viewer_token_cannot_reach_admin_routes() {
        let (state, _tmp) = test_state();
        let token = state.token_keys().issue("demo", Role::Viewer).unwrap();
        let (status, body) = send(test_router(state), "/spaces/demo/admin", Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Admin access required");
    }

    #[tokio::test]
    async fn admin_token_reaches_admin_routes() {
        let (state, _tmp) = test_state();
        let token = state.token_keys().issue("demo", Role::Admin).unwrap();
        let (status, _) = send(test_router(state), "/spaces/demo/admin", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
    }
}
