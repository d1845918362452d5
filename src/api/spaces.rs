// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Space lifecycle API endpoints.
//!
//! Creation and login are the two endpoints that run without a capability
//! token; they are where secrets are checked and tokens minted. Viewing a
//! space requires a token of any role.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    auth::{derive_role, hash_secret, Role, SpaceAccess, MIN_SECRET_LEN},
    error::ApiError,
    models::{
        ContentEntry, CreateSpaceRequest, CreateSpaceResponse, ExistsResponse, LoginRequest,
        LoginResponse, PageQuery, Pagination, SpaceName, SpaceResponse, SpaceSummary,
        SpaceWithContents,
    },
    state::AppState,
    storage::{ContentRepository, SpaceRepository, StorageError, StoredSpace},
};

/// Path parameter for space-scoped routes.
#[derive(Debug, Deserialize)]
pub struct SpacePath {
    pub space_name: String,
}

/// Create a new space.
///
/// Validates the name pattern and the secret policy (both passwords at
/// least six characters, and different from each other), then inserts the
/// space and mints an admin token for the creator.
#[utoipa::path(
    post,
    path = "/api/spaces",
    tag = "Spaces",
    request_body = CreateSpaceRequest,
    responses(
        (status = 201, description = "Space created", body = CreateSpaceResponse),
        (status = 400, description = "Invalid name or password policy violation"),
        (status = 409, description = "Space name already taken")
    )
)]
pub async fn create_space(
    State(state): State<AppState>,
    Json(request): Json<CreateSpaceRequest>,
) -> Result<(StatusCode, Json<CreateSpaceResponse>), ApiError> {
    let name = SpaceName::parse(&request.name).ok_or_else(|| {
        ApiError::bad_request("Space name must be 3-40 characters, letters/numbers/-/_ only")
    })?;

    if request.view_password.len() < MIN_SECRET_LEN {
        return Err(ApiError::bad_request(format!(
            "View password must be at least {MIN_SECRET_LEN} characters"
        )));
    }
    if request.admin_password.len() < MIN_SECRET_LEN {
        return Err(ApiError::bad_request(format!(
            "Admin password must be at least {MIN_SECRET_LEN} characters"
        )));
    }
    if request.view_password == request.admin_password {
        return Err(ApiError::bad_request(
            "View and admin passwords must differ",
        ));
    }

    let view_secret_hash = hash_secret(&request.view_password)
        .map_err(|e| ApiError::internal(format!("Password hashing failed: {e}")))?;
    let admin_secret_hash = hash_secret(&request.admin_password)
        .map_err(|e| ApiError::internal(format!("Password hashing failed: {e}")))?;

    let space = StoredSpace {
        name: name.as_str().to_string(),
        view_secret_hash,
        admin_secret_hash,
        created_at: Utc::now(),
    };

    let repo = SpaceRepository::new(state.storage());
    repo.create(&space).map_err(|e| match e {
        StorageError::AlreadyExists(_) => ApiError::conflict("Space name already taken"),
        other => ApiError::internal(format!("Failed to store space: {other}")),
    })?;

    // The creator proved knowledge of the admin secret by setting it.
    let token = state
        .token_keys()
        .issue(name.as_str(), Role::Admin)
        .map_err(|e| ApiError::internal(format!("Failed to issue token: {e}")))?;

    tracing::info!(space = %name, "space created");

    let response = CreateSpaceResponse {
        ok: true,
        token,
        space: SpaceSummary::from(space),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Check if a space exists.
#[utoipa::path(
    get,
    path = "/api/spaces/{space_name}/exists",
    tag = "Spaces",
    params(("space_name" = String, Path, description = "Space name to probe")),
    responses((status = 200, description = "Existence flag", body = ExistsResponse))
)]
pub async fn space_exists(
    State(state): State<AppState>,
    Path(SpacePath { space_name }): Path<SpacePath>,
) -> Json<ExistsResponse> {
    let repo = SpaceRepository::new(state.storage());
    Json(ExistsResponse {
        exists: repo.exists(&space_name),
    })
}

/// Log in to a space with either of its passwords.
///
/// The admin hash is checked first; whichever secret matched determines the
/// role embedded in the returned token.
#[utoipa::path(
    post,
    path = "/api/spaces/{space_name}/login",
    tag = "Spaces",
    params(("space_name" = String, Path, description = "Space to log in to")),
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Missing password"),
        (status = 401, description = "Invalid password"),
        (status = 404, description = "Space not found")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Path(SpacePath { space_name }): Path<SpacePath>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let password = match request.password.as_deref() {
        Some(p) if !p.is_empty() => p,
        _ => return Err(ApiError::bad_request("Password is required")),
    };

    let repo = SpaceRepository::new(state.storage());
    let space = repo
        .get(&space_name)
        .map_err(|_| ApiError::not_found("Space not found"))?;

    let role = derive_role(password, &space.admin_secret_hash, &space.view_secret_hash)
        .role()
        .ok_or_else(|| ApiError::unauthorized("Invalid password"))?;

    let token = state
        .token_keys()
        .issue(&space_name, role)
        .map_err(|e| ApiError::internal(format!("Failed to issue token: {e}")))?;

    tracing::info!(space = %space_name, role = %role, "login succeeded");

    Ok(Json(LoginResponse {
        ok: true,
        token,
        role,
    }))
}

/// View a space and one page of its content, newest first.
#[utoipa::path(
    get,
    path = "/api/spaces/{space_name}",
    tag = "Spaces",
    security(("bearer_auth" = [])),
    params(
        ("space_name" = String, Path, description = "Space to view"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Space with contents", body = SpaceResponse),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid, expired, or mismatched token"),
        (status = 404, description = "Space not found")
    )
)]
pub async fn get_space(
    SpaceAccess(claims): SpaceAccess,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<SpaceResponse>, ApiError> {
    let repo = SpaceRepository::new(state.storage());
    let space = repo
        .get(&claims.space)
        .map_err(|_| ApiError::not_found("Space not found"))?;

    let page = query.page.max(1);
    let content_repo = ContentRepository::new(state.storage());
    let content_page = content_repo
        .list_page(&claims.space, page, query.limit)
        .map_err(|e| ApiError::internal(format!("Failed to list content: {e}")))?;

    Ok(Json(SpaceResponse {
        ok: true,
        space: SpaceWithContents {
            name: space.name,
            created_at: space.created_at,
            contents: content_page
                .entries
                .into_iter()
                .map(ContentEntry::from)
                .collect(),
        },
        pagination: Pagination {
            page,
            limit: query.limit,
            has_more: content_page.has_more,
        },
    }))
}
