// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        ContentEntry, ContentResponse, CreateSpaceRequest, CreateSpaceResponse, ExistsResponse,
        LoginRequest, LoginResponse, MessageResponse, Pagination, SpaceResponse, SpaceSummary,
        SpaceWithContents, UpdateContentRequest,
    },
    state::AppState,
    storage::StoredImage,
};

pub mod content;
pub mod health;
pub mod spaces;

/// Maximum request body size. Large enough for a full image upload batch
/// (6 files at 5 MiB each) plus multipart framing.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let uploads_dir = state.storage().paths().uploads_dir();

    let api_routes = Router::new()
        .route("/spaces", post(spaces::create_space))
        .route("/spaces/{space_name}", get(spaces::get_space))
        .route("/spaces/{space_name}/exists", get(spaces::space_exists))
        .route("/spaces/{space_name}/login", post(spaces::login))
        .route("/spaces/{space_name}/content", post(content::create_content))
        .route(
            "/spaces/{space_name}/content/{content_id}",
            put(content::update_content).delete(content::delete_content),
        )
        .route(
            "/spaces/{space_name}/content/{content_id}/images",
            post(content::add_images),
        )
        .route(
            "/spaces/{space_name}/content/{content_id}/images/{image_name}",
            delete(content::delete_image),
        );

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::live))
        .nest("/api", api_routes)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::live,
        spaces::create_space,
        spaces::space_exists,
        spaces::login,
        spaces::get_space,
        content::create_content,
        content::update_content,
        content::delete_content,
        content::add_images,
        content::delete_image
    ),
    components(
        schemas(
            CreateSpaceRequest,
            CreateSpaceResponse,
            SpaceSummary,
            ExistsResponse,
            LoginRequest,
            LoginResponse,
            SpaceResponse,
            SpaceWithContents,
            ContentEntry,
            ContentResponse,
            UpdateContentRequest,
            MessageResponse,
            Pagination,
            StoredImage
        )
    ),
    tags(
        (name = "Health", description = "Service health probes"),
        (name = "Spaces", description = "Space creation, login, and viewing"),
        (name = "Content", description = "Admin-only content management")
    )
)]
struct ApiDoc;
