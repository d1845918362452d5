// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Content management API endpoints.
//!
//! All operations here mutate a space's content and therefore require an
//! admin-role capability token for the space named in the path. Uploaded
//! images are stored under server-generated names; the client-supplied file
//! name is kept only for display.

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AdminAccess,
    error::ApiError,
    models::{ContentEntry, ContentResponse, MessageResponse, UpdateContentRequest},
    state::AppState,
    storage::{ContentRepository, SpaceRepository, StoredContent, StoredImage},
};

/// Maximum number of images per upload request.
const MAX_IMAGES_PER_UPLOAD: usize = 6;

/// Maximum size of a single uploaded image (5 MiB).
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Maximum length of a content entry's text body.
const MAX_TEXT_LEN: usize = 5000;

/// Accepted image MIME types.
const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Path parameters for content-scoped routes.
#[derive(Debug, Deserialize)]
pub struct ContentPath {
    pub content_id: String,
}

/// Path parameters for image-scoped routes.
#[derive(Debug, Deserialize)]
pub struct ImagePath {
    pub content_id: String,
    pub image_name: String,
}

/// An uploaded image held in memory between parsing and persistence.
struct UploadedImage {
    original_name: String,
    mime_type: String,
    data: Bytes,
}

/// Parse a multipart payload into an optional text field and its images.
async fn read_multipart(
    multipart: &mut Multipart,
) -> Result<(Option<String>, Vec<UploadedImage>), ApiError> {
    let mut text = None;
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Invalid multipart payload"))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "text" => {
                text = Some(
                    field
                        .text()
                        .await
                        .map_err(|_| ApiError::bad_request("Invalid multipart payload"))?,
                );
            }
            "images" => {
                if images.len() >= MAX_IMAGES_PER_UPLOAD {
                    return Err(ApiError::bad_request(format!(
                        "Too many files. Maximum is {MAX_IMAGES_PER_UPLOAD} files"
                    )));
                }

                let mime_type = field.content_type().unwrap_or_default().to_string();
                if !ALLOWED_IMAGE_TYPES.contains(&mime_type.as_str()) {
                    return Err(ApiError::bad_request("Only image files are allowed"));
                }

                let original_name = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::bad_request("Invalid multipart payload"))?;
                if data.len() > MAX_IMAGE_BYTES {
                    return Err(ApiError::bad_request("File too large. Maximum size is 5MB"));
                }

                images.push(UploadedImage {
                    original_name,
                    mime_type,
                    data,
                });
            }
            _ => {}
        }
    }

    Ok((text, images))
}

/// Server-generated name for an uploaded file. The extension comes from the
/// validated MIME type, never from the client-supplied file name.
fn stored_name_for(mime_type: &str) -> String {
    let ext = match mime_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "bin",
    };
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}.{}", Utc::now().timestamp_millis(), &suffix[..7], ext)
}

/// Persist uploaded images to the uploads directory.
fn save_images(state: &AppState, uploads: Vec<UploadedImage>) -> Result<Vec<StoredImage>, ApiError> {
    let mut stored = Vec::with_capacity(uploads.len());
    for upload in uploads {
        let stored_name = stored_name_for(&upload.mime_type);
        state
            .storage()
            .write_bytes(state.storage().paths().upload(&stored_name), &upload.data)
            .map_err(|e| ApiError::internal(format!("Failed to store upload: {e}")))?;
        stored.push(StoredImage {
            original_name: upload.original_name,
            stored_name,
            mime_type: upload.mime_type,
            size: upload.data.len() as u64,
        });
    }
    Ok(stored)
}

/// Remove an uploaded file, logging rather than failing if it is gone.
fn unlink_upload(state: &AppState, stored_name: &str) {
    let path = state.storage().paths().upload(stored_name);
    if let Err(e) = state.storage().delete(&path) {
        tracing::warn!("Failed to delete upload {}: {}", stored_name, e);
    }
}

fn validate_text(text: &str) -> Result<(), ApiError> {
    if text.len() > MAX_TEXT_LEN {
        return Err(ApiError::bad_request(format!(
            "Text must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(())
}

/// An image name arriving as a path parameter must be a bare file name.
/// Anything that could traverse out of the uploads directory is rejected
/// before the image list is even consulted.
fn is_bare_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

/// Add a content entry to a space.
#[utoipa::path(
    post,
    path = "/api/spaces/{space_name}/content",
    tag = "Content",
    security(("bearer_auth" = [])),
    params(("space_name" = String, Path, description = "Target space")),
    responses(
        (status = 201, description = "Content created", body = ContentResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid token, wrong space, or not admin"),
        (status = 404, description = "Space not found")
    )
)]
pub async fn create_content(
    AdminAccess(claims): AdminAccess,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ContentResponse>), ApiError> {
    let space_repo = SpaceRepository::new(state.storage());
    if !space_repo.exists(&claims.space) {
        return Err(ApiError::not_found("Space not found"));
    }

    let (text, uploads) = read_multipart(&mut multipart).await?;
    let text = text.unwrap_or_default().trim().to_string();
    validate_text(&text)?;

    let images = save_images(&state, uploads)?;

    let now = Utc::now();
    let entry = StoredContent {
        id: Uuid::new_v4().to_string(),
        space_name: claims.space.clone(),
        text,
        images,
        created_at: now,
        updated_at: now,
    };

    let repo = ContentRepository::new(state.storage());
    repo.create(&entry)
        .map_err(|e| ApiError::internal(format!("Failed to store content: {e}")))?;

    tracing::info!(space = %claims.space, content = %entry.id, "content created");

    Ok((
        StatusCode::CREATED,
        Json(ContentResponse {
            ok: true,
            content: ContentEntry::from(entry),
        }),
    ))
}

/// Update a content entry's text.
#[utoipa::path(
    put,
    path = "/api/spaces/{space_name}/content/{content_id}",
    tag = "Content",
    security(("bearer_auth" = [])),
    params(
        ("space_name" = String, Path, description = "Target space"),
        ("content_id" = String, Path, description = "Content entry to update")
    ),
    request_body = UpdateContentRequest,
    responses(
        (status = 200, description = "Content updated", body = ContentResponse),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid token, wrong space, or not admin"),
        (status = 404, description = "Content not found")
    )
)]
pub async fn update_content(
    AdminAccess(claims): AdminAccess,
    State(state): State<AppState>,
    Path(ContentPath { content_id }): Path<ContentPath>,
    Json(request): Json<UpdateContentRequest>,
) -> Result<Json<ContentResponse>, ApiError> {
    let repo = ContentRepository::new(state.storage());
    let mut entry = repo
        .get(&claims.space, &content_id)
        .map_err(|_| ApiError::not_found("Content not found"))?;

    let text = request.text.unwrap_or_default().trim().to_string();
    validate_text(&text)?;

    entry.text = text;
    entry.updated_at = Utc::now();
    repo.update(&entry)
        .map_err(|e| ApiError::internal(format!("Failed to update content: {e}")))?;

    Ok(Json(ContentResponse {
        ok: true,
        content: ContentEntry::from(entry),
    }))
}

/// Delete a content entry and its uploaded image files.
#[utoipa::path(
    delete,
    path = "/api/spaces/{space_name}/content/{content_id}",
    tag = "Content",
    security(("bearer_auth" = [])),
    params(
        ("space_name" = String, Path, description = "Target space"),
        ("content_id" = String, Path, description = "Content entry to delete")
    ),
    responses(
        (status = 200, description = "Content deleted", body = MessageResponse),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid token, wrong space, or not admin"),
        (status = 404, description = "Content not found")
    )
)]
pub async fn delete_content(
    AdminAccess(claims): AdminAccess,
    State(state): State<AppState>,
    Path(ContentPath { content_id }): Path<ContentPath>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = ContentRepository::new(state.storage());
    let entry = repo
        .delete(&claims.space, &content_id)
        .map_err(|_| ApiError::not_found("Content not found"))?;

    for image in &entry.images {
        unlink_upload(&state, &image.stored_name);
    }

    tracing::info!(space = %claims.space, content = %content_id, "content deleted");

    Ok(Json(MessageResponse {
        ok: true,
        message: "Content deleted".to_string(),
    }))
}

/// Append images to an existing content entry.
#[utoipa::path(
    post,
    path = "/api/spaces/{space_name}/content/{content_id}/images",
    tag = "Content",
    security(("bearer_auth" = [])),
    params(
        ("space_name" = String, Path, description = "Target space"),
        ("content_id" = String, Path, description = "Content entry to extend")
    ),
    responses(
        (status = 200, description = "Images added", body = ContentResponse),
        (status = 400, description = "No images or invalid upload"),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid token, wrong space, or not admin"),
        (status = 404, description = "Content not found")
    )
)]
pub async fn add_images(
    AdminAccess(claims): AdminAccess,
    State(state): State<AppState>,
    Path(ContentPath { content_id }): Path<ContentPath>,
    mut multipart: Multipart,
) -> Result<Json<ContentResponse>, ApiError> {
    let repo = ContentRepository::new(state.storage());
    let mut entry = repo
        .get(&claims.space, &content_id)
        .map_err(|_| ApiError::not_found("Content not found"))?;

    let (_, uploads) = read_multipart(&mut multipart).await?;
    if uploads.is_empty() {
        return Err(ApiError::bad_request("No images uploaded"));
    }

    let mut images = save_images(&state, uploads)?;
    entry.images.append(&mut images);
    entry.updated_at = Utc::now();
    repo.update(&entry)
        .map_err(|e| ApiError::internal(format!("Failed to update content: {e}")))?;

    Ok(Json(ContentResponse {
        ok: true,
        content: ContentEntry::from(entry),
    }))
}

/// Delete a single image from a content entry.
///
/// The name is constrained to a bare file name and must be present in the
/// entry's own image list before anything is unlinked, so the path
/// parameter can never reach files outside the entry's uploads.
#[utoipa::path(
    delete,
    path = "/api/spaces/{space_name}/content/{content_id}/images/{image_name}",
    tag = "Content",
    security(("bearer_auth" = [])),
    params(
        ("space_name" = String, Path, description = "Target space"),
        ("content_id" = String, Path, description = "Content entry"),
        ("image_name" = String, Path, description = "Stored image file name")
    ),
    responses(
        (status = 200, description = "Image deleted", body = MessageResponse),
        (status = 400, description = "Invalid image name"),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid token, wrong space, or not admin"),
        (status = 404, description = "Content or image not found")
    )
)]
pub async fn delete_image(
    AdminAccess(claims): AdminAccess,
    State(state): State<AppState>,
    Path(ImagePath {
        content_id,
        image_name,
    }): Path<ImagePath>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !is_bare_file_name(&image_name) {
        return Err(ApiError::bad_request("Invalid image name"));
    }

    let repo = ContentRepository::new(state.storage());
    let mut entry = repo
        .get(&claims.space, &content_id)
        .map_err(|_| ApiError::not_found("Content not found"))?;

    let position = entry
        .images
        .iter()
        .position(|image| image.stored_name == image_name)
        .ok_or_else(|| ApiError::not_found("Image not found"))?;

    entry.images.remove(position);
    entry.updated_at = Utc::now();
    repo.update(&entry)
        .map_err(|e| ApiError::internal(format!("Failed to update content: {e}")))?;

    unlink_upload(&state, &image_name);

    Ok(Json(MessageResponse {
        ok: true,
        message: "Image deleted".to_string(),
    }))
}
