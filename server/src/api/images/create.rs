use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::models::{Image, NewImage};
use crate::schema::recipez_image;
use crate::security::validate_upload_filename;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use diesel::prelude::*;
use serde::Deserialize;
use std::path::Path;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateImageRequest {
    /// Client-side path or name; only its extension is kept
    pub image_path: String,
    /// Base64-encoded file contents
    pub image_data: String,
}

#[utoipa::path(
    post,
    path = "/api/images",
    tag = "images",
    request_body = CreateImageRequest,
    responses(
        (status = 201, description = "Image stored", body = Image),
        (status = 400, description = "Bad file name, extension or data", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_image(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateImageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let file_name = Path::new(&req.image_path)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ApiError::bad_request("Invalid filename"))?;
    let extension =
        validate_upload_filename(file_name).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let bytes = STANDARD
        .decode(req.image_data.trim())
        .map_err(|_| ApiError::bad_request("image_data is not valid base64"))?;
    if bytes.is_empty() {
        return Err(ApiError::bad_request("image_data is empty"));
    }

    let uploads = state.config.uploads_dir();
    tokio::fs::create_dir_all(&uploads)
        .await
        .map_err(|e| ApiError::internal(format!("failed to create {}: {e}", uploads.display())))?;
    // The client's name only supplies the extension.
    let stored_name = format!("{}.{extension}", Uuid::new_v4());
    let target = uploads.join(&stored_name);
    tokio::fs::write(&target, &bytes)
        .await
        .map_err(|e| ApiError::internal(format!("failed to write {}: {e}", target.display())))?;

    let image_url = format!("/static/uploads/{stored_name}");
    let mut conn = get_conn!(state.pool);
    let image: Image = diesel::insert_into(recipez_image::table)
        .values(&NewImage {
            image_url: &image_url,
            image_author_id: user.user_id,
        })
        .returning(Image::as_returning())
        .get_result(&mut conn)?;

    tracing::info!(image_id = %image.image_id, url = %image.image_url, size = bytes.len(), "image stored");
    Ok((StatusCode::CREATED, Json(image)))
}
