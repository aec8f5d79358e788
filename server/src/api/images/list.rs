use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::models::Image;
use crate::schema::recipez_image;
use crate::AppState;
use axum::{extract::State, Json};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListImagesResponse {
    pub images: Vec<Image>,
}

#[utoipa::path(
    get,
    path = "/api/images",
    tag = "images",
    responses(
        (status = 200, description = "Images uploaded by the requester, newest first", body = ListImagesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_images(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ListImagesResponse>, ApiError> {
    let mut conn = get_conn!(state.pool);
    let images = recipez_image::table
        .filter(recipez_image::image_author_id.eq(user.user_id))
        .order(recipez_image::created_at.desc())
        .select(Image::as_select())
        .load(&mut conn)?;
    Ok(Json(ListImagesResponse { images }))
}
