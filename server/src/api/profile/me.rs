use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::DEFAULT_USER_IMAGE_URL;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: Option<String>,
    pub profile_image_url: String,
}

#[utoipa::path(
    get,
    path = "/api/profile/me",
    tag = "profile",
    responses(
        (status = 200, description = "The authenticated user's profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        user_id: user.user_id,
        user_name: user.user_name,
        user_email: user.user_email,
        profile_image_url: user
            .user_profile_image_url
            .unwrap_or_else(|| DEFAULT_USER_IMAGE_URL.to_string()),
    })
}
