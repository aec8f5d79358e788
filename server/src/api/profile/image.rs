use crate::api::{ErrorResponse, MessageResponse};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::schema::recipez_user;
use crate::security::ensure_owner;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateProfileImageRequest {
    /// Site-relative path under `/static/img/` or `/static/uploads/`
    #[serde(default)]
    #[schema(value_type = String, example = "/static/uploads/me.png")]
    pub image_url: serde_json::Value,
    /// Profile to update; defaults to the requester's own
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// Checks run in order: rate limit, ownership of the target profile, then the
/// URL itself. A body that fails to parse is treated as an invalid URL.
#[utoipa::path(
    put,
    path = "/api/profile/image",
    tag = "profile",
    request_body = UpdateProfileImageRequest,
    responses(
        (status = 200, description = "Profile image updated", body = MessageResponse),
        (status = 400, description = "Missing or unsafe image URL", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Target profile is not the requester's", body = ErrorResponse),
        (status = 429, description = "Too many profile updates", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile_image(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    body: Result<Json<UpdateProfileImageRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.profile_limiter.check(&user.user_id.to_string())?;

    let (image_url, target) = match body {
        Ok(Json(req)) => (req.image_url, req.user_id.unwrap_or(user.user_id)),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable profile image body");
            (serde_json::Value::Null, user.user_id)
        }
    };

    let mut conn = get_conn!(state.pool);

    let owner: Option<Uuid> = recipez_user::table
        .find(target)
        .select(recipez_user::user_id)
        .first(&mut conn)
        .optional()?;
    ensure_owner(user.user_id, owner)?;

    let image_url = match image_url.as_str() {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => return Err(ApiError::bad_request("Invalid image url")),
    };

    if let Err(rejection) = state.image_policy.validate(&image_url) {
        let preview: String = image_url.chars().take(100).collect();
        tracing::warn!(user_id = %user.user_id, url = %preview, reason = %rejection, "rejected unsafe image url");
        return Err(ApiError::bad_request(format!(
            "Invalid or unsafe image URL: {rejection}"
        )));
    }

    let updated = diesel::update(recipez_user::table.find(target))
        .set(recipez_user::user_profile_image_url.eq(&image_url))
        .execute(&mut conn)?;
    if updated == 0 {
        return Err(ApiError::not_found("User not found"));
    }

    tracing::info!(user_id = %target, "profile image updated");
    Ok(Json(MessageResponse::new("Profile image updated")))
}
