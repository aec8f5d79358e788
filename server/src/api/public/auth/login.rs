use crate::api::ErrorResponse;
use crate::auth::{create_session, delete_expired_sessions, verify_password};
use crate::error::ApiError;
use crate::get_conn;
use crate::models::User;
use crate::schema::recipez_user;
use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthenticated("Invalid credentials".to_string())
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"user_name": "cook", "password": "a long password"})),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn!(state.pool);

    let user: User = recipez_user::table
        .filter(recipez_user::user_name.eq(req.user_name.trim()))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or_else(invalid_credentials)?;

    if !verify_password(&req.password, &user.user_password_hash) {
        tracing::info!(user_id = %user.user_id, "login rejected: wrong password");
        return Err(invalid_credentials());
    }

    match delete_expired_sessions(&mut conn) {
        Ok(0) => {}
        Ok(purged) => tracing::debug!(purged, "purged expired sessions"),
        Err(e) => tracing::warn!(error = %e, "failed to purge expired sessions"),
    }

    let token = create_session(&mut conn, user.user_id, state.config.session_ttl)?;
    Ok(Json(LoginResponse { token }))
}
