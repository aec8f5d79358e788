use crate::api::ErrorResponse;
use crate::auth::{create_session, hash_password};
use crate::error::ApiError;
use crate::get_conn;
use crate::models::NewUser;
use crate::schema::recipez_user;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub user_name: String,
    pub password: String,
    pub user_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignupResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body(content = SignupRequest, example = json!({"user_name": "cook", "password": "a long password"})),
    responses(
        (status = 201, description = "User created successfully", body = SignupResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "User name or email already exists", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_name = req.user_name.trim();
    if user_name.is_empty() {
        return Err(ApiError::bad_request("user_name cannot be empty"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    let user_email = req
        .user_email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::internal(format!("failed to hash password: {e}")))?;

    let mut conn = get_conn!(state.pool);
    let session_ttl = state.config.session_ttl;

    let created = conn.transaction::<_, DieselError, _>(|conn| {
        let user_id: Uuid = diesel::insert_into(recipez_user::table)
            .values(&NewUser {
                user_name,
                user_email,
                user_password_hash: &password_hash,
                user_profile_image_url: None,
            })
            .returning(recipez_user::user_id)
            .get_result(conn)?;
        let token = create_session(conn, user_id, session_ttl)?;
        Ok((user_id, token))
    });

    let (user_id, token) = match created {
        Ok(created) => created,
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return Err(ApiError::conflict("User name or email already exists"))
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(%user_id, "user signed up");
    Ok((StatusCode::CREATED, Json(SignupResponse { user_id, token })))
}
