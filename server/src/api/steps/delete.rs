use crate::api::{ErrorResponse, MessageResponse};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::schema::recipez_step;
use crate::security::ensure_owner;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use uuid::Uuid;

use super::load_step;

#[utoipa::path(
    delete,
    path = "/api/steps/{id}",
    tag = "steps",
    params(
        ("id" = Uuid, Path, description = "Step ID")
    ),
    responses(
        (status = 200, description = "Step deleted", body = MessageResponse),
        (status = 403, description = "Not the step's author", body = ErrorResponse),
        (status = 404, description = "Step not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_step(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut conn = get_conn!(state.pool);

    let step = load_step(&mut conn, id)?;
    ensure_owner(user.user_id, Some(step.step_author_id))?;

    diesel::delete(recipez_step::table.find(id)).execute(&mut conn)?;
    Ok(Json(MessageResponse::new("Step deleted")))
}
