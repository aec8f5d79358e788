use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::models::Step;
use crate::schema::recipez_step;
use crate::security::ensure_owner;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use uuid::Uuid;

use super::create::StepInput;
use super::{load_step, step_text};

#[utoipa::path(
    put,
    path = "/api/steps/{id}",
    tag = "steps",
    params(
        ("id" = Uuid, Path, description = "Step ID")
    ),
    request_body = StepInput,
    responses(
        (status = 200, description = "Step updated", body = Step),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Not the step's author", body = ErrorResponse),
        (status = 404, description = "Step not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_step(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StepInput>,
) -> Result<Json<Step>, ApiError> {
    let text = step_text(&req.step_text)?;
    let mut conn = get_conn!(state.pool);

    let step = load_step(&mut conn, id)?;
    ensure_owner(user.user_id, Some(step.step_author_id))?;

    let updated = diesel::update(recipez_step::table.find(id))
        .set(recipez_step::step_text.eq(text))
        .returning(Step::as_returning())
        .get_result(&mut conn)?;
    Ok(Json(updated))
}
