use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::models::{NewStep, Step};
use crate::schema::recipez_step;
use crate::security::ensure_owner;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::list::ListStepsResponse;
use super::step_text;
use crate::api::recipes::load_recipe;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StepInput {
    pub step_text: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateStepsRequest {
    pub steps: Vec<StepInput>,
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/steps",
    tag = "steps",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = CreateStepsRequest,
    responses(
        (status = 201, description = "Steps appended", body = ListStepsResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Not the recipe's author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_steps(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    Json(req): Json<CreateStepsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.steps.is_empty() {
        return Err(ApiError::bad_request("steps cannot be empty"));
    }
    let texts = req
        .steps
        .iter()
        .map(|s| step_text(&s.step_text))
        .collect::<Result<Vec<_>, _>>()?;

    let mut conn = get_conn!(state.pool);
    let recipe = load_recipe(&mut conn, recipe_id)?;
    ensure_owner(user.user_id, Some(recipe.recipe_author_id))?;

    let steps = conn.transaction::<Vec<Step>, ApiError, _>(|conn| {
        let mut created = Vec::with_capacity(texts.len());
        for text in texts.iter().copied() {
            let step = diesel::insert_into(recipez_step::table)
                .values(&NewStep {
                    step_text: text,
                    step_author_id: user.user_id,
                    step_recipe_id: recipe_id,
                })
                .returning(Step::as_returning())
                .get_result(conn)?;
            created.push(step);
        }
        Ok(created)
    })?;

    Ok((StatusCode::CREATED, Json(ListStepsResponse { steps })))
}
