use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::models::Step;
use crate::schema::recipez_step;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::recipes::load_recipe;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListStepsResponse {
    pub steps: Vec<Step>,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/steps",
    tag = "steps",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Steps in order", body = ListStepsResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_steps(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> Result<Json<ListStepsResponse>, ApiError> {
    let mut conn = get_conn!(state.pool);
    load_recipe(&mut conn, recipe_id)?;

    let steps = recipez_step::table
        .filter(recipez_step::step_recipe_id.eq(recipe_id))
        .order((recipez_step::created_at.asc(), recipez_step::step_id.asc()))
        .select(Step::as_select())
        .load(&mut conn)?;
    Ok(Json(ListStepsResponse { steps }))
}
