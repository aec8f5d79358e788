use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::models::{Ingredient, IngredientChanges};
use crate::schema::recipez_ingredient;
use crate::security::ensure_owner;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::load_ingredient;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateIngredientRequest {
    pub ingredient_name: Option<String>,
    pub ingredient_quantity: Option<String>,
    pub ingredient_measurement: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/ingredients/{id}",
    tag = "ingredients",
    params(
        ("id" = Uuid, Path, description = "Ingredient ID")
    ),
    request_body = UpdateIngredientRequest,
    responses(
        (status = 200, description = "Ingredient updated", body = Ingredient),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Not the ingredient's author", body = ErrorResponse),
        (status = 404, description = "Ingredient not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_ingredient(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateIngredientRequest>,
) -> Result<Json<Ingredient>, ApiError> {
    let mut conn = get_conn!(state.pool);

    let ingredient = load_ingredient(&mut conn, id)?;
    ensure_owner(user.user_id, Some(ingredient.ingredient_author_id))?;

    let changes = IngredientChanges {
        ingredient_name: req.ingredient_name.as_deref().map(str::trim),
        ingredient_quantity: req.ingredient_quantity.as_deref().map(str::trim),
        ingredient_measurement: req.ingredient_measurement.as_deref().map(str::trim),
    };
    if changes.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }
    if changes.ingredient_name == Some("") {
        return Err(ApiError::bad_request("ingredient_name cannot be empty"));
    }

    let updated = diesel::update(recipez_ingredient::table.find(id))
        .set(&changes)
        .returning(Ingredient::as_returning())
        .get_result(&mut conn)?;
    Ok(Json(updated))
}
