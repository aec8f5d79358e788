use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::models::{Ingredient, NewIngredient};
use crate::schema::recipez_ingredient;
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

use super::list::ListIngredientsResponse;
use crate::api::recipes::load_recipe;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IngredientInput {
    pub ingredient_name: String,
    #[serde(default)]
    pub ingredient_quantity: String,
    #[serde(default)]
    pub ingredient_measurement: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateIngredientsRequest {
    pub ingredients: Vec<IngredientInput>,
}

/// Identical entries are stored as separate rows, in request order.
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/ingredients",
    tag = "ingredients",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = CreateIngredientsRequest,
    responses(
        (status = 201, description = "Ingredients added", body = ListIngredientsResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Not the recipe's author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_ingredients(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    Json(req): Json<CreateIngredientsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.ingredients.is_empty() {
        return Err(ApiError::bad_request("ingredients cannot be empty"));
    }
    if req
        .ingredients
        .iter()
        .any(|i| i.ingredient_name.trim().is_empty())
    {
        return Err(ApiError::bad_request("ingredient_name cannot be empty"));
    }

    let mut conn = get_conn!(state.pool);
    let recipe = load_recipe(&mut conn, recipe_id)?;
    ensure_owner(user.user_id, Some(recipe.recipe_author_id))?;

    // One statement per row keeps created_at increasing in request order.
    let ingredients = conn.transaction::<Vec<Ingredient>, ApiError, _>(|conn| {
        let mut created = Vec::with_capacity(req.ingredients.len());
        for input in &req.ingredients {
            let ingredient = diesel::insert_into(recipez_ingredient::table)
                .values(&NewIngredient {
                    ingredient_name: input.ingredient_name.trim(),
                    ingredient_quantity: input.ingredient_quantity.trim(),
                    ingredient_measurement: input.ingredient_measurement.trim(),
                    ingredient_author_id: user.user_id,
                    ingredient_recipe_id: recipe_id,
                })
                .returning(Ingredient::as_returning())
                .get_result(conn)?;
            created.push(ingredient);
        }
        Ok(created)
    })?;

    tracing::info!(%recipe_id, count = ingredients.len(), "ingredients added");
    Ok((
        StatusCode::CREATED,
        Json(ListIngredientsResponse { ingredients }),
    ))
}
