use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::models::Ingredient;
use crate::schema::recipez_ingredient;
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
pub struct ListIngredientsResponse {
    pub ingredients: Vec<Ingredient>,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/ingredients",
    tag = "ingredients",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Ingredients in insertion order", body = ListIngredientsResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_ingredients(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> Result<Json<ListIngredientsResponse>, ApiError> {
    let mut conn = get_conn!(state.pool);
    load_recipe(&mut conn, recipe_id)?;

    let ingredients = recipez_ingredient::table
        .filter(recipez_ingredient::ingredient_recipe_id.eq(recipe_id))
        .order((
            recipez_ingredient::created_at.asc(),
            recipez_ingredient::ingredient_id.asc(),
        ))
        .select(Ingredient::as_select())
        .load(&mut conn)?;
    Ok(Json(ListIngredientsResponse { ingredients }))
}
