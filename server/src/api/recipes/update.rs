use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::models::{Recipe, RecipeChanges};
use crate::schema::recipez_recipe;
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

use super::{duplicate_name, ensure_category_exists, ensure_usable_image, load_recipe};

/// Fields left out are unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    pub recipe_name: Option<String>,
    pub recipe_description: Option<String>,
    pub recipe_category_id: Option<Uuid>,
    pub recipe_image_id: Option<Uuid>,
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = Recipe),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the recipe's author, or image belongs to another user", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Duplicate recipe name", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRecipeRequest>,
) -> Result<Json<Recipe>, ApiError> {
    let mut conn = get_conn!(state.pool);

    let recipe = load_recipe(&mut conn, id)?;
    ensure_owner(user.user_id, Some(recipe.recipe_author_id))?;

    let name = req.recipe_name.as_deref().map(str::trim);
    if name == Some("") {
        return Err(ApiError::bad_request("recipe_name cannot be empty"));
    }
    if let Some(category) = req.recipe_category_id {
        ensure_category_exists(&mut conn, category)?;
    }
    if let Some(image) = req.recipe_image_id {
        ensure_usable_image(&mut conn, user.user_id, image)?;
    }

    let changes = RecipeChanges {
        recipe_name: name,
        recipe_description: req.recipe_description.as_deref().map(str::trim),
        recipe_category_id: req.recipe_category_id,
        recipe_image_id: req.recipe_image_id,
    };
    if changes.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }

    let updated = diesel::update(recipez_recipe::table.find(id))
        .set(&changes)
        .returning(Recipe::as_returning())
        .get_result(&mut conn)
        .map_err(duplicate_name)?;
    Ok(Json(updated))
}
