use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::models::{Category, Image, Ingredient, Recipe, Step};
use crate::schema::{recipez_category, recipez_image, recipez_ingredient, recipez_step};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::load_recipe;

/// A recipe with everything needed to render it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub image: Image,
    pub category: Category,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeDetail),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_recipe(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeDetail>, ApiError> {
    let mut conn = get_conn!(state.pool);

    let recipe = load_recipe(&mut conn, id)?;
    let image = recipez_image::table
        .find(recipe.recipe_image_id)
        .select(Image::as_select())
        .first(&mut conn)?;
    let category = recipez_category::table
        .find(recipe.recipe_category_id)
        .select(Category::as_select())
        .first(&mut conn)?;
    let ingredients = recipez_ingredient::table
        .filter(recipez_ingredient::ingredient_recipe_id.eq(id))
        .order((
            recipez_ingredient::created_at.asc(),
            recipez_ingredient::ingredient_id.asc(),
        ))
        .select(Ingredient::as_select())
        .load(&mut conn)?;
    let steps = recipez_step::table
        .filter(recipez_step::step_recipe_id.eq(id))
        .order((recipez_step::created_at.asc(), recipez_step::step_id.asc()))
        .select(Step::as_select())
        .load(&mut conn)?;

    Ok(Json(RecipeDetail {
        recipe,
        image,
        category,
        ingredients,
        steps,
    }))
}
