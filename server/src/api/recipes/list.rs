use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::models::Recipe;
use crate::schema::recipez_recipe;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Only recipes by this author
    pub author_id: Option<Uuid>,
    /// Only recipes in this category
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<Recipe>,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Recipes, newest first", body = ListRecipesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_recipes(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListRecipesParams>,
) -> Result<Json<ListRecipesResponse>, ApiError> {
    let mut conn = get_conn!(state.pool);

    let mut query = recipez_recipe::table
        .select(Recipe::as_select())
        .order(recipez_recipe::created_at.desc())
        .into_boxed();
    if let Some(author) = params.author_id {
        query = query.filter(recipez_recipe::recipe_author_id.eq(author));
    }
    if let Some(category) = params.category_id {
        query = query.filter(recipez_recipe::recipe_category_id.eq(category));
    }

    let recipes = query.load(&mut conn)?;
    Ok(Json(ListRecipesResponse { recipes }))
}
