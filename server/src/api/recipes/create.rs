use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::models::{NewRecipe, Recipe};
use crate::schema::recipez_recipe;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{default_recipe_image_id, duplicate_name, ensure_category_exists, ensure_usable_image};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub recipe_name: String,
    #[serde(default)]
    pub recipe_description: String,
    pub recipe_category_id: Uuid,
    /// One of the author's images; omit to use the shared default recipe image
    pub recipe_image_id: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = Recipe),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Image belongs to another user", body = ErrorResponse),
        (status = 409, description = "Duplicate recipe name", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.recipe_name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("recipe_name cannot be empty"));
    }

    let mut conn = get_conn!(state.pool);
    ensure_category_exists(&mut conn, req.recipe_category_id)?;

    let recipe = conn.transaction::<Recipe, ApiError, _>(|conn| {
        let image_id = match req.recipe_image_id {
            Some(id) => {
                ensure_usable_image(conn, user.user_id, id)?;
                id
            }
            None => default_recipe_image_id(conn, user.user_id)?,
        };

        diesel::insert_into(recipez_recipe::table)
            .values(&NewRecipe {
                recipe_name: name,
                recipe_description: req.recipe_description.trim(),
                recipe_category_id: req.recipe_category_id,
                recipe_image_id: image_id,
                recipe_author_id: user.user_id,
            })
            .returning(Recipe::as_returning())
            .get_result(conn)
            .map_err(duplicate_name)
    })?;

    tracing::info!(recipe_id = %recipe.recipe_id, "recipe created");
    Ok((StatusCode::CREATED, Json(recipe)))
}
