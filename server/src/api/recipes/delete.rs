use crate::api::{ErrorResponse, MessageResponse};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::schema::recipez_recipe;
use crate::security::ensure_owner;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use uuid::Uuid;

use super::load_recipe;

/// Ingredients and steps go with the recipe; its image stays.
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the recipe's author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut conn = get_conn!(state.pool);

    let recipe = load_recipe(&mut conn, id)?;
    ensure_owner(user.user_id, Some(recipe.recipe_author_id))?;

    diesel::delete(recipez_recipe::table.find(id)).execute(&mut conn)?;
    tracing::info!(recipe_id = %id, "recipe deleted");
    Ok(Json(MessageResponse::new("Recipe deleted")))
}
