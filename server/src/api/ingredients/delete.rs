use crate::api::{ErrorResponse, MessageResponse};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::schema::recipez_ingredient;
use crate::security::ensure_owner;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use uuid::Uuid;

use super::load_ingredient;

#[utoipa::path(
    delete,
    path = "/api/ingredients/{id}",
    tag = "ingredients",
    params(
        ("id" = Uuid, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 200, description = "Ingredient deleted", body = MessageResponse),
        (status = 403, description = "Not the ingredient's author", body = ErrorResponse),
        (status = 404, description = "Ingredient not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_ingredient(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut conn = get_conn!(state.pool);

    let ingredient = load_ingredient(&mut conn, id)?;
    ensure_owner(user.user_id, Some(ingredient.ingredient_author_id))?;

    diesel::delete(recipez_ingredient::table.find(id)).execute(&mut conn)?;
    Ok(Json(MessageResponse::new("Ingredient deleted")))
}
