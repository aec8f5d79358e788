use crate::api::{ErrorResponse, MessageResponse};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::schema::{recipez_category, recipez_recipe};
use crate::security::ensure_owner;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "categories",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 403, description = "Category belongs to another user", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Category still has recipes", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_category(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut conn = get_conn!(state.pool);

    let owner: Uuid = recipez_category::table
        .find(id)
        .select(recipez_category::category_author_id)
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;
    ensure_owner(user.user_id, Some(owner))?;

    let in_use: i64 = recipez_recipe::table
        .filter(recipez_recipe::recipe_category_id.eq(id))
        .count()
        .get_result(&mut conn)?;
    if in_use > 0 {
        return Err(ApiError::conflict(format!(
            "Category is still used by {in_use} recipe(s)"
        )));
    }

    diesel::delete(recipez_category::table.find(id)).execute(&mut conn)?;
    Ok(Json(MessageResponse::new("Category deleted")))
}
