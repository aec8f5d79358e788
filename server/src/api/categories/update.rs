use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::models::Category;
use crate::schema::recipez_category;
use crate::security::ensure_owner;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use uuid::Uuid;

use super::create::{duplicate_name, CategoryRequest};

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "categories",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category renamed", body = Category),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Category belongs to another user", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_category(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    let name = req.name()?;
    let mut conn = get_conn!(state.pool);

    let owner: Uuid = recipez_category::table
        .find(id)
        .select(recipez_category::category_author_id)
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;
    ensure_owner(user.user_id, Some(owner))?;

    let category = diesel::update(recipez_category::table.find(id))
        .set(recipez_category::category_name.eq(name))
        .returning(Category::as_returning())
        .get_result(&mut conn)
        .map_err(duplicate_name)?;
    Ok(Json(category))
}
