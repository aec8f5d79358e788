use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::models::Category;
use crate::schema::recipez_category;
use crate::AppState;
use axum::{extract::State, Json};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListCategoriesResponse {
    pub categories: Vec<Category>,
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses(
        (status = 200, description = "All categories by name", body = ListCategoriesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_categories(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ListCategoriesResponse>, ApiError> {
    let mut conn = get_conn!(state.pool);
    let categories = recipez_category::table
        .order(recipez_category::category_name.asc())
        .select(Category::as_select())
        .load(&mut conn)?;
    Ok(Json(ListCategoriesResponse { categories }))
}
