use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::models::{Category, NewCategory};
use crate::schema::recipez_category;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CategoryRequest {
    pub category_name: String,
}

impl CategoryRequest {
    pub(super) fn name(&self) -> Result<&str, ApiError> {
        let name = self.category_name.trim();
        if name.is_empty() {
            return Err(ApiError::bad_request("category_name cannot be empty"));
        }
        Ok(name)
    }
}

pub(super) fn duplicate_name(err: DieselError) -> ApiError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ApiError::conflict("Category already exists")
        }
        other => other.into(),
    }
}

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Category already exists", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_category(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name()?;
    let mut conn = get_conn!(state.pool);

    let category: Category = diesel::insert_into(recipez_category::table)
        .values(&NewCategory {
            category_name: name,
            category_author_id: user.user_id,
        })
        .returning(Category::as_returning())
        .get_result(&mut conn)
        .map_err(duplicate_name)?;

    Ok((StatusCode::CREATED, Json(category)))
}
