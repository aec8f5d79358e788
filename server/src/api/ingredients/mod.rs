pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use crate::error::ApiError;
use crate::models::Ingredient;
use crate::schema::recipez_ingredient;
use crate::AppState;
use axum::routing::{get, put};
use axum::Router;
use diesel::prelude::*;
use utoipa::OpenApi;
use uuid::Uuid;

/// Ingredients are created and listed through their recipe, and edited by id.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/recipes/{id}/ingredients",
            get(list::list_ingredients).post(create::create_ingredients),
        )
        .route(
            "/api/ingredients/{id}",
            put(update::update_ingredient).delete(delete::delete_ingredient),
        )
}

fn load_ingredient(conn: &mut PgConnection, id: Uuid) -> Result<Ingredient, ApiError> {
    recipez_ingredient::table
        .find(id)
        .select(Ingredient::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Ingredient not found"))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_ingredients,
        list::list_ingredients,
        update::update_ingredient,
        delete::delete_ingredient,
    ),
    components(schemas(
        create::IngredientInput,
        create::CreateIngredientsRequest,
        list::ListIngredientsResponse,
        update::UpdateIngredientRequest,
    ))
)]
pub struct ApiDoc;
