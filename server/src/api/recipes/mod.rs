pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use crate::error::ApiError;
use crate::migrations::DEFAULT_RECIPE_IMAGE_URL;
use crate::models::{NewImage, Recipe};
use crate::schema::{recipez_category, recipez_image, recipez_recipe};
use crate::security::ensure_owner;
use crate::AppState;
use axum::routing::get;
use axum::Router;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use utoipa::OpenApi;
use uuid::Uuid;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route(
            "/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
}

pub(crate) fn load_recipe(conn: &mut PgConnection, id: Uuid) -> Result<Recipe, ApiError> {
    recipez_recipe::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Recipe not found"))
}

/// The shared placeholder image, created on first use.
pub(crate) fn default_recipe_image_id(conn: &mut PgConnection, author: Uuid) -> QueryResult<Uuid> {
    let existing = recipez_image::table
        .filter(recipez_image::image_url.eq(DEFAULT_RECIPE_IMAGE_URL))
        .order((recipez_image::created_at.asc(), recipez_image::image_id.asc()))
        .select(recipez_image::image_id)
        .first(conn)
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }

    tracing::info!(%author, "creating default recipe image");
    diesel::insert_into(recipez_image::table)
        .values(&NewImage {
            image_url: DEFAULT_RECIPE_IMAGE_URL,
            image_author_id: author,
        })
        .returning(recipez_image::image_id)
        .get_result(conn)
}

fn ensure_category_exists(conn: &mut PgConnection, id: Uuid) -> Result<(), ApiError> {
    let found: Option<Uuid> = recipez_category::table
        .find(id)
        .select(recipez_category::category_id)
        .first(conn)
        .optional()?;
    found
        .map(|_| ())
        .ok_or_else(|| ApiError::bad_request("recipe_category_id does not name a category"))
}

/// A recipe may show the shared default image or one of the author's own.
fn ensure_usable_image(conn: &mut PgConnection, author: Uuid, id: Uuid) -> Result<(), ApiError> {
    let (image_url, owner): (String, Uuid) = recipez_image::table
        .find(id)
        .select((recipez_image::image_url, recipez_image::image_author_id))
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::bad_request("recipe_image_id does not name an image"))?;
    if image_url == DEFAULT_RECIPE_IMAGE_URL {
        return Ok(());
    }
    ensure_owner(author, Some(owner))
}

fn duplicate_name(err: DieselError) -> ApiError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ApiError::conflict("You already have a recipe with that name")
        }
        other => other.into(),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
    ),
    components(schemas(
        create::CreateRecipeRequest,
        list::ListRecipesResponse,
        get::RecipeDetail,
        update::UpdateRecipeRequest,
    ))
)]
pub struct ApiDoc;
