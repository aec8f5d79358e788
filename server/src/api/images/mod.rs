pub mod create;
pub mod delete;
pub mod get;
pub mod list;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Shared placeholder files that deleting an image record never removes.
pub const PROTECTED_IMAGE_FILES: &[&str] = &["default_recipe.png", "default_user.png"];

/// Returns the router for /api/images endpoints (mounted at /api/images)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_images).post(create::create_image))
        .route("/{id}", get(get::get_image).delete(delete::delete_image))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_image,
        list::list_images,
        get::get_image,
        delete::delete_image,
    ),
    components(schemas(create::CreateImageRequest, list::ListImagesResponse))
)]
pub struct ApiDoc;
