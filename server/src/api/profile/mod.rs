pub mod image;
pub mod me;

use crate::AppState;
use axum::routing::{get, put};
use axum::Router;
use utoipa::OpenApi;

/// Shown for users who never picked a profile image.
pub const DEFAULT_USER_IMAGE_URL: &str = "/static/img/default_user.png";

/// Returns the router for /api/profile endpoints (mounted at /api/profile)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me::get_me))
        .route("/image", put(image::update_profile_image))
}

#[derive(OpenApi)]
#[openapi(
    paths(me::get_me, image::update_profile_image),
    components(schemas(me::ProfileResponse, image::UpdateProfileImageRequest))
)]
pub struct ApiDoc;
