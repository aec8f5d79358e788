use crate::api::{ErrorResponse, MessageResponse};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::get_conn;
use crate::models::Image;
use crate::schema::{recipez_image, recipez_recipe};
use crate::security::ensure_owner;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use diesel::prelude::*;
use std::path::PathBuf;
use uuid::Uuid;

use super::PROTECTED_IMAGE_FILES;

/// File backing an uploaded image, if this record owns one that may be
/// removed. Shared placeholders and non-upload URLs map to `None`.
pub fn removable_upload(uploads_dir: &std::path::Path, image_url: &str) -> Option<PathBuf> {
    let name = image_url.strip_prefix("/static/uploads/")?;
    if name.is_empty() || name.contains('/') || name.contains("..") {
        return None;
    }
    if PROTECTED_IMAGE_FILES.contains(&name) {
        return None;
    }
    Some(uploads_dir.join(name))
}

#[utoipa::path(
    delete,
    path = "/api/images/{id}",
    tag = "images",
    params(
        ("id" = Uuid, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Image belongs to another user", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse),
        (status = 409, description = "Image is still used by a recipe", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_image(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut conn = get_conn!(state.pool);

    let image: Image = recipez_image::table
        .find(id)
        .select(Image::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Image not found"))?;
    ensure_owner(user.user_id, Some(image.image_author_id))?;

    let references: i64 = recipez_recipe::table
        .filter(recipez_recipe::recipe_image_id.eq(id))
        .count()
        .get_result(&mut conn)?;
    if references > 0 {
        return Err(ApiError::conflict(format!(
            "Image is still used by {references} recipe(s)"
        )));
    }

    diesel::delete(recipez_image::table.find(id)).execute(&mut conn)?;

    if let Some(path) = removable_upload(&state.config.uploads_dir(), &image.image_url) {
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "removed image file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove image file"),
        }
    }

    tracing::info!(image_id = %id, "image deleted");
    Ok(Json(MessageResponse::new("Image deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_upload_files_are_removable() {
        assert_eq!(
            removable_upload(Path::new("static/uploads"), "/static/uploads/pie.png"),
            Some(PathBuf::from("static/uploads/pie.png"))
        );
    }

    #[test]
    fn test_placeholders_are_kept() {
        let uploads = Path::new("static/uploads");
        assert_eq!(removable_upload(uploads, "/static/uploads/default_recipe.png"), None);
        assert_eq!(removable_upload(uploads, "/static/uploads/default_user.png"), None);
        assert_eq!(removable_upload(uploads, "/static/img/default_recipe.png"), None);
    }

    #[test]
    fn test_unexpected_urls_are_kept() {
        let uploads = Path::new("static/uploads");
        assert_eq!(removable_upload(uploads, "/static/uploads/../app.db"), None);
        assert_eq!(removable_upload(uploads, "/static/uploads/a/b.png"), None);
        assert_eq!(removable_upload(uploads, "https://cdn.example/x.png"), None);
    }
}
