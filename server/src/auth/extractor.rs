use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::User;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use std::sync::Arc;

use super::db::get_user_from_token;

/// Extractor that validates the Authorization header and provides the authenticated user.
///
/// Use this in any handler that requires authentication:
/// ```ignore
/// async fn my_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
///     // user is the authenticated User
/// }
/// ```
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = Arc::<DbPool>::from_ref(state);

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| ApiError::Unauthenticated("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::Unauthenticated("Invalid Authorization header".into()))?;

        let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthenticated("Invalid Authorization header format".into())
        })?;

        let user = get_user_from_token(&pool, token)
            .await?
            .ok_or_else(|| ApiError::Unauthenticated("Invalid or expired token".into()))?;

        Ok(AuthUser(user))
    }
}
