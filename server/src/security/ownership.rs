use crate::error::ApiError;
use uuid::Uuid;

/// Allow a mutation only when the requester owns the target. A target whose
/// owner cannot be resolved is treated the same as someone else's.
pub fn ensure_owner(requester: Uuid, owner: Option<Uuid>) -> Result<(), ApiError> {
    match owner {
        Some(owner) if owner == requester => Ok(()),
        Some(owner) => {
            tracing::warn!(%requester, %owner, "rejected mutation of another user's resource");
            Err(ApiError::Forbidden)
        }
        None => {
            tracing::warn!(%requester, "rejected mutation of a resource with no owner");
            Err(ApiError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_owner_is_allowed() {
        let id = Uuid::new_v4();
        assert!(ensure_owner(id, Some(id)).is_ok());
    }

    #[test]
    fn test_other_user_is_forbidden() {
        let err = ensure_owner(Uuid::new_v4(), Some(Uuid::new_v4())).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_missing_owner_is_forbidden() {
        let err = ensure_owner(Uuid::new_v4(), None).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }
}
