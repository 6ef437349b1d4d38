//! Ownership checks for post mutations.

use crate::{api::models::auth::CurrentUser, errors::Error, types::UserId};

/// Check that the authenticated user is the author of a post.
///
/// Returns 403 when the user is not the author. Only authors may edit their posts.
pub fn ensure_author(author_id: UserId, user: &CurrentUser) -> Result<(), Error> {
    if author_id == user.id {
        Ok(())
    } else {
        Err(Error::NotTheAuthor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user_with_id(id: UserId) -> CurrentUser {
        CurrentUser {
            id,
            username: "someone".to_string(),
        }
    }

    #[test]
    fn test_author_allowed() {
        let id = Uuid::new_v4();
        assert!(ensure_author(id, &user_with_id(id)).is_ok());
    }

    #[test]
    fn test_non_author_forbidden() {
        let result = ensure_author(Uuid::new_v4(), &user_with_id(Uuid::new_v4()));
        let err = result.unwrap_err();
        assert!(matches!(err, Error::NotTheAuthor));
        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
    }
}
