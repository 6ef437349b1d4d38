//! Request and response types for the post endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    db::models::posts::PostDBResponse,
    types::{PostId, UserId},
};

/// The author of a post, resolved at read time.
///
/// Absent from a [`PostResponse`] when the author account has been deleted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostAuthor {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub username: String,
}

/// A post as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: PostId,
    pub title: String,
    pub summary: String,
    pub content: String,
    /// Relative path of the cover image under the uploads directory, if any
    pub cover: Option<String>,
    pub author: Option<PostAuthor>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PostDBResponse> for PostResponse {
    fn from(post: PostDBResponse) -> Self {
        let author = post.author_username.map(|username| PostAuthor {
            id: post.author_id,
            username,
        });

        Self {
            id: post.id,
            title: post.title,
            summary: post.summary,
            content: post.content,
            cover: post.cover,
            author,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
