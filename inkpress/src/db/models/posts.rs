//! Database models for posts.

use crate::types::{PostId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database request for creating a new post
#[derive(Debug, Clone)]
pub struct PostCreateDBRequest {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub cover: Option<String>,
    pub author_id: UserId,
}

/// Database request for updating a post.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct PostUpdateDBRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub cover: Option<String>,
}

/// Database response for a post.
///
/// `author_username` is resolved from the users table at query time and is None
/// when the author account no longer exists.
#[derive(Debug, Clone, FromRow)]
pub struct PostDBResponse {
    pub id: PostId,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub cover: Option<String>,
    pub author_id: UserId,
    pub author_username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
