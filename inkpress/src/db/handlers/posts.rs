//! Database repository for posts.

use crate::types::{PostId, abbrev_uuid};
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::posts::{PostCreateDBRequest, PostDBResponse, PostUpdateDBRequest},
};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing posts
#[derive(Debug, Clone)]
pub struct PostFilter {
    pub skip: i64,
    pub limit: i64,
}

impl PostFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

impl Default for PostFilter {
    /// Newest 20 posts, matching the public feed
    fn default() -> Self {
        Self { skip: 0, limit: 20 }
    }
}

pub struct Posts<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Posts<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

// The author username is resolved with a LEFT JOIN so posts survive author deletion.
const POST_COLUMNS: &str = r#"
    p.id, p.title, p.summary, p.content, p.cover, p.author_id,
    u.username AS author_username,
    p.created_at, p.updated_at
"#;

#[async_trait::async_trait]
impl<'c> Repository for Posts<'c> {
    type CreateRequest = PostCreateDBRequest;
    type UpdateRequest = PostUpdateDBRequest;
    type Response = PostDBResponse;
    type Id = PostId;
    type Filter = PostFilter;

    #[instrument(skip(self, request), fields(title = %request.title, author_id = %abbrev_uuid(&request.author_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        // Always generate a new ID for posts
        let post_id = Uuid::new_v4();

        let post = sqlx::query_as::<_, PostDBResponse>(&format!(
            r#"
            WITH inserted AS (
                INSERT INTO posts (id, title, summary, content, cover, author_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            SELECT {POST_COLUMNS}
            FROM inserted p
            LEFT JOIN users u ON u.id = p.author_id
            "#
        ))
        .bind(post_id)
        .bind(&request.title)
        .bind(&request.summary)
        .bind(&request.content)
        .bind(&request.cover)
        .bind(request.author_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(post)
    }

    #[instrument(skip(self), fields(post_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let post = sqlx::query_as::<_, PostDBResponse>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p
            LEFT JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(post)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        // Newest first, with id as a tiebreaker for a stable ordering
        let posts = sqlx::query_as::<_, PostDBResponse>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p
            LEFT JOIN users u ON u.id = p.author_id
            ORDER BY p.created_at DESC, p.id
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(posts)
    }

    #[instrument(skip(self, request), fields(post_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        // Atomic update with conditional field updates. A None cover keeps the existing one.
        let post = sqlx::query_as::<_, PostDBResponse>(&format!(
            r#"
            WITH updated AS (
                UPDATE posts SET
                    title = COALESCE($2, title),
                    summary = COALESCE($3, summary),
                    content = COALESCE($4, content),
                    cover = COALESCE($5, cover),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT {POST_COLUMNS}
            FROM updated p
            LEFT JOIN users u ON u.id = p.author_id
            "#
        ))
        .bind(id)
        .bind(&request.title)
        .bind(&request.summary)
        .bind(&request.content)
        .bind(&request.cover)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::super::repository::Repository;
    use super::*;
    use crate::db::{handlers::users::Users, models::users::UserCreateDBRequest};
    use sqlx::PgPool;

    async fn seed_author(pool: &PgPool, username: &str) -> crate::types::UserId {
        let mut conn = pool.acquire().await.unwrap();
        let mut users = Users::new(&mut conn);
        users
            .create(&UserCreateDBRequest {
                username: username.to_string(),
                password_hash: "$argon2id$fakehash".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    fn post_request(author_id: crate::types::UserId, title: &str) -> PostCreateDBRequest {
        PostCreateDBRequest {
            title: title.to_string(),
            summary: "A short summary".to_string(),
            content: "<p>Body</p>".to_string(),
            cover: Some("uploads/cover.jpg".to_string()),
            author_id,
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_get_post(pool: PgPool) {
        let author_id = seed_author(&pool, "author").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Posts::new(&mut conn);

        let created = repo.create(&post_request(author_id, "Hello")).await.unwrap();
        assert_eq!(created.title, "Hello");
        assert_eq!(created.author_id, author_id);
        assert_eq!(created.author_username.as_deref(), Some("author"));

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.cover.as_deref(), Some("uploads/cover.jpg"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_missing_post(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Posts::new(&mut conn);

        let missing = repo.get_by_id(Uuid::new_v4()).await.unwrap();
        assert!(missing.is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_newest_first_with_limit(pool: PgPool) {
        let author_id = seed_author(&pool, "prolific").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Posts::new(&mut conn);

        for i in 0..25 {
            repo.create(&post_request(author_id, &format!("Post {i}"))).await.unwrap();
        }

        let posts = repo.list(&PostFilter::default()).await.unwrap();
        assert_eq!(posts.len(), 20);

        // Newest first
        for pair in posts.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_patches_only_provided_fields(pool: PgPool) {
        let author_id = seed_author(&pool, "editor").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Posts::new(&mut conn);

        let created = repo.create(&post_request(author_id, "Before")).await.unwrap();

        let updated = repo
            .update(
                created.id,
                &PostUpdateDBRequest {
                    title: Some("After".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "After");
        assert_eq!(updated.summary, created.summary);
        assert_eq!(updated.content, created.content);
        // Cover is retained when no replacement is provided
        assert_eq!(updated.cover, created.cover);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_missing_post(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Posts::new(&mut conn);

        let err = repo
            .update(
                Uuid::new_v4(),
                &PostUpdateDBRequest {
                    title: Some("Ghost".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_author_username_null_after_author_deleted(pool: PgPool) {
        let author_id = seed_author(&pool, "ghostwriter").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Posts::new(&mut conn);
        let created = repo.create(&post_request(author_id, "Orphaned")).await.unwrap();
        drop(repo);

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(author_id)
            .execute(&mut *conn)
            .await
            .unwrap();

        let mut repo = Posts::new(&mut conn);
        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.author_username, None);
    }
}
