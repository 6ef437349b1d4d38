use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use uuid::Uuid;

use crate::{
    AppState,
    api::models::{auth::CurrentUser, posts::PostResponse},
    auth::ownership::ensure_author,
    db::{
        handlers::{Posts, Repository, posts::PostFilter},
        models::posts::{PostCreateDBRequest, PostUpdateDBRequest},
    },
    errors::{Error, Result},
    uploads::AssetStore,
};

/// Fields extracted from a post create/update multipart form.
#[derive(Debug, Default)]
struct PostForm {
    id: Option<String>,
    title: Option<String>,
    summary: Option<String>,
    content: Option<String>,
    /// Original filename and raw bytes of the uploaded cover, if provided
    file: Option<(Option<String>, Vec<u8>)>,
}

impl PostForm {
    /// Drain a multipart stream into the known form fields. Unknown fields are ignored.
    async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
            message: format!("Failed to parse multipart data: {e}"),
        })? {
            let field_name = field.name().unwrap_or("").to_string();

            match field_name.as_str() {
                "file" => {
                    let filename = field.file_name().map(|s| s.to_string());
                    let content = field.bytes().await.map_err(|e| Error::BadRequest {
                        message: format!("Failed to read uploaded file: {e}"),
                    })?;
                    form.file = Some((filename, content.to_vec()));
                }
                "id" | "title" | "summary" | "content" => {
                    let value = field.text().await.map_err(|e| Error::BadRequest {
                        message: format!("Failed to read field '{field_name}': {e}"),
                    })?;
                    match field_name.as_str() {
                        "id" => form.id = Some(value),
                        "title" => form.title = Some(value),
                        "summary" => form.summary = Some(value),
                        "content" => form.content = Some(value),
                        _ => unreachable!(),
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// A required text field, rejecting missing or blank values.
    fn require(&self, name: &str) -> Result<String> {
        let value = match name {
            "title" => &self.title,
            "summary" => &self.summary,
            "content" => &self.content,
            _ => &None,
        };
        match value {
            Some(v) if !v.trim().is_empty() => Ok(v.clone()),
            _ => Err(Error::BadRequest {
                message: format!("Missing required field '{name}'"),
            }),
        }
    }
}

/// Store the uploaded cover image, if one was included in the form.
async fn store_cover(state: &AppState, form: &PostForm) -> Result<Option<String>> {
    match &form.file {
        Some((filename, content)) => {
            let store = AssetStore::new(state.config.uploads.dir.clone());
            let path = store.store(filename.as_deref(), content).await?;
            Ok(Some(path))
        }
        None => Ok(None),
    }
}

/// Create a new post
#[utoipa::path(
    post,
    path = "/post",
    tag = "posts",
    request_body(
        content_type = "multipart/form-data",
        description = "Post fields (title, summary, content) with optional cover image file"
    ),
    responses(
        (status = 200, description = "Post created", body = PostResponse),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "No session cookie"),
        (status = 403, description = "Invalid or expired session"),
    ),
    security(
        ("session_token" = [])
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn create_post(
    State(state): State<AppState>,
    current_user: CurrentUser,
    multipart: Multipart,
) -> Result<Json<PostResponse>> {
    let form = PostForm::from_multipart(multipart).await?;

    let title = form.require("title")?;
    let summary = form.require("summary")?;
    let content = form.require("content")?;
    let cover = store_cover(&state, &form).await?;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut posts_repo = Posts::new(&mut pool_conn);

    let post = posts_repo
        .create(&PostCreateDBRequest {
            title,
            summary,
            content,
            cover,
            author_id: current_user.id,
        })
        .await?;

    Ok(Json(PostResponse::from(post)))
}

/// List the most recent posts
#[utoipa::path(
    get,
    path = "/post",
    tag = "posts",
    responses(
        (status = 200, description = "Newest posts, most recent first", body = [PostResponse]),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostResponse>>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut posts_repo = Posts::new(&mut pool_conn);

    let posts = posts_repo.list(&PostFilter::default()).await?;

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// Get a single post by ID
#[utoipa::path(
    get,
    path = "/post/{id}",
    tag = "posts",
    params(
        ("id" = Uuid, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "The post", body = PostResponse),
        (status = 404, description = "Post not found"),
    )
)]
#[tracing::instrument(skip_all, fields(post_id = %id))]
pub async fn get_post(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<PostResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut posts_repo = Posts::new(&mut pool_conn);

    let post = posts_repo.get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "post".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(PostResponse::from(post)))
}

/// Update a post (author only)
#[utoipa::path(
    put,
    path = "/post",
    tag = "posts",
    request_body(
        content_type = "multipart/form-data",
        description = "Post id plus replacement fields, with optional new cover image"
    ),
    responses(
        (status = 200, description = "Updated post", body = PostResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 401, description = "No session cookie"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found"),
    ),
    security(
        ("session_token" = [])
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn update_post(
    State(state): State<AppState>,
    current_user: CurrentUser,
    multipart: Multipart,
) -> Result<Json<PostResponse>> {
    let form = PostForm::from_multipart(multipart).await?;

    let id = form
        .id
        .as_deref()
        .ok_or_else(|| Error::BadRequest {
            message: "Missing required field 'id'".to_string(),
        })?
        .parse::<Uuid>()
        .map_err(|e| Error::BadRequest {
            message: format!("Invalid post id: {e}"),
        })?;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut posts_repo = Posts::new(&mut pool_conn);

    let existing = posts_repo.get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "post".to_string(),
        id: id.to_string(),
    })?;

    // Only the author may edit; checked before any file is written
    ensure_author(existing.author_id, &current_user)?;

    // A missing file keeps the existing cover
    let cover = store_cover(&state, &form).await?;

    let post = posts_repo
        .update(
            id,
            &PostUpdateDBRequest {
                title: form.title.clone(),
                summary: form.summary.clone(),
                content: form.content.clone(),
                cover,
            },
        )
        .await?;

    Ok(Json(PostResponse::from(post)))
}
