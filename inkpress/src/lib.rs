//! # inkpress: A Minimal Blog Publishing Backend
//!
//! `inkpress` is the REST backend for a small blogging platform. It provides account
//! registration, cookie-based sessions, post publishing with cover images, and a
//! public reading feed.
//!
//! ## Overview
//!
//! The server exposes a deliberately small HTTP surface. Anyone can read posts;
//! only registered users can publish, and only a post's author can edit it. Sessions
//! are stateless: a login issues a signed JWT carried in an HTTP-only cookie, and
//! every protected request verifies that token without a database lookup. Cover
//! images are stored on the local filesystem and served back as static files.
//!
//! ### Request Flow
//!
//! A request to a protected endpoint first passes through the [`CurrentUser`]
//! extractor, which reads the session cookie and verifies its signature and expiry.
//! A request with no cookie is rejected with 401; a cookie that fails verification
//! is rejected with 403. Once authenticated, the handler performs any ownership
//! checks (post edits are author-only) and interacts with PostgreSQL through the
//! repository interfaces in [`db`].
//!
//! [`CurrentUser`]: crate::api::models::auth::CurrentUser
//!
//! ### Core Components
//!
//! The **API layer** ([`api`]) exposes the authentication routes (`/register`,
//! `/login`, `/logout`, `/profile`) and the post routes (`/post`, `/post/{id}`).
//! Post creation and editing accept multipart forms so a cover image can ride
//! along with the text fields.
//!
//! The **authentication layer** ([`auth`]) handles Argon2 password hashing, JWT
//! session tokens, and the author-only ownership check.
//!
//! The **database layer** ([`db`]) uses the repository pattern to abstract data
//! access over PostgreSQL, with migrations run automatically on startup.
//!
//! The **uploads layer** ([`uploads`]) writes cover images under the configured
//! uploads directory, which is served at `/uploads/*`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use inkpress::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Parse CLI arguments and load configuration
//!     let args = inkpress::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     // Initialize telemetry (structured logging)
//!     inkpress::telemetry::init_telemetry()?;
//!
//!     // Create and start the application
//!     let app = Application::new(config).await?;
//!
//!     // Run with graceful shutdown on Ctrl+C
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     }).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Database Setup
//!
//! The application requires a PostgreSQL database and automatically runs migrations on startup:
//!
//! ```no_run
//! # use sqlx::PgPool;
//! # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
//! // Run migrations
//! inkpress::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
mod types;
pub mod uploads;

#[cfg(test)]
pub mod test_utils;

use crate::config::CorsOrigin;
use crate::openapi::ApiDoc;
use crate::uploads::AssetStore;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::{
    Router, http,
    routing::{get, post},
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{PostId, UserId};

/// Application state shared across all request handlers.
///
/// # Fields
///
/// - `db`: PostgreSQL connection pool
/// - `config`: Application configuration loaded from environment/files
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .db(pool)
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the inkpress database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            CorsOrigin::Url(url) => url.as_str().parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(config.cors.allow_credentials)
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::PUT])
        .allow_headers([http::header::CONTENT_TYPE])
        .expose_headers(vec![http::header::LOCATION]);

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the main application router with all endpoints and middleware.
///
/// This function constructs the complete Axum router with:
/// - Authentication routes (register, login, logout, profile)
/// - Post routes (create, feed, read, update)
/// - Static serving of uploaded cover images at `/uploads/*`
/// - OpenAPI documentation at `/docs`
/// - CORS configuration
/// - Tracing middleware
///
/// # Errors
///
/// Returns an error if CORS configuration is invalid.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    // Multipart bodies (cover uploads) are bounded by the configured limit
    let max_upload_size = state.config.uploads.max_upload_size;
    let uploads_dir = state.config.uploads.dir.clone();

    let api_router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        // Authentication
        .route("/register", post(api::handlers::auth::register))
        .route("/login", post(api::handlers::auth::login))
        .route("/logout", post(api::handlers::auth::logout))
        .route("/profile", get(api::handlers::auth::profile))
        // Posts
        .route(
            "/post",
            post(api::handlers::posts::create_post)
                .get(api::handlers::posts::list_posts)
                .put(api::handlers::posts::update_post),
        )
        .route("/post/{id}", get(api::handlers::posts::get_post))
        .layer(DefaultBodyLimit::max(max_upload_size))
        .with_state(state.clone());

    // Create CORS layer from config
    let cors_layer = create_cors_layer(&state.config)?;

    let router = api_router
        // Uploaded cover images are served straight from disk
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects to the database, runs migrations,
///    and prepares the uploads directory
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: When the shutdown signal is received, in-flight requests drain
///    and connections are closed
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting inkpress with configuration: {:#?}", config);

        let database_url = config
            .database_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("database_url is not configured. Set DATABASE_URL or add database_url to the config file."))?;

        let pool = PgPool::connect(database_url).await?;
        migrator().run(&pool).await?;

        // The uploads directory must exist before anything is written or served from it
        AssetStore::new(config.uploads.dir.clone()).ensure_dir().await?;

        let state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "inkpress listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        // Run the server with graceful shutdown
        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        // Close database connections
        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
