//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL.
//! It follows the Repository pattern to provide clean abstractions over database operations.
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations for CRUD operations
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types
//!
//! # Repository Pattern
//!
//! The [`handlers`] module provides repository structs for each database table.
//! Repositories wrap a SQLx connection and encapsulate all database access for
//! a specific entity type:
//!
//! ```ignore
//! use inkpress::db::handlers::{Posts, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut posts_repo = Posts::new(&mut conn);
//!
//!     if let Some(post) = posts_repo.get_by_id(post_id).await? {
//!         println!("Found post: {}", post.title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Migrations
//!
//! Database migrations are managed by SQLx and located in the `migrations/` directory.
//! The [`crate::migrator`] function provides access to the migrator:
//!
//! ```ignore
//! inkpress::migrator().run(&pool).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod models;
