//! Repository implementations for database access.
//!
//! Each repository:
//! - Wraps a SQLx connection or transaction
//! - Provides strongly-typed operations
//! - Handles query construction and parameter binding
//! - Returns domain models from [`crate::db::models`]
//!
//! # Available Repositories
//!
//! - [`Users`]: User account storage and lookup
//! - [`Posts`]: Post creation, reading, listing, and updates

pub mod posts;
pub mod repository;
pub mod users;

pub use posts::Posts;
pub use repository::Repository;
pub use users::Users;
