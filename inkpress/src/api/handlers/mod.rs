//! HTTP request handlers for all API endpoints.
//!
//! Each handler is responsible for:
//! - Request validation and deserialization
//! - Authentication and authorization checks
//! - Business logic execution via database repositories
//! - Response serialization
//!
//! # Handler Modules
//!
//! - [`auth`]: Registration, login, logout, and profile
//! - [`posts`]: Post publishing, public feed, and author-only editing
//!
//! # Authentication
//!
//! Handlers that require authentication take the [`CurrentUser`] extractor,
//! which verifies the JWT session cookie on every request.
//!
//! [`CurrentUser`]: crate::api::models::auth::CurrentUser

pub mod auth;
pub mod posts;
