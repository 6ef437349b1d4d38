//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Authentication** (`/register`, `/login`, `/logout`, `/profile`): Account
//!   registration and cookie-based sessions
//! - **Posts** (`/post`, `/post/{id}`): Post publishing, feed, and editing
//! - **Uploads** (`/uploads/*`): Static serving of uploaded cover images
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`.
//! API documentation is available at `/docs` when the server is running.

pub mod handlers;
pub mod models;
