//! API request and response data models.
//!
//! These models define the public API contract and are distinct from the
//! database models in [`crate::db::models`], allowing independent evolution
//! of API and storage representations. All models are annotated with `utoipa`
//! for automatic API docs.
//!
//! - [`auth`]: Registration, login, and session payloads
//! - [`posts`]: Post creation, update, and feed payloads

pub mod auth;
pub mod posts;
