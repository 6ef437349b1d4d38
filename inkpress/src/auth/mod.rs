//! Authentication and authorization system.
//!
//! # Authentication
//!
//! Browser-based authentication using a JWT carried in a secure HTTP-only cookie:
//! - Users log in via `/login` with username/password
//! - The signed token is stored in an HTTP-only cookie
//! - The cookie is verified on each request by the [`current_user`] extractor
//! - Tokens expire after the configured lifetime; logout clears the cookie
//!
//! A request without the cookie is rejected with 401. A request whose cookie
//! fails verification (bad signature, expired, malformed) is rejected with 403.
//!
//! # Authorization
//!
//! Posts may only be edited by their author; see [`ownership`].
//!
//! # Modules
//!
//! - [`current_user`]: Extractor for getting the authenticated user in handlers
//! - [`ownership`]: Author-only checks for post mutations
//! - [`password`]: Password hashing and verification using Argon2
//! - [`session`]: JWT session token creation and verification
//!
//! # Usage in Handlers
//!
//! ```ignore
//! use inkpress::api::models::auth::CurrentUser;
//!
//! async fn protected_handler(current_user: CurrentUser) -> Result<String, Error> {
//!     Ok(format!("Hello, {}!", current_user.username))
//! }
//! ```

pub mod current_user;
pub mod ownership;
pub mod password;
pub mod session;
