//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification for
//! the REST API, served at `/docs` via Scalar.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::models::{
    auth::{AuthResponse, AuthSuccessResponse, CurrentUser, LoginRequest, RegisterRequest},
    posts::{PostAuthor, PostResponse},
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "session_token",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "token",
                "Session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "inkpress API",
        description = "A minimal blog publishing backend: accounts, session cookies, posts, cover uploads."
    ),
    paths(
        crate::api::handlers::auth::register,
        crate::api::handlers::auth::login,
        crate::api::handlers::auth::logout,
        crate::api::handlers::auth::profile,
        crate::api::handlers::posts::create_post,
        crate::api::handlers::posts::list_posts,
        crate::api::handlers::posts::get_post,
        crate::api::handlers::posts::update_post,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        AuthSuccessResponse,
        CurrentUser,
        PostResponse,
        PostAuthor,
    )),
    tags(
        (name = "authentication", description = "Account registration and cookie sessions"),
        (name = "posts", description = "Post publishing and reading"),
    )
)]
pub struct ApiDoc;
