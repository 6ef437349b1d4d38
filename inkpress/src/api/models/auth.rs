//! Request and response types for the authentication endpoints.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{errors::Error, types::UserId};

/// The authenticated user as carried in the session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub username: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public view of a user account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub username: String,
}

/// Successful login: user info in the body plus a session cookie.
#[derive(Debug)]
pub struct LoginResponse {
    pub auth_response: AuthResponse,
    pub cookie: String,
}

impl IntoResponse for LoginResponse {
    fn into_response(self) -> Response {
        let cookie = match HeaderValue::from_str(&self.cookie) {
            Ok(value) => value,
            Err(e) => {
                return Error::Internal {
                    operation: format!("encode session cookie: {e}"),
                }
                .into_response();
            }
        };

        let mut response = (StatusCode::OK, Json(self.auth_response)).into_response();
        response.headers_mut().insert(header::SET_COOKIE, cookie);
        response
    }
}

/// Generic success message
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthSuccessResponse {
    pub message: String,
}

/// Logout: success message plus an expired cookie clearing the session.
#[derive(Debug)]
pub struct LogoutResponse {
    pub auth_response: AuthSuccessResponse,
    pub cookie: String,
}

impl IntoResponse for LogoutResponse {
    fn into_response(self) -> Response {
        let cookie = match HeaderValue::from_str(&self.cookie) {
            Ok(value) => value,
            Err(e) => {
                return Error::Internal {
                    operation: format!("encode session cookie: {e}"),
                }
                .into_response();
            }
        };

        let mut response = (StatusCode::OK, Json(self.auth_response)).into_response();
        response.headers_mut().insert(header::SET_COOKIE, cookie);
        response
    }
}
