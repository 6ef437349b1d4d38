use crate::{AppState, api::models::auth::CurrentUser, auth::session, errors::Error};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, instrument, trace};

/// Extract the session token from the request's cookie header.
///
/// Returns:
/// - None: No session cookie present
/// - Some(Ok(token)): Session cookie found
/// - Some(Err(error)): Cookie header present but unparseable
fn session_cookie_value(parts: &Parts, config: &crate::config::Config) -> Option<crate::errors::Result<String>> {
    let cookie_header = parts.headers.get(axum::http::header::COOKIE)?;

    let cookie_str = match cookie_header.to_str() {
        Ok(s) => s,
        Err(e) => {
            return Some(Err(Error::BadRequest {
                message: format!("Invalid cookie header: {e}"),
            }));
        }
    };
    let cookie_name = &config.auth.session.cookie_name;

    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some((name, value)) = cookie.split_once('=')
            && name == cookie_name
        {
            return Some(Ok(value.to_string()));
        }
    }
    None
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    /// Authenticate the request from its JWT session cookie.
    ///
    /// A missing cookie is 401 (no credentials presented). A cookie that fails
    /// verification is 403 (credentials presented but rejected).
    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> crate::errors::Result<Self> {
        let token = match session_cookie_value(parts, &state.config) {
            Some(Ok(token)) => token,
            Some(Err(e)) => return Err(e),
            None => {
                trace!("No session cookie found in request");
                return Err(Error::Unauthenticated { message: None });
            }
        };

        let user = session::verify_session_token(&token, &state.config)?;
        debug!("Found session authenticated user: {}", user.id);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        AppState,
        auth::session::create_session_token,
        test_utils::{create_test_config, create_test_user},
    };
    use axum::http::request::Parts;
    use sqlx::PgPool;

    fn parts_with_cookie(cookie: &str) -> Parts {
        let request = axum::http::Request::builder()
            .uri("http://localhost/profile")
            .header(axum::http::header::COOKIE, cookie)
            .body(())
            .unwrap();

        let (parts, _body) = request.into_parts();
        parts
    }

    #[sqlx::test]
    async fn test_valid_session_cookie_extraction(pool: PgPool) {
        let config = create_test_config();
        let state = AppState::builder().db(pool.clone()).config(config).build();

        let user = create_test_user(&pool, "alice").await;
        let token = create_session_token(&user, &state.config).unwrap();

        let mut parts = parts_with_cookie(&format!("token={token}"));
        let result = CurrentUser::from_request_parts(&mut parts, &state).await;
        assert!(result.is_ok());

        let current_user = result.unwrap();
        assert_eq!(current_user.id, user.id);
        assert_eq!(current_user.username, user.username);
    }

    #[sqlx::test]
    async fn test_cookie_found_among_others(pool: PgPool) {
        let config = create_test_config();
        let state = AppState::builder().db(pool.clone()).config(config).build();

        let user = create_test_user(&pool, "bob").await;
        let token = create_session_token(&user, &state.config).unwrap();

        let mut parts = parts_with_cookie(&format!("theme=dark; token={token}; lang=en"));
        let result = CurrentUser::from_request_parts(&mut parts, &state).await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap().id, user.id);
    }

    #[sqlx::test]
    async fn test_missing_cookie_returns_unauthorized(pool: PgPool) {
        let config = create_test_config();
        let state = AppState::builder().db(pool.clone()).config(config).build();

        let request = axum::http::Request::builder().uri("http://localhost/profile").body(()).unwrap();
        let (mut parts, _body) = request.into_parts();

        let result = CurrentUser::from_request_parts(&mut parts, &state).await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test]
    async fn test_invalid_token_returns_forbidden(pool: PgPool) {
        let config = create_test_config();
        let state = AppState::builder().db(pool.clone()).config(config).build();

        let mut parts = parts_with_cookie("token=not.a.valid.jwt");
        let result = CurrentUser::from_request_parts(&mut parts, &state).await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status_code(), axum::http::StatusCode::FORBIDDEN);
    }
}
