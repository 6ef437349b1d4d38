use axum::{Json, extract::State};

use crate::{
    AppState,
    api::models::auth::{AuthResponse, AuthSuccessResponse, CurrentUser, LoginRequest, LoginResponse, LogoutResponse, RegisterRequest},
    auth::{password, session},
    db::{handlers::Users, models::users::UserCreateDBRequest},
    errors::Error,
};

/// Register a new user account
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username already taken"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(State(state): State<AppState>, Json(request): Json<RegisterRequest>) -> Result<Json<AuthResponse>, Error> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(Error::BadRequest {
            message: "Username must not be empty".to_string(),
        });
    }

    // Validate password length
    let password_config = &state.config.auth.password;
    if request.password.len() < password_config.min_length {
        return Err(Error::BadRequest {
            message: format!("Password must be at least {} characters", password_config.min_length),
        });
    }
    if request.password.len() > password_config.max_length {
        return Err(Error::BadRequest {
            message: format!("Password must be no more than {} characters", password_config.max_length),
        });
    }

    // Hash the password on a blocking thread to avoid blocking async runtime
    let password = request.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_string(&password))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut pool_conn);

    // A duplicate username surfaces as a unique violation and maps to 409
    let created_user = user_repo
        .create(&UserCreateDBRequest {
            username: username.to_string(),
            password_hash,
        })
        .await?;

    Ok(Json(AuthResponse {
        id: created_user.id,
        username: created_user.username,
    }))
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Unknown user or wrong password"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<LoginResponse, Error> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut pool_conn);

    // Find user by username
    let user = user_repo.get_by_username(&request.username).await?.ok_or_else(|| Error::BadRequest {
        message: "User not found".to_string(),
    })?;

    // Verify password on a blocking thread to avoid blocking async runtime
    let password = request.password.clone();
    let hash = user.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_string(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        return Err(Error::BadRequest {
            message: "Wrong credentials".to_string(),
        });
    }

    // Create session token
    let current_user = CurrentUser {
        id: user.id,
        username: user.username.clone(),
    };
    let token = session::create_session_token(&current_user, &state.config)?;

    // Set session cookie
    let cookie = create_session_cookie(&token, &state.config);

    Ok(LoginResponse {
        auth_response: AuthResponse {
            id: user.id,
            username: user.username,
        },
        cookie,
    })
}

/// Logout (clear session)
#[utoipa::path(
    post,
    path = "/logout",
    tag = "authentication",
    responses(
        (status = 200, description = "Logout successful", body = AuthSuccessResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> Result<LogoutResponse, Error> {
    // Create expired cookie to clear session
    let cookie = format!(
        "{}=; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age=0",
        state.config.auth.session.cookie_name
    );

    Ok(LogoutResponse {
        auth_response: AuthSuccessResponse {
            message: "Logout successful".to_string(),
        },
        cookie,
    })
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/profile",
    tag = "authentication",
    responses(
        (status = 200, description = "Authenticated user", body = CurrentUser),
        (status = 401, description = "No session cookie"),
        (status = 403, description = "Invalid or expired session"),
    ),
    security(
        ("session_token" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn profile(current_user: CurrentUser) -> Result<Json<CurrentUser>, Error> {
    Ok(Json(current_user))
}

/// Helper function to create a session cookie
pub(crate) fn create_session_cookie(token: &str, config: &crate::config::Config) -> String {
    let session_config = &config.auth.session;
    let max_age = config.auth.token_expiry.as_secs();

    format!(
        "{}={}; Path=/; HttpOnly; Secure={}; SameSite={}; Max-Age={}",
        session_config.cookie_name, token, session_config.cookie_secure, session_config.cookie_same_site, max_age
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_router, test_utils::create_test_config};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use sqlx::PgPool;

    fn test_server(pool: PgPool) -> TestServer {
        let state = AppState::builder().db(pool).config(create_test_config()).build();
        TestServer::new(build_router(state).unwrap()).unwrap()
    }

    #[sqlx::test]
    async fn test_register_success(pool: PgPool) {
        let server = test_server(pool);

        let response = server
            .post("/register")
            .json(&RegisterRequest {
                username: "testuser".to_string(),
                password: "password123".to_string(),
            })
            .await;

        response.assert_status_ok();
        let body: AuthResponse = response.json();
        assert_eq!(body.username, "testuser");
    }

    #[sqlx::test]
    async fn test_register_duplicate_username(pool: PgPool) {
        let server = test_server(pool);

        let request = RegisterRequest {
            username: "taken".to_string(),
            password: "password123".to_string(),
        };

        server.post("/register").json(&request).await.assert_status_ok();

        let response = server.post("/register").json(&request).await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<serde_json::Value>()["error"], "This username is already taken");
    }

    #[sqlx::test]
    async fn test_register_password_too_short(pool: PgPool) {
        let server = test_server(pool);

        let response = server
            .post("/register")
            .json(&RegisterRequest {
                username: "testuser".to_string(),
                password: "short".to_string(),
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[sqlx::test]
    async fn test_login_sets_session_cookie(pool: PgPool) {
        let server = test_server(pool);

        server
            .post("/register")
            .json(&RegisterRequest {
                username: "alice".to_string(),
                password: "password123".to_string(),
            })
            .await
            .assert_status_ok();

        let response = server
            .post("/login")
            .json(&LoginRequest {
                username: "alice".to_string(),
                password: "password123".to_string(),
            })
            .await;

        response.assert_status_ok();
        let cookie_header = response.headers().get("set-cookie").expect("missing set-cookie").to_str().unwrap();
        assert!(cookie_header.starts_with("token="));
        assert!(cookie_header.contains("HttpOnly"));

        let body: AuthResponse = response.json();
        assert_eq!(body.username, "alice");
    }

    #[sqlx::test]
    async fn test_login_unknown_user(pool: PgPool) {
        let server = test_server(pool);

        let response = server
            .post("/login")
            .json(&LoginRequest {
                username: "nobody".to_string(),
                password: "password123".to_string(),
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<serde_json::Value>()["error"], "User not found");
    }

    #[sqlx::test]
    async fn test_login_wrong_password(pool: PgPool) {
        let server = test_server(pool);

        server
            .post("/register")
            .json(&RegisterRequest {
                username: "bob".to_string(),
                password: "password123".to_string(),
            })
            .await
            .assert_status_ok();

        let response = server
            .post("/login")
            .json(&LoginRequest {
                username: "bob".to_string(),
                password: "not-the-password".to_string(),
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<serde_json::Value>()["error"], "Wrong credentials");
    }

    #[sqlx::test]
    async fn test_profile_roundtrip(pool: PgPool) {
        let mut server = test_server(pool);
        server.save_cookies();

        server
            .post("/register")
            .json(&RegisterRequest {
                username: "carol".to_string(),
                password: "password123".to_string(),
            })
            .await
            .assert_status_ok();

        server
            .post("/login")
            .json(&LoginRequest {
                username: "carol".to_string(),
                password: "password123".to_string(),
            })
            .await
            .assert_status_ok();

        let response = server.get("/profile").await;
        response.assert_status_ok();
        let body: CurrentUser = response.json();
        assert_eq!(body.username, "carol");
    }

    #[sqlx::test]
    async fn test_profile_without_cookie(pool: PgPool) {
        let server = test_server(pool);

        let response = server.get("/profile").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<serde_json::Value>()["error"], "No token provided");
    }

    #[sqlx::test]
    async fn test_profile_with_garbage_cookie(pool: PgPool) {
        let server = test_server(pool);

        let response = server.get("/profile").add_header("cookie", "token=garbage").await;
        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(response.json::<serde_json::Value>()["error"], "Invalid token");
    }

    #[sqlx::test]
    async fn test_logout_clears_cookie(pool: PgPool) {
        let server = test_server(pool);

        let response = server.post("/logout").await;
        response.assert_status_ok();

        let cookie_header = response.headers().get("set-cookie").expect("missing set-cookie").to_str().unwrap();
        assert!(cookie_header.starts_with("token=;"));
        assert!(cookie_header.contains("Max-Age=0"));
    }
}
