//! Shared helpers for integration tests.

use crate::api::models::auth::CurrentUser;
use crate::auth::password;
use crate::config::Config;
use crate::db::handlers::Users;
use crate::db::models::users::UserCreateDBRequest;
use sqlx::PgPool;

/// Password used for all test accounts created through [`create_test_user`].
pub const TEST_PASSWORD: &str = "password123";

pub fn create_test_config() -> Config {
    let mut config = Config {
        database_url: None,
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        ..Default::default()
    };
    // Test requests go over plain HTTP
    config.auth.session.cookie_secure = false;
    config.auth.session.cookie_same_site = "strict".to_string();
    config
}

pub async fn create_test_user(pool: &PgPool, username: &str) -> CurrentUser {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut users_repo = Users::new(&mut conn);

    let password_hash = password::hash_string(TEST_PASSWORD).expect("Failed to hash test password");

    let user = users_repo
        .create(&UserCreateDBRequest {
            username: username.to_string(),
            password_hash,
        })
        .await
        .expect("Failed to create test user");

    CurrentUser {
        id: user.id,
        username: user.username,
    }
}
