//! Builders shared by unit and integration tests.

use std::sync::Arc;

use axum::Router;

use crate::{
    auth::{
        Role,
        bootstrap::init_providers,
        jwt::{JwtKeys, encode_token, make_access_claims},
        password::hash_password,
    },
    config::{AppConfig, AuthConfig, DatabaseConfig},
    db::{connection, entities::user},
    routes::app,
    services::ServiceContext,
    state::AppState,
};

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const TEST_ADMIN_USERNAME: &str = "testadmin";
pub const TEST_ADMIN_PASSWORD: &str = "testadminpassword";

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        admin_username: TEST_ADMIN_USERNAME.to_string(),
        admin_password: TEST_ADMIN_PASSWORD.to_string(),
        ..AuthConfig::development()
    }
}

/// State over a fresh in-memory SQLite database with the admin seeded. The
/// pool holds a single connection so every query sees the same database.
pub async fn test_state() -> Arc<AppState> {
    let cfg = AppConfig {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_idle: 1,
        },
        auth: Some(test_auth_config()),
        ..AppConfig::default()
    };

    let db = connection::connect(&cfg.database)
        .await
        .expect("in-memory database should open");
    let services = ServiceContext::new(&db);
    let providers = init_providers(&test_auth_config(), &services)
        .await
        .expect("auth providers should initialise");

    AppState::new(cfg, db, providers)
}

pub async fn test_app() -> (Router, Arc<AppState>) {
    let state = test_state().await;
    (app(Arc::clone(&state)), state)
}

pub async fn create_user(state: &AppState, username: &str, password: &str) -> user::Model {
    let hash = hash_password(password).expect("password should hash");
    ServiceContext::from_state(state)
        .user()
        .create_user(username, &hash, Role::User.as_str())
        .await
        .expect("user should be created")
}

pub async fn admin_user(state: &AppState) -> user::Model {
    ServiceContext::from_state(state)
        .user()
        .find_by_username(TEST_ADMIN_USERNAME)
        .await
        .expect("lookup should succeed")
        .expect("admin should be seeded")
}

/// `Authorization` header value for `user`, signed with the test secret.
pub fn bearer_for(user: &user::Model) -> String {
    let claims = make_access_claims(user.id, Role::grants_for(&user.role), 300);
    let token = encode_token(&JwtKeys::from_secret(TEST_JWT_SECRET.as_bytes()), &claims)
        .expect("token should encode");
    format!("Bearer {token}")
}
