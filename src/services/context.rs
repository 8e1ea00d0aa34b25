use sea_orm::DatabaseConnection;

use crate::{
    auth::{
        jwt::JwtKeys,
        providers::{AuthProviders, LocalAuthProvider},
    },
    config::AuthConfig,
    db::dao::{DaoBase, RefreshTokenDao, TodoDao, UserDao},
    services::{auth_service::AuthService, todo_service::TodoService, user_service::UserService},
    state::AppState,
};

/// Hands out services bound to one database connection.
#[derive(Clone)]
pub struct ServiceContext {
    db: DatabaseConnection,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    pub fn user(&self) -> UserService {
        UserService::new(UserDao::new(&self.db))
    }

    pub fn todo(&self) -> TodoService {
        TodoService::new(TodoDao::new(&self.db))
    }

    pub fn auth<'a>(&self, providers: &'a AuthProviders) -> AuthService<'a> {
        AuthService::new(providers)
    }

    /// The password-and-JWT provider over this connection's users and
    /// refresh tokens.
    pub fn local_provider(&self, jwt: JwtKeys, cfg: &AuthConfig) -> LocalAuthProvider {
        LocalAuthProvider::new(self.user(), RefreshTokenDao::new(&self.db), jwt, cfg)
    }
}
