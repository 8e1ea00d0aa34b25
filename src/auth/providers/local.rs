use async_trait::async_trait;

use crate::{
    auth::{
        CurrentUser, Role, TokenBundle,
        jwt::{JwtKeys, decode_token, encode_token, make_access_claims},
        password::{hash_password, verify_password},
    },
    config::AuthConfig,
    db::dao::RefreshTokenDao,
    db::entities::user,
    error::AppError,
    services::user_service::UserService,
};

use super::{AuthProvider, AuthProviderId};

const INVALID_CREDENTIALS: &str = "No active account found with the given credentials";
const INVALID_REFRESH: &str = "Token is invalid or expired";

/// Users, password hashes and refresh tokens kept in the application
/// database; access tokens are HS256 JWTs.
#[derive(Clone)]
pub struct LocalAuthProvider {
    user_service: UserService,
    refresh_token_dao: RefreshTokenDao,
    jwt: JwtKeys,
    access_ttl_secs: usize,
    refresh_ttl_days: i64,
}

impl LocalAuthProvider {
    pub fn new(
        user_service: UserService,
        refresh_token_dao: RefreshTokenDao,
        jwt: JwtKeys,
        cfg: &AuthConfig,
    ) -> Self {
        Self {
            user_service,
            refresh_token_dao,
            jwt,
            access_ttl_secs: cfg.access_ttl_secs,
            refresh_ttl_days: cfg.refresh_ttl_days,
        }
    }

    async fn issue_tokens(&self, user: &user::Model) -> Result<TokenBundle, AppError> {
        let claims = make_access_claims(user.id, Role::grants_for(&user.role), self.access_ttl_secs);
        let access_token = encode_token(&self.jwt, &claims)?;

        let refresh = self
            .refresh_token_dao
            .create_refresh_token(user.id, self.refresh_ttl_days)
            .await?;

        Ok(TokenBundle {
            access_token,
            refresh_token: refresh.token,
            token_type: "Bearer",
            expires_in: self.access_ttl_secs,
        })
    }
}

fn current_user(user: &user::Model) -> CurrentUser {
    CurrentUser {
        id: user.id,
        username: user.username.clone(),
        roles: Role::grants_for(&user.role),
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    fn id(&self) -> AuthProviderId {
        AuthProviderId::Local
    }

    async fn register(&self, username: &str, password: &str) -> Result<CurrentUser, AppError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::bad_request("Username required"));
        }

        if self.user_service.find_by_username(username).await?.is_some() {
            return Err(AppError::conflict("User already exists"));
        }

        let password_hash = hash_password(password)?;
        let user = self
            .user_service
            .create_user(username, &password_hash, Role::User.as_str())
            .await?;
        tracing::info!(user_id = user.id, "registered user");

        Ok(current_user(&user))
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenBundle, AppError> {
        let Some(user) = self.user_service.find_by_username(username.trim()).await? else {
            tracing::warn!("login rejected: unknown username");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::warn!(user_id = user.id, "login rejected: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        self.issue_tokens(&user).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, AppError> {
        let token = self
            .refresh_token_dao
            .find_active_by_token(refresh_token)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_REFRESH))?;

        if token.expires_at < chrono::Utc::now().fixed_offset() {
            return Err(AppError::unauthorized(INVALID_REFRESH));
        }

        if !self.refresh_token_dao.revoke_token(refresh_token).await? {
            return Err(AppError::unauthorized(INVALID_REFRESH));
        }

        let user = self
            .user_service
            .find_by_id(token.user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_REFRESH))?;

        self.issue_tokens(&user).await
    }

    async fn verify(&self, access_token: &str) -> Result<CurrentUser, AppError> {
        let claims = decode_token(&self.jwt, access_token)?;
        let user_id: i32 = claims
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Token subject is not a user id"))?;

        let user = self
            .user_service
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User not found"))?;

        Ok(current_user(&user))
    }

    async fn seed_admin(&self, cfg: &AuthConfig) -> anyhow::Result<()> {
        if let Some(existing) = self
            .user_service
            .find_by_username(&cfg.admin_username)
            .await
            .map_err(|err| anyhow::anyhow!("{err}"))?
        {
            tracing::info!("admin user already present: {}", existing.username);
            return Ok(());
        }

        let hash = hash_password(&cfg.admin_password)
            .map_err(|e| anyhow::anyhow!("admin seed hash error: {e}"))?;
        let user = self
            .user_service
            .create_user(&cfg.admin_username, &hash, Role::Admin.as_str())
            .await
            .map_err(|err| anyhow::anyhow!("{err}"))?;
        tracing::info!("seeded admin user {}", user.username);
        Ok(())
    }
}
