use crate::{
    auth::{CurrentUser, TokenBundle, providers::AuthProviders},
    config::AuthConfig,
    error::AppError,
};

#[derive(Clone, Copy)]
pub struct AuthService<'a> {
    providers: &'a AuthProviders,
}

impl<'a> AuthService<'a> {
    pub fn new(providers: &'a AuthProviders) -> Self {
        Self { providers }
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<CurrentUser, AppError> {
        self.providers.active()?.register(username, password).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<TokenBundle, AppError> {
        self.providers.active()?.login(username, password).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, AppError> {
        self.providers.active()?.refresh(refresh_token).await
    }

    pub async fn verify(&self, access_token: &str) -> Result<CurrentUser, AppError> {
        self.providers.active()?.verify(access_token).await
    }

    pub async fn seed_admin(&self, cfg: &AuthConfig) -> anyhow::Result<()> {
        self.providers
            .active()
            .map_err(|err| anyhow::anyhow!(err.to_string()))?
            .seed_admin(cfg)
            .await
    }
}
