use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::auth::providers::AuthProviderId;

use super::{defaults, envconfig::EnvConfig, validate};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub auth: Option<AuthConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }

    /// The configured auth section. Debug builds fall back to development
    /// credentials; release builds require the section.
    pub fn auth_config(&self) -> Result<AuthConfig> {
        match self.auth.as_ref() {
            Some(auth) => Ok(auth.clone()),
            None if cfg!(debug_assertions) => Ok(AuthConfig::development()),
            None => bail!("auth config (APP_AUTH__*) is required in release builds"),
        }
    }
}

impl EnvConfig for AppConfig {
    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_idle: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::DEFAULT_DATABASE_URL.to_string(),
            max_connections: defaults::DEFAULT_DB_MAX_CONNECTIONS,
            min_idle: defaults::DEFAULT_DB_MIN_IDLE,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(default = "default_auth_provider")]
    pub provider: AuthProviderId,
    pub jwt_secret: String,
    pub admin_username: String,
    pub admin_password: String,
    #[serde(default = "default_access_ttl_secs")]
    pub access_ttl_secs: usize,
    #[serde(default = "default_refresh_ttl_days")]
    pub refresh_ttl_days: i64,
}

impl AuthConfig {
    pub fn development() -> Self {
        Self {
            provider: default_auth_provider(),
            jwt_secret: defaults::DEV_JWT_SECRET.to_string(),
            admin_username: defaults::DEV_ADMIN_USERNAME.to_string(),
            admin_password: defaults::DEV_ADMIN_PASSWORD.to_string(),
            access_ttl_secs: default_access_ttl_secs(),
            refresh_ttl_days: default_refresh_ttl_days(),
        }
    }
}

fn default_auth_provider() -> AuthProviderId {
    AuthProviderId::Local
}

fn default_access_ttl_secs() -> usize {
    defaults::DEFAULT_ACCESS_TTL_SECS
}

fn default_refresh_ttl_days() -> i64 {
    defaults::DEFAULT_REFRESH_TTL_DAYS
}
