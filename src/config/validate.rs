use anyhow::{Result, bail};

use super::{
    AppConfig,
    defaults::{MAX_ACCESS_TTL_SECS, MAX_REFRESH_TTL_DAYS},
};
use crate::auth::password::MIN_PASSWORD_LEN;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if cfg.logging.rust_log.trim().is_empty() {
        errors.push("logging.rust_log must not be empty".to_string());
    }

    let database = &cfg.database;
    if database.url.trim().is_empty() {
        errors.push("database.url must not be empty".to_string());
    }

    if database.max_connections == 0 {
        errors.push("database.max_connections must be > 0".to_string());
    }

    if database.min_idle > database.max_connections {
        errors.push(format!(
            "database.min_idle ({}) must be <= database.max_connections ({})",
            database.min_idle, database.max_connections
        ));
    }

    if let Some(auth) = cfg.auth.as_ref() {
        if auth.admin_username.trim().is_empty() {
            errors.push("auth.admin_username must not be empty".to_string());
        }

        if auth.admin_password.len() < MIN_PASSWORD_LEN {
            errors.push(format!(
                "auth.admin_password must be at least {MIN_PASSWORD_LEN} characters"
            ));
        }

        if auth.jwt_secret.trim().is_empty() {
            errors.push("auth.jwt_secret must not be empty".to_string());
        }

        if auth.access_ttl_secs == 0 || auth.access_ttl_secs > MAX_ACCESS_TTL_SECS {
            errors.push(format!(
                "auth.access_ttl_secs must be between 1 and {MAX_ACCESS_TTL_SECS}"
            ));
        }

        if auth.refresh_ttl_days <= 0 || auth.refresh_ttl_days > MAX_REFRESH_TTL_DAYS {
            errors.push(format!(
                "auth.refresh_ttl_days must be between 1 and {MAX_REFRESH_TTL_DAYS}"
            ));
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::config::{AppConfig, AuthConfig};

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_problem() {
        let mut cfg = AppConfig::default();
        cfg.general.host = " ".to_string();
        cfg.auth = Some(AuthConfig {
            jwt_secret: String::new(),
            admin_password: "short".to_string(),
            ..AuthConfig::development()
        });

        let message = validate(&cfg).expect_err("config should be rejected").to_string();

        assert!(message.contains("general.host must not be empty"));
        assert!(message.contains("auth.jwt_secret must not be empty"));
        assert!(message.contains("auth.admin_password must be at least 8 characters"));
    }

    #[test]
    fn token_lifetimes_are_bounded() {
        let mut cfg = AppConfig::default();
        cfg.auth = Some(AuthConfig {
            access_ttl_secs: usize::MAX,
            refresh_ttl_days: i64::MAX,
            ..AuthConfig::development()
        });

        let message = validate(&cfg).expect_err("config should be rejected").to_string();

        assert!(message.contains("auth.access_ttl_secs must be between 1 and 604800"));
        assert!(message.contains("auth.refresh_ttl_days must be between 1 and 3650"));

        cfg.auth = Some(AuthConfig {
            refresh_ttl_days: 0,
            ..AuthConfig::development()
        });
        let message = validate(&cfg).expect_err("config should be rejected").to_string();
        assert!(message.contains("auth.refresh_ttl_days must be between 1 and 3650"));
    }
}
