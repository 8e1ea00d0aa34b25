use anyhow::Context;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::DatabaseConfig;

use super::providers::default_registry;

/// Opens the pool for the configured URL and brings the schema in line with
/// the entity definitions.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let provider = default_registry()?.provider_for_url(&cfg.url)?;
    info!(backend = provider.id().as_str(), "connecting to database");

    let db = provider
        .connect(cfg)
        .await
        .context("failed to connect to database")?;
    provider
        .post_connect(&db)
        .await
        .context("failed to prepare database connection")?;

    info!("syncing database schema from entities");
    db.get_schema_registry("todo_api::db::entities::*")
        .sync(&db)
        .await
        .context("failed to sync database schema")?;
    Ok(db)
}
