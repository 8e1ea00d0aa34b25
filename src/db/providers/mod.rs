mod backends;
mod registry;

use std::sync::Arc;

pub use backends::{PostgresDbProvider, SqliteDbProvider};
pub use registry::{DbProvider, DbProviderId, DbProviders};

pub fn default_registry() -> anyhow::Result<DbProviders> {
    DbProviders::new()
        .with_provider(Arc::new(PostgresDbProvider))?
        .with_provider(Arc::new(SqliteDbProvider))
}
