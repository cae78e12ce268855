use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::config::DatabaseSettings;
use crate::errors::ServiceError;
use crate::migrator::Migrator;

/// Alias kept so callers read "pool", even though sea-orm manages the
/// underlying sqlx pool itself.
pub type DbPool = DatabaseConnection;

/// Opens the connection pool described by `settings`.
pub async fn connect(settings: &DatabaseSettings) -> Result<DbPool, ServiceError> {
    debug!(url = %settings.url, "configuring database connection");

    let mut opt = ConnectOptions::new(settings.url.clone());
    opt.max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(settings.idle_timeout_secs))
        .sqlx_logging(true);

    let pool = Database::connect(opt).await?;
    info!(
        max_connections = settings.max_connections,
        "database connection pool established"
    );
    Ok(pool)
}

/// Applies all pending embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), ServiceError> {
    info!("running database migrations");
    let start = std::time::Instant::now();
    Migrator::up(pool, None).await?;
    info!(elapsed = ?start.elapsed(), "database migrations completed");
    Ok(())
}

/// Pings the database; used by the /health endpoint.
pub async fn check_connection(pool: &DbPool) -> Result<(), ServiceError> {
    pool.ping().await?;
    Ok(())
}
