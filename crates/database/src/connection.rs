use crate::error::DbError;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// What the pool needs to know to reach the database.
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl ConnectionOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }

    fn pool_options(&self) -> Result<PgPoolOptions, DbError> {
        if self.url.trim().is_empty() {
            return Err(DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()));
        }
        Ok(PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout))
    }
}

/// Establishes a connection pool to the PostgreSQL database.
pub async fn connect(options: &ConnectionOptions) -> Result<PgPool, DbError> {
    let pool = options.pool_options()?.connect(&options.url).await?;
    tracing::info!(max_connections = options.max_connections, "Database pool established.");
    Ok(pool)
}

/// Builds a pool that opens its first connection on first use.
pub fn connect_lazy(options: &ConnectionOptions) -> Result<PgPool, DbError> {
    Ok(options.pool_options()?.connect_lazy(&options.url)?)
}

/// Applies the embedded migrations so the schema matches the queries in this crate.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied.");
    Ok(())
}
