//! PostgreSQL connection management. Reads go to the replica pool, writes to
//! the primary.

use crate::config::DatabaseConfig;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

#[derive(Clone)]
pub struct Database {
    pub(crate) read: PgPool,
    pub(crate) write: PgPool,
}

impl Database {
    pub fn new(read: PgPool, write: PgPool) -> Self {
        Self { read, write }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let write = create_pool(&config.write_url, config.max_connections).await?;
        let read = if config.read_url == config.write_url {
            write.clone()
        } else {
            create_pool(&config.read_url, config.max_connections).await?
        };

        Ok(Self::new(read, write))
    }

    /// Run database migrations against the primary.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.write).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }
}

async fn create_pool(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    tracing::info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(url)
        .await?;

    tracing::info!("Successfully connected to PostgreSQL");

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires running PostgreSQL
    async fn connects_and_migrates() {
        let config = DatabaseConfig {
            write_url: "postgres://localhost/booking_test".to_string(),
            read_url: "postgres://localhost/booking_test".to_string(),
            max_connections: 5,
        };

        let db = Database::connect(&config).await.unwrap();
        db.run_migrations().await.unwrap();
    }
}
