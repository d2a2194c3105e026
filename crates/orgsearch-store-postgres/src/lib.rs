//! PostgreSQL backend: organization search and statistics, access codes, users.

use std::time::Duration;

use orgsearch_storage::StoreError;
use sqlx::{postgres::PgPoolOptions, PgPool};

mod credentials;
mod organizations;
mod query;
mod row;

pub use query::{build_search, BuiltQuery, SearchQuery, SearchQueryBuilder, SqlValue};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Connection pool bounds.
#[derive(Clone, Debug)]
pub struct PoolSettings {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl PoolSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            min_connections: 5,
            max_connections: 20,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Store over a shared connection pool. Cloning shares the pool.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and apply pending migrations.
    pub async fn open(settings: &PoolSettings) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .min_connections(settings.min_connections)
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(&settings.url)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        tracing::info!(
            min_connections = settings.min_connections,
            max_connections = settings.max_connections,
            "Database pool ready"
        );

        Ok(Self { pool })
    }

    /// Round-trip a trivial query; used by readiness checks.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    /// Close every pooled connection. Further queries fail.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
