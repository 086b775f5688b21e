//! Database client for FoodBot
//!
//! Wraps a `sqlx::Any` pool so the repositories never name a concrete driver.

use crate::error::DbError;
use foodbot_config::{AppConfig, DatabaseConfig};
use sqlx::pool::PoolOptions;
use sqlx::{Pool, Transaction};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Type alias for a database transaction
pub type DbTransaction<'a> = Transaction<'a, sqlx::Any>;

/// Database client for FoodBot
///
/// Cloning is cheap and clones share the pool and the statement counter.
#[derive(Debug, Clone)]
pub struct DbClient {
    /// The database connection pool
    pool: Pool<sqlx::Any>,
    /// Statements dispatched through [`DbClient::pool`].
    queries: Arc<AtomicU64>,
}

impl DbClient {
    /// Create a new database client from the `[database]` section.
    ///
    /// # Errors
    ///
    /// * The database configuration is missing
    /// * The database URL is empty
    /// * The database connection fails
    pub async fn new(config: &Arc<AppConfig>) -> Result<Self, DbError> {
        let db_config = config
            .database
            .as_ref()
            .ok_or_else(|| DbError::ConfigError("Database configuration is missing".to_string()))?;

        Self::from_config(db_config).await
    }

    /// Create a new database client from a database configuration
    pub async fn from_config(db_config: &DatabaseConfig) -> Result<Self, DbError> {
        let db_url = &db_config.url;
        if db_url.is_empty() {
            return Err(DbError::ConfigError("Database URL is empty".to_string()));
        }

        Self::from_url(db_url).await
    }

    /// Create a new database client from a database URL
    ///
    /// `sqlite::memory:` gives a private in-memory database held by a single
    /// pooled connection, which is what the tests use.
    pub async fn from_url(db_url: &str) -> Result<Self, DbError> {
        if db_url.is_empty() {
            return Err(DbError::UrlError("Database URL is empty".to_string()));
        }

        let pool = Self::create_pool(db_url).await?;

        Ok(Self {
            pool,
            queries: Arc::new(AtomicU64::new(0)),
        })
    }

    async fn create_pool(db_url: &str) -> Result<Pool<sqlx::Any>, DbError> {
        debug!("Creating database pool with URL: {}", db_url);

        #[cfg(feature = "sqlite")]
        {
            sqlx::any::install_default_drivers();
        }

        let in_memory = db_url.contains(":memory:");

        // Every connection to :memory: is its own database, so keep exactly one alive.
        let pool_options = if in_memory {
            PoolOptions::<sqlx::Any>::new()
                .max_connections(1)
                .min_connections(1)
                .acquire_timeout(Duration::from_secs(3))
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            PoolOptions::<sqlx::Any>::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(3))
                .idle_timeout(Duration::from_secs(600))
        };

        if db_url.starts_with("sqlite:") && !in_memory {
            // Handle both "sqlite:foodbot.db" and "sqlite://foodbot.db"
            let db_path = db_url
                .strip_prefix("sqlite://")
                .or_else(|| db_url.strip_prefix("sqlite:"))
                .unwrap_or(db_url);
            let db_path = db_path.split('?').next().unwrap_or(db_path);
            Self::ensure_sqlite_file(db_path)?;
        }

        let connect_options = sqlx::any::AnyConnectOptions::from_str(db_url)
            .map_err(|e| DbError::UrlError(e.to_string()))?;

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                error!("Failed to create database pool: {}", e);
                DbError::PoolError(e.to_string())
            })?;

        info!("Database pool created successfully");
        Ok(pool)
    }

    /// SQLite refuses to open a file whose directory does not exist.
    fn ensure_sqlite_file(db_path: &str) -> Result<(), DbError> {
        if db_path.is_empty() {
            return Ok(());
        }
        let path = std::path::Path::new(db_path);

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                debug!("Creating directory for SQLite database: {:?}", dir);
                std::fs::create_dir_all(dir).map_err(|e| {
                    error!("Failed to create directory for SQLite database: {}", e);
                    DbError::PoolError(format!("Failed to create directory: {}", e))
                })?;
            }
        }

        if !path.exists() {
            debug!("Creating empty SQLite database file: {}", db_path);
            std::fs::File::create(path).map_err(|e| {
                error!("Failed to create SQLite database file: {}", e);
                DbError::PoolError(format!("Failed to create database file: {}", e))
            })?;
        }
        Ok(())
    }

    /// Get the database connection pool, counting the access as one statement.
    pub fn pool(&self) -> &Pool<sqlx::Any> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        &self.pool
    }

    /// Number of statements dispatched through [`DbClient::pool`] since creation or the last reset.
    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    pub fn reset_query_count(&self) {
        self.queries.store(0, Ordering::Relaxed);
    }

    /// Begin a transaction. Dropping it without `commit` rolls back.
    pub async fn begin(&self) -> Result<DbTransaction<'_>, DbError> {
        self.pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))
    }

    /// Execute a statement that returns no rows, returning the number of rows affected.
    pub async fn execute(&self, query: &str) -> Result<u64, DbError> {
        sqlx::query(query)
            .execute(self.pool())
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| DbError::QueryError(e.to_string()))
    }

    /// Check if the database is healthy
    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

impl std::fmt::Display for DbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DbClient")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_client_is_healthy() {
        let client = DbClient::from_url("sqlite::memory:").await.unwrap();
        assert!(client.is_healthy().await);
    }

    #[tokio::test]
    async fn test_empty_url_rejected() {
        let err = DbClient::from_url("").await.unwrap_err();
        assert!(matches!(err, DbError::UrlError(_)));
    }

    #[tokio::test]
    async fn test_query_counter() {
        let client = DbClient::from_url("sqlite::memory:").await.unwrap();
        client.reset_query_count();
        client.execute("CREATE TABLE t (x INTEGER)").await.unwrap();
        client.execute("INSERT INTO t VALUES (1)").await.unwrap();
        assert_eq!(client.query_count(), 2);
        let clone = client.clone();
        clone.reset_query_count();
        assert_eq!(client.query_count(), 0);
    }
}
