//! Factory for creating database clients

use crate::client::DbClient;
use crate::error::DbError;
use crate::repositories::Repositories;
use foodbot_config::{AppConfig, DatabaseConfig};
use std::sync::Arc;
use tracing::debug;

/// Factory for creating database clients
///
/// Mirrors the constructors on [`DbClient`] and adds [`DbClientFactory::open`],
/// which also prepares the schema.
#[derive(Debug, Clone, Default)]
pub struct DbClientFactory;

impl DbClientFactory {
    pub fn new() -> Self {
        Self
    }

    /// Create a database client from the application configuration
    ///
    /// # Errors
    ///
    /// * The database configuration is missing
    /// * The database URL is missing
    /// * The database connection fails
    pub async fn from_app_config(&self, config: &Arc<AppConfig>) -> Result<DbClient, DbError> {
        debug!("Creating database client from application configuration");

        let db_config = config
            .database
            .as_ref()
            .ok_or_else(|| DbError::ConfigError("Database configuration is missing".to_string()))?;

        self.from_db_config(db_config).await
    }

    pub async fn from_db_config(&self, db_config: &DatabaseConfig) -> Result<DbClient, DbError> {
        DbClient::from_config(db_config).await
    }

    pub async fn from_url(&self, db_url: &str) -> Result<DbClient, DbError> {
        DbClient::from_url(db_url).await
    }

    /// Connect to `db_url` and create any missing tables.
    pub async fn open(&self, db_url: &str) -> Result<Repositories, DbError> {
        let repos = Repositories::new(self.from_url(db_url).await?);
        repos.init_schema().await?;
        Ok(repos)
    }
}
