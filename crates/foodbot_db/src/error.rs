//! Error types for the database client

use foodbot_common::FoodbotError;
use thiserror::Error;
use tracing::error;

/// Errors that can occur when working with the database client
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database URL parsing
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// Error with database transaction
    #[error("Database transaction error: {0}")]
    TransactionError(String),

    /// A UNIQUE constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A stored value could not be mapped back into a record
    #[error("Corrupt row: {0}")]
    DecodeError(String),
}

impl DbError {
    /// Classify a failed statement.
    ///
    /// Unique violations are expected under racing writers and are returned
    /// without an error log; everything else is logged with `context`.
    pub fn from_query(context: &str, err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() || db_err.message().contains("UNIQUE constraint failed")
            {
                return DbError::UniqueViolation(db_err.message().to_string());
            }
        }
        error!("{}: {}", context, err);
        DbError::QueryError(err.to_string())
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation(_))
    }
}

impl From<DbError> for FoodbotError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation(msg) => FoodbotError::ConflictError(msg),
            DbError::ConfigError(msg) | DbError::UrlError(msg) => FoodbotError::ConfigError(msg),
            other => FoodbotError::DatabaseError(other.to_string()),
        }
    }
}
