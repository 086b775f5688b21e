//! Repository for the append-only admin log

use crate::error::DbError;

pub use foodbot_common::models::AdminLogEntry;

pub trait AdminLogRepository {
    /// Create the `admin_log` table if it doesn't exist
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Append an entry stamped with the current UTC time.
    fn append(
        &self,
        admin_user: &str,
        action: &str,
        details: Option<&str>,
    ) -> impl std::future::Future<Output = Result<AdminLogEntry, DbError>> + Send;

    /// Newest entries first.
    fn recent(
        &self,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<AdminLogEntry>, DbError>> + Send;
}
