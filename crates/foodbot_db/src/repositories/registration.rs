//! Repository for the registration ledger
//!
//! One row per `(user_id, date)`. The unique constraint on that pair is what
//! keeps racing toggles from producing two rows: the loser of an insert race
//! gets [`DbError::UniqueViolation`].

use crate::error::DbError;
use chrono::NaiveDate;
use foodbot_common::MenuOption;

pub use foodbot_common::models::Registration;

/// Repository for registrations
pub trait RegistrationRepository {
    /// Create the `registrations` table if it doesn't exist
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    fn find(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Option<Registration>, DbError>> + Send;

    fn insert(
        &self,
        user_id: i64,
        date: NaiveDate,
        option: MenuOption,
    ) -> impl std::future::Future<Output = Result<Registration, DbError>> + Send;

    /// Delete the row for `(user_id, date)`. Returns whether a row was removed.
    fn delete(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;

    /// A user's registrations on or after `since`, newest first.
    fn find_for_user_since(
        &self,
        user_id: i64,
        since: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<Registration>, DbError>> + Send;
}
