//! Repository for walk-in guest counts
//!
//! Both mutations are a single upsert statement with the clamp to
//! `[0, max]` evaluated in SQL, so concurrent adjustments never lose an
//! update and never leave the range.

use crate::error::DbError;
use chrono::NaiveDate;
use foodbot_common::MenuOption;

pub use foodbot_common::models::GuestEntry;

/// Repository for guest counts
pub trait GuestRepository {
    /// Create the `guests` table if it doesn't exist
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// All guest rows of `date` (at most one per option).
    fn find_for_date(
        &self,
        date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<GuestEntry>, DbError>> + Send;

    /// Add `delta` to the count, creating the row at zero first if needed.
    ///
    /// A step that would go below zero or above `max` leaves the count as it was.
    fn adjust(
        &self,
        date: NaiveDate,
        option: MenuOption,
        delta: i64,
        max: i64,
    ) -> impl std::future::Future<Output = Result<GuestEntry, DbError>> + Send;

    /// Overwrite the count.
    fn set(
        &self,
        date: NaiveDate,
        option: MenuOption,
        count: i64,
        max: i64,
    ) -> impl std::future::Future<Output = Result<GuestEntry, DbError>> + Send;
}
