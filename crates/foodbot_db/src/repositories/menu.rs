//! Repository for per-day menu configuration

use crate::error::DbError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use foodbot_common::models::MenuOfDay;

/// A normalised menu ready to be written.
///
/// Produced by the kitchen logic; the repository stores it as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRecord {
    pub date: NaiveDate,
    pub description: String,
    pub two_menus: bool,
    pub menu1_name: Option<String>,
    pub menu2_name: Option<String>,
    pub registration_deadline: String,
    pub deadline_enabled: bool,
}

/// Outcome of removing a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DayDeletion {
    pub menu_deleted: bool,
    pub registrations_deleted: u64,
}

/// Repository for menus
pub trait MenuRepository {
    /// Create the `menus` table if it doesn't exist
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    fn find_by_date(
        &self,
        date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Option<MenuOfDay>, DbError>> + Send;

    /// Menus with `start <= date <= end`, oldest first.
    fn find_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<MenuOfDay>, DbError>> + Send;

    /// Insert or replace the menu for `record.date`.
    ///
    /// Reads and writes inside one transaction. If a concurrent writer inserts
    /// the same date first, the write falls back to an update of that row.
    fn upsert(
        &self,
        record: &MenuRecord,
    ) -> impl std::future::Future<Output = Result<MenuOfDay, DbError>> + Send;

    /// Insert `record` unless the date already has a menu. Returns whether a row was created.
    fn insert_if_absent(
        &self,
        record: &MenuRecord,
    ) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;

    /// Delete the menu of `date` together with that day's registrations.
    ///
    /// Nothing is touched when the date has no menu.
    fn delete_day(
        &self,
        date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<DayDeletion, DbError>> + Send;
}
