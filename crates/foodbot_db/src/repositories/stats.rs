//! Read-only aggregate queries
//!
//! Every method is one grouped statement, whatever the size of the range.
//! Callers assemble per-day and per-user views from these rows in memory.

use crate::error::DbError;
use chrono::NaiveDate;
use foodbot_common::MenuOption;
use serde::{Deserialize, Serialize};

/// A count for one `(date, option)` cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionCount {
    pub date: NaiveDate,
    pub option: MenuOption,
    pub count: i64,
}

/// A user signed up for a specific day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub user_id: i64,
    pub name: String,
    pub personal_number: String,
    pub option: MenuOption,
}

/// Attendance counters for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserHistoryRow {
    pub user_id: i64,
    pub name: String,
    pub personal_number: String,
    pub count_7: i64,
    pub count_30: i64,
    pub count_90: i64,
    pub last_date: Option<NaiveDate>,
}

pub trait StatsRepository {
    /// Registrations in `[start, end]` grouped by date and option.
    fn registration_counts(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<OptionCount>, DbError>> + Send;

    /// Guests in `[start, end]` grouped by date and option.
    fn guest_counts(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<OptionCount>, DbError>> + Send;

    /// `(date, description)` of every menu in `[start, end]`.
    fn menu_descriptions(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<(NaiveDate, String)>, DbError>> + Send;

    /// The newest `limit` menus dated on or after `since`, newest first.
    fn recent_menu_days(
        &self,
        since: NaiveDate,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<(NaiveDate, String)>, DbError>> + Send;

    /// Users registered on `date`, ordered by name.
    fn registered_users(
        &self,
        date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<RegisteredUser>, DbError>> + Send;

    /// Per-user counts of registrations dated on or after each cut-off, plus
    /// the date of the latest registration. Includes users with none.
    fn user_history(
        &self,
        since_7: NaiveDate,
        since_30: NaiveDate,
        since_90: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<UserHistoryRow>, DbError>> + Send;
}
