// --- File: crates/foodbot_reporting/src/logic.rs ---
//
// Read-only aggregation over the ledger, the guest counter and the menus.
// Range reports use a fixed number of grouped queries, however many days
// they cover.

use chrono::{Datelike, Days, NaiveDate};
use foodbot_common::{FoodbotError, MenuOption, Registration, User};
use foodbot_db::{
    DbError, MenuRepository, OptionCount, RegistrationRepository, Repositories, StatsRepository,
    UserHistoryRow, UserRepository,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Window of the per-user detail view.
pub const USER_DETAIL_DAYS: u64 = 180;
/// How far back the menu-day overview looks, and how many days it lists.
pub const MENU_DAYS_LOOKBACK: u64 = 180;
pub const MENU_DAYS_LIMIT: i64 = 14;
pub const TOP_EATERS: usize = 10;

// --- Error Handling ---
#[derive(Error, Debug)]
pub enum ReportingError {
    #[error("User not found: {0}")]
    NotFound(i64),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Storage failure: {0}")]
    Storage(#[from] DbError),
}

impl From<ReportingError> for FoodbotError {
    fn from(err: ReportingError) -> Self {
        match err {
            ReportingError::NotFound(id) => FoodbotError::NotFoundError(format!("user {}", id)),
            ReportingError::Validation(msg) => FoodbotError::ValidationError(msg),
            ReportingError::Storage(db) => db.into(),
        }
    }
}

// --- Day Summaries ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegisteredPerson {
    pub name: String,
    pub personal_number: String,
    #[cfg_attr(feature = "openapi", schema(value_type = i64))]
    pub option: MenuOption,
}

/// Counts for one day. `menu` is `None` when nothing was planned.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DaySummary {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub date: NaiveDate,
    pub menu: Option<String>,
    pub registrations: i64,
    pub registrations_option1: i64,
    pub registrations_option2: i64,
    pub guests: i64,
    pub guests_option1: i64,
    pub guests_option2: i64,
    /// Registrations plus guests for option 1.
    pub option1_total: i64,
    pub option2_total: i64,
    pub total: i64,
    /// Only filled by the single-day report.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub registered_users: Vec<RegisteredPerson>,
}

impl DaySummary {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            menu: None,
            registrations: 0,
            registrations_option1: 0,
            registrations_option2: 0,
            guests: 0,
            guests_option1: 0,
            guests_option2: 0,
            option1_total: 0,
            option2_total: 0,
            total: 0,
            registered_users: Vec::new(),
        }
    }

    fn add_registrations(&mut self, option: MenuOption, count: i64) {
        match option {
            MenuOption::One => self.registrations_option1 += count,
            MenuOption::Two => self.registrations_option2 += count,
        }
    }

    fn add_guests(&mut self, option: MenuOption, count: i64) {
        match option {
            MenuOption::One => self.guests_option1 += count,
            MenuOption::Two => self.guests_option2 += count,
        }
    }

    /// Recompute the derived totals from the per-option counts.
    fn finish(mut self) -> Self {
        self.registrations = self.registrations_option1 + self.registrations_option2;
        self.guests = self.guests_option1 + self.guests_option2;
        self.option1_total = self.registrations_option1 + self.guests_option1;
        self.option2_total = self.registrations_option2 + self.guests_option2;
        self.total = self.registrations + self.guests;
        self
    }
}

/// Fold grouped counts and menu descriptions into one summary per day.
fn fold_days(
    days: impl IntoIterator<Item = NaiveDate>,
    registrations: &[OptionCount],
    guests: &[OptionCount],
    menus: Vec<(NaiveDate, String)>,
) -> BTreeMap<NaiveDate, DaySummary> {
    let mut by_date: BTreeMap<NaiveDate, DaySummary> = days
        .into_iter()
        .map(|date| (date, DaySummary::empty(date)))
        .collect();

    for row in registrations {
        if let Some(day) = by_date.get_mut(&row.date) {
            day.add_registrations(row.option, row.count);
        }
    }
    for row in guests {
        if let Some(day) = by_date.get_mut(&row.date) {
            day.add_guests(row.option, row.count);
        }
    }
    for (date, description) in menus {
        if let Some(day) = by_date.get_mut(&date) {
            day.menu = Some(description);
        }
    }

    by_date
        .into_iter()
        .map(|(date, day)| (date, day.finish()))
        .collect()
}

/// Everything about one date, including who signed up.
pub async fn day_summary(repos: &Repositories, date: NaiveDate) -> Result<DaySummary, ReportingError> {
    let registrations = repos.stats.registration_counts(date, date).await?;
    let guests = repos.stats.guest_counts(date, date).await?;
    let menu = repos
        .menus
        .find_by_date(date)
        .await?
        .map(|m| (m.date, m.description));

    let mut summary = fold_days([date], &registrations, &guests, menu.into_iter().collect())
        .remove(&date)
        .unwrap_or_else(|| DaySummary::empty(date));

    summary.registered_users = repos
        .stats
        .registered_users(date)
        .await?
        .into_iter()
        .map(|u| RegisteredPerson {
            name: u.name,
            personal_number: u.personal_number,
            option: u.option,
        })
        .collect();

    Ok(summary)
}

/// Clamp a requested day count into `[1, max]`, using `default` when absent.
pub fn clamp_days(requested: Option<i64>, default: u32, max: u32) -> u32 {
    let max = max.max(1);
    match requested {
        Some(days) => days.clamp(1, i64::from(max)) as u32,
        None => default.clamp(1, max),
    }
}

/// The `days` days ending at `end`, newest first.
///
/// Issues three grouped queries regardless of `days`.
pub async fn range_summary(
    repos: &Repositories,
    end: NaiveDate,
    days: u32,
) -> Result<Vec<DaySummary>, ReportingError> {
    let days = days.max(1);
    let start = end - Days::new(u64::from(days - 1));

    let registrations = repos.stats.registration_counts(start, end).await?;
    let guests = repos.stats.guest_counts(start, end).await?;
    let menus = repos.stats.menu_descriptions(start, end).await?;
    debug!("range_summary {}..={} ({} days)", start, end, days);

    let span = start.iter_days().take(days as usize);
    Ok(fold_days(span, &registrations, &guests, menus)
        .into_values()
        .rev()
        .collect())
}

// --- Attendance History ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryOverview {
    pub total_users: usize,
    /// Every user, by name.
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
    pub users: Vec<UserHistoryRow>,
    /// Most registrations in the last 90 days.
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<Object>))]
    pub top_eaters: Vec<UserHistoryRow>,
}

/// 7/30/90-day counts and the last sign-up of every user, from one grouped query.
pub async fn user_history(repos: &Repositories, today: NaiveDate) -> Result<Vec<UserHistoryRow>, ReportingError> {
    Ok(repos
        .stats
        .user_history(today - Days::new(7), today - Days::new(30), today - Days::new(90))
        .await?)
}

/// The `n` users with the most registrations in the last 90 days.
///
/// Ties keep the name order of `rows`.
pub fn top_eaters(rows: &[UserHistoryRow], n: usize) -> Vec<UserHistoryRow> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| b.count_90.cmp(&a.count_90));
    ranked.truncate(n);
    ranked
}

pub async fn history_overview(repos: &Repositories, today: NaiveDate) -> Result<HistoryOverview, ReportingError> {
    let users = user_history(repos, today).await?;
    Ok(HistoryOverview {
        total_users: users.len(),
        top_eaters: top_eaters(&users, TOP_EATERS),
        users,
    })
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MonthCount {
    /// `YYYY-MM`
    pub month: String,
    pub count: i64,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserDetail {
    pub user: User,
    /// Newest first.
    pub registrations: Vec<Registration>,
    /// Newest month first.
    pub by_month: Vec<MonthCount>,
    pub total: usize,
}

pub fn count_by_month(registrations: &[Registration]) -> Vec<MonthCount> {
    let mut months: BTreeMap<(i32, u32), i64> = BTreeMap::new();
    for registration in registrations {
        *months
            .entry((registration.date.year(), registration.date.month()))
            .or_default() += 1;
    }
    months
        .into_iter()
        .rev()
        .map(|((year, month), count)| MonthCount {
            month: format!("{:04}-{:02}", year, month),
            count,
        })
        .collect()
}

/// A user's sign-ups over the last 180 days with per-month counts.
pub async fn user_detail(
    repos: &Repositories,
    user_id: i64,
    today: NaiveDate,
) -> Result<UserDetail, ReportingError> {
    let user = repos
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(ReportingError::NotFound(user_id))?;
    let registrations = repos
        .registrations
        .find_for_user_since(user_id, today - Days::new(USER_DETAIL_DAYS))
        .await?;

    Ok(UserDetail {
        user,
        by_month: count_by_month(&registrations),
        total: registrations.len(),
        registrations,
    })
}

// --- Menu Days ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MenuDayOverview {
    /// Newest first.
    pub days: Vec<DaySummary>,
    /// Mean total over the listed days that had anyone eating, one decimal.
    pub average: f64,
}

pub fn average_total(days: &[DaySummary]) -> f64 {
    let totals: Vec<i64> = days.iter().map(|d| d.total).filter(|t| *t > 0).collect();
    if totals.is_empty() {
        return 0.0;
    }
    let mean = totals.iter().sum::<i64>() as f64 / totals.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// The most recent days that had a menu, with their counts.
pub async fn menu_day_overview(repos: &Repositories, today: NaiveDate) -> Result<MenuDayOverview, ReportingError> {
    let menus = repos
        .stats
        .recent_menu_days(today - Days::new(MENU_DAYS_LOOKBACK), MENU_DAYS_LIMIT)
        .await?;

    let (Some(newest), Some(oldest)) = (menus.first().map(|m| m.0), menus.last().map(|m| m.0))
    else {
        return Ok(MenuDayOverview {
            days: Vec::new(),
            average: 0.0,
        });
    };

    let registrations = repos.stats.registration_counts(oldest, newest).await?;
    let guests = repos.stats.guest_counts(oldest, newest).await?;
    let dates: Vec<NaiveDate> = menus.iter().map(|m| m.0).collect();

    let days: Vec<DaySummary> = fold_days(dates, &registrations, &guests, menus)
        .into_values()
        .rev()
        .collect();

    Ok(MenuDayOverview {
        average: average_total(&days),
        days,
    })
}

// --- User Directory ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserListing {
    pub id: i64,
    pub name: String,
    pub personal_number: String,
    pub card_id: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UsersPage {
    pub users: Vec<UserListing>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub pages: i64,
}

/// One page of the directory ordered by name. `page` starts at 1.
pub async fn users_page(
    repos: &Repositories,
    page: u32,
    per_page: u32,
) -> Result<UsersPage, ReportingError> {
    if page < 1 {
        return Err(ReportingError::Validation("page must be >= 1".to_string()));
    }
    let per_page = per_page.max(1);
    let offset = i64::from(page - 1) * i64::from(per_page);

    let total = repos.users.count().await?;
    let users = repos
        .users
        .list_page(offset, i64::from(per_page))
        .await?
        .into_iter()
        .map(|u| UserListing {
            id: u.id,
            name: u.name,
            personal_number: u.personal_number,
            card_id: u.card_id,
        })
        .collect();

    Ok(UsersPage {
        users,
        page,
        per_page,
        total,
        pages: (total + i64::from(per_page) - 1) / i64::from(per_page),
    })
}
