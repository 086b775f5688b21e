// --- File: crates/foodbot_kitchen/src/logic.rs ---
//
// Menu configuration, the deadline gate, week planning and the guest tally.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use foodbot_common::models::{DEADLINE_FORMAT, DEFAULT_DEADLINE};
use foodbot_common::validation::sanitize_string;
use foodbot_common::{FoodbotError, GuestEntry, MenuInput, MenuOfDay, MenuOption, PresetMenu};
use foodbot_db::{
    DayDeletion, DbError, GuestRepository, MenuRecord, MenuRepository, PresetMenuRepository,
    Repositories,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

const DESCRIPTION_MAX: usize = 500;
const MENU_NAME_MAX: usize = 200;

// --- Error Handling ---
#[derive(Error, Debug)]
pub enum KitchenError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("No menu for {0}")]
    NotFound(NaiveDate),
    #[error("No preset menu with id {0}")]
    PresetNotFound(i64),
    #[error("Preset menu '{0}' already exists")]
    DuplicatePreset(String),
    #[error("Storage failure: {0}")]
    Storage(#[from] DbError),
}

impl From<KitchenError> for FoodbotError {
    fn from(err: KitchenError) -> Self {
        match err {
            KitchenError::Validation(msg) => FoodbotError::ValidationError(msg),
            KitchenError::NotFound(date) => FoodbotError::NotFoundError(format!("menu for {}", date)),
            KitchenError::PresetNotFound(id) => FoodbotError::NotFoundError(format!("preset menu {}", id)),
            err @ KitchenError::DuplicatePreset(_) => FoodbotError::ConflictError(err.to_string()),
            KitchenError::Storage(db) => db.into(),
        }
    }
}

// --- Deadline Gate ---

/// Whether new sign-ups for `menu.date` are accepted at local time `now`.
///
/// True when the gate is disabled, when `menu.date` is not `now`'s date, or
/// when `now` is strictly before the deadline. A date in the past counts as
/// open here as well; the sign-up workflow rejects past dates on its own.
pub fn is_registration_open(menu: &MenuOfDay, now: NaiveDateTime) -> bool {
    if !menu.deadline_enabled {
        return true;
    }
    if menu.date != now.date() {
        return true;
    }
    now.time() < menu.deadline_time()
}

/// Parse `HH:MM`, falling back to `fallback` when `raw` is absent or blank.
pub fn parse_deadline(raw: Option<&str>, fallback: &str) -> Result<String, KitchenError> {
    let candidate = raw.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(fallback);
    NaiveTime::parse_from_str(candidate, DEADLINE_FORMAT)
        .map(|t| t.format(DEADLINE_FORMAT).to_string())
        .map_err(|_| KitchenError::Validation(format!("deadline '{}' is not HH:MM", candidate)))
}

// --- Menu Configuration ---

/// Turn submitted menu fields into the row that gets stored.
///
/// Two-menu mode stores both names and the description `"{menu1} / {menu2}"`;
/// single mode stores only the description and clears the names.
pub fn normalize_menu(
    date: NaiveDate,
    input: &MenuInput,
    default_deadline: &str,
) -> Result<MenuRecord, KitchenError> {
    let registration_deadline =
        parse_deadline(input.registration_deadline.as_deref(), default_deadline)?;

    let clean = |value: &Option<String>, max: usize| {
        value
            .as_deref()
            .and_then(|v| sanitize_string(v, max))
            .unwrap_or_default()
    };

    let (description, menu1_name, menu2_name) = if input.two_menus {
        let menu1 = clean(&input.menu1_name, MENU_NAME_MAX);
        let menu2 = clean(&input.menu2_name, MENU_NAME_MAX);
        (
            format!("{} / {}", menu1, menu2),
            Some(menu1).filter(|s| !s.is_empty()),
            Some(menu2).filter(|s| !s.is_empty()),
        )
    } else {
        (clean(&input.description, DESCRIPTION_MAX), None, None)
    };

    Ok(MenuRecord {
        date,
        description,
        two_menus: input.two_menus,
        menu1_name,
        menu2_name,
        registration_deadline,
        deadline_enabled: input.deadline_enabled,
    })
}

pub async fn get_menu(repos: &Repositories, date: NaiveDate) -> Result<Option<MenuOfDay>, KitchenError> {
    Ok(repos.menus.find_by_date(date).await?)
}

/// Create or replace the menu of `date`. Saving twice leaves one row.
pub async fn upsert_menu(
    repos: &Repositories,
    date: NaiveDate,
    input: &MenuInput,
    default_deadline: &str,
) -> Result<MenuOfDay, KitchenError> {
    let record = normalize_menu(date, input, default_deadline)?;
    let saved = repos.menus.upsert(&record).await?;
    info!(
        "Menu for {} saved (two menus: {}, deadline {} {})",
        date,
        saved.two_menus,
        saved.registration_deadline,
        if saved.deadline_enabled { "on" } else { "off" }
    );
    Ok(saved)
}

// --- Week Planning ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlannedDay {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub date: NaiveDate,
    /// English weekday name, e.g. "Monday".
    pub weekday: String,
    pub is_today: bool,
    pub menu: Option<MenuOfDay>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeekOverview {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub start: NaiveDate,
    pub days: Vec<PlannedDay>,
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// Seven consecutive days from `start`, each with its menu if one is planned.
pub async fn week_overview(
    repos: &Repositories,
    start: NaiveDate,
    today: NaiveDate,
) -> Result<WeekOverview, KitchenError> {
    let end = start + Days::new(6);
    let mut menus = repos.menus.find_range(start, end).await?.into_iter().peekable();

    let days = start
        .iter_days()
        .take(7)
        .map(|date| {
            let menu = menus.next_if(|m| m.date == date);
            PlannedDay {
                date,
                weekday: weekday_name(date.weekday()).to_string(),
                is_today: date == today,
                menu,
            }
        })
        .collect();

    Ok(WeekOverview { start, days })
}

/// Plan `date` with an empty single menu. Returns `false` if it already had one.
pub async fn add_day(
    repos: &Repositories,
    date: NaiveDate,
    default_deadline: &str,
) -> Result<bool, KitchenError> {
    let record = MenuRecord {
        date,
        description: String::new(),
        two_menus: false,
        menu1_name: None,
        menu2_name: None,
        registration_deadline: parse_deadline(None, default_deadline)
            .unwrap_or_else(|_| DEFAULT_DEADLINE.to_string()),
        deadline_enabled: true,
    };
    let created = repos.menus.insert_if_absent(&record).await?;
    debug!("add_day {}: created={}", date, created);
    Ok(created)
}

/// Remove the menu of `date` and that day's registrations in one transaction.
pub async fn delete_day(repos: &Repositories, date: NaiveDate) -> Result<DayDeletion, KitchenError> {
    let deletion = repos.menus.delete_day(date).await?;
    if !deletion.menu_deleted {
        return Err(KitchenError::NotFound(date));
    }
    Ok(deletion)
}

// --- Preset Menus ---

pub async fn list_presets(repos: &Repositories) -> Result<Vec<PresetMenu>, KitchenError> {
    Ok(repos.presets.list().await?)
}

/// Add a dish name to the end of the pick list.
pub async fn create_preset(repos: &Repositories, name: &str) -> Result<PresetMenu, KitchenError> {
    let name = sanitize_string(name, MENU_NAME_MAX)
        .ok_or_else(|| KitchenError::Validation("preset name must not be empty".to_string()))?;

    match repos.presets.create(&name).await {
        Ok(preset) => Ok(preset),
        Err(e) if e.is_unique_violation() => Err(KitchenError::DuplicatePreset(name)),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_preset(repos: &Repositories, id: i64) -> Result<PresetMenu, KitchenError> {
    let removed = repos
        .presets
        .delete(id)
        .await?
        .ok_or(KitchenError::PresetNotFound(id))?;
    info!("Preset menu '{}' removed", removed.name);
    Ok(removed)
}

// --- Guest Counter ---

/// Clamp a guest count into `[0, max]`.
pub fn clamp_guest_count(count: i64, max: i64) -> i64 {
    count.clamp(0, max.max(0))
}

/// Count after applying `delta` to `current`.
///
/// A step that would drop below zero, or raise the count above `max`, leaves
/// `current` unchanged. Decrements stay allowed on a count that sits above a
/// lowered `max`.
pub fn apply_guest_delta(current: i64, delta: i64, max: i64) -> i64 {
    let next = current.saturating_add(delta);
    if next < 0 || (delta > 0 && next > max.max(0)) {
        current
    } else {
        next
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuestTally {
    pub option1: i64,
    pub option2: i64,
    pub total: i64,
}

impl GuestTally {
    pub fn from_entries(entries: &[GuestEntry]) -> Self {
        let mut tally = GuestTally::default();
        for entry in entries {
            match entry.menu_choice {
                MenuOption::One => tally.option1 += entry.count,
                MenuOption::Two => tally.option2 += entry.count,
            }
        }
        tally.total = tally.option1 + tally.option2;
        tally
    }
}

/// Add `delta` walk-ins. Steps past either bound are ignored.
pub async fn adjust_guests(
    repos: &Repositories,
    date: NaiveDate,
    option: MenuOption,
    delta: i64,
    max_guests: i64,
) -> Result<GuestEntry, KitchenError> {
    let entry = repos
        .guests
        .adjust(date, option, delta, max_guests.max(0))
        .await?;
    debug!(
        "Guests {} option {} -> {}",
        date,
        option.as_i64(),
        entry.count
    );
    Ok(entry)
}

pub async fn set_guests(
    repos: &Repositories,
    date: NaiveDate,
    option: MenuOption,
    count: i64,
    max_guests: i64,
) -> Result<GuestEntry, KitchenError> {
    Ok(repos
        .guests
        .set(date, option, count, max_guests.max(0))
        .await?)
}

pub async fn guests_for_date(repos: &Repositories, date: NaiveDate) -> Result<GuestTally, KitchenError> {
    let entries = repos.guests.find_for_date(date).await?;
    Ok(GuestTally::from_entries(&entries))
}
