// --- File: crates/foodbot_registration/src/logic.rs ---
//
// The sign-up state machine. Nothing is kept between requests: every call
// reads the ledger row and the day's menu and decides from those.

use crate::notify::dispatch;
use chrono::{NaiveDate, NaiveDateTime};
use foodbot_common::services::{RegistrationChange, RegistrationNotifier};
use foodbot_common::{FoodbotError, MenuOfDay, MenuOption, Registration, User};
use foodbot_db::{DbError, MenuRepository, RegistrationRepository, Repositories};
use foodbot_kitchen::is_registration_open;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

// --- Error Handling ---
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("User not found")]
    NotFound,
    #[error("Registration closed (deadline {deadline})")]
    Closed { deadline: String },
    #[error("No menu available for {0}")]
    NoMenu(NaiveDate),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Storage failure: {0}")]
    Storage(#[from] DbError),
}

impl From<RegistrationError> for FoodbotError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::NotFound => FoodbotError::NotFoundError("user".to_string()),
            closed @ RegistrationError::Closed { .. } => {
                FoodbotError::ConflictError(closed.to_string())
            }
            RegistrationError::NoMenu(date) => {
                FoodbotError::NotFoundError(format!("menu for {}", date))
            }
            RegistrationError::Validation(msg) => FoodbotError::ValidationError(msg),
            RegistrationError::Storage(db) => db.into(),
        }
    }
}

// --- Option Handling ---

/// The menu option a request asked for, before the day's menu is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestedOption {
    Absent,
    Chosen(MenuOption),
}

impl RequestedOption {
    /// `1`, `2`, `"1"` and `"2"` pick an option, any other present value
    /// means option 1. Missing and `null` stay [`RequestedOption::Absent`].
    pub fn from_raw(raw: Option<&serde_json::Value>) -> Self {
        match raw {
            None | Some(serde_json::Value::Null) => RequestedOption::Absent,
            Some(value) => RequestedOption::Chosen(MenuOption::coerce_json(Some(value))),
        }
    }

    /// The option to store, or `None` while a two-menu day still needs a choice.
    ///
    /// Single-menu days always store option 1.
    pub fn resolve(self, two_menus: bool) -> Option<MenuOption> {
        match (self, two_menus) {
            (_, false) => Some(MenuOption::One),
            (RequestedOption::Chosen(option), true) => Some(option),
            (RequestedOption::Absent, true) => None,
        }
    }
}

// --- States and Outcomes ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerState {
    Unregistered,
    AwaitingMenuChoice,
    Registered(MenuOption),
}

impl LedgerState {
    pub fn option(self) -> Option<MenuOption> {
        match self {
            LedgerState::Registered(option) => Some(option),
            _ => None,
        }
    }
}

/// Result of one sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// A row was created.
    Registered(MenuOption),
    /// A row was removed; carries its option when it was still there to read.
    Unregistered(Option<MenuOption>),
    /// Two-menu day and no option given. Nothing was written.
    NeedsChoice {
        menu1_name: Option<String>,
        menu2_name: Option<String>,
    },
    /// The request asked for the state the ledger was already in.
    Unchanged(LedgerState),
}

impl RegistrationOutcome {
    pub fn state(&self) -> LedgerState {
        match self {
            RegistrationOutcome::Registered(option) => LedgerState::Registered(*option),
            RegistrationOutcome::Unregistered(_) => LedgerState::Unregistered,
            RegistrationOutcome::NeedsChoice { .. } => LedgerState::AwaitingMenuChoice,
            RegistrationOutcome::Unchanged(state) => *state,
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MobileAction {
    Register,
    Unregister,
}

/// What the mobile page shows for a user and day.
#[derive(Debug, Clone, PartialEq)]
pub struct MobileStatus {
    pub user: User,
    pub date: NaiveDate,
    pub menu: Option<MenuOfDay>,
    pub state: LedgerState,
    pub registration_open: bool,
}

// --- Ledger ---

/// Sign-up workflow over the shared repositories.
#[derive(Clone)]
pub struct Ledger {
    repos: Repositories,
    notifier: Arc<dyn RegistrationNotifier>,
}

fn reject_past(date: NaiveDate, now: NaiveDateTime) -> Result<(), RegistrationError> {
    if date < now.date() {
        return Err(RegistrationError::Validation("date is in the past".to_string()));
    }
    Ok(())
}

fn ensure_open(menu: Option<&MenuOfDay>, now: NaiveDateTime) -> Result<(), RegistrationError> {
    match menu {
        Some(menu) if !is_registration_open(menu, now) => Err(RegistrationError::Closed {
            deadline: menu.registration_deadline.clone(),
        }),
        _ => Ok(()),
    }
}

impl Ledger {
    pub fn new(repos: Repositories, notifier: Arc<dyn RegistrationNotifier>) -> Self {
        Self { repos, notifier }
    }

    pub fn repos(&self) -> &Repositories {
        &self.repos
    }

    /// Current state of `(user, date)` as stored.
    pub async fn state(&self, user_id: i64, date: NaiveDate) -> Result<LedgerState, RegistrationError> {
        Ok(match self.repos.registrations.find(user_id, date).await? {
            Some(existing) => LedgerState::Registered(existing.menu_choice),
            None => LedgerState::Unregistered,
        })
    }

    /// Flip the user's sign-up for `date`.
    ///
    /// Cancelling is always allowed. Signing up honours the deadline gate and,
    /// on two-menu days, asks for a choice when none was given.
    pub async fn toggle_registration(
        &self,
        user: &User,
        date: NaiveDate,
        requested: RequestedOption,
        now: NaiveDateTime,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        reject_past(date, now)?;

        if let Some(existing) = self.repos.registrations.find(user.id, date).await? {
            return self.cancel(user, existing).await;
        }

        let menu = self.repos.menus.find_by_date(date).await?;
        ensure_open(menu.as_ref(), now)?;

        let two_menus = menu.as_ref().is_some_and(|m| m.two_menus);
        match requested.resolve(two_menus) {
            Some(option) => self.insert(user, date, option).await,
            None => Ok(needs_choice(menu.as_ref())),
        }
    }

    /// Second step of a two-menu sign-up. Never cancels an existing row.
    pub async fn register_with_option(
        &self,
        user: &User,
        date: NaiveDate,
        option: MenuOption,
        now: NaiveDateTime,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        reject_past(date, now)?;

        if let Some(existing) = self.repos.registrations.find(user.id, date).await? {
            return Ok(RegistrationOutcome::Unchanged(LedgerState::Registered(
                existing.menu_choice,
            )));
        }

        let menu = self.repos.menus.find_by_date(date).await?;
        ensure_open(menu.as_ref(), now)?;

        let two_menus = menu.as_ref().is_some_and(|m| m.two_menus);
        let option = RequestedOption::Chosen(option)
            .resolve(two_menus)
            .unwrap_or_default();
        self.insert(user, date, option).await
    }

    /// Explicit register or unregister from the mobile link, always for today.
    ///
    /// Unlike the kiosk, registering needs a planned menu.
    pub async fn mobile_action(
        &self,
        user: &User,
        action: MobileAction,
        requested: RequestedOption,
        now: NaiveDateTime,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let today = now.date();
        match action {
            MobileAction::Register => {
                let menu = self
                    .repos
                    .menus
                    .find_by_date(today)
                    .await?
                    .ok_or(RegistrationError::NoMenu(today))?;
                ensure_open(Some(&menu), now)?;

                if let Some(existing) = self.repos.registrations.find(user.id, today).await? {
                    return Ok(RegistrationOutcome::Unchanged(LedgerState::Registered(
                        existing.menu_choice,
                    )));
                }
                match requested.resolve(menu.two_menus) {
                    Some(option) => self.insert(user, today, option).await,
                    None => Ok(needs_choice(Some(&menu))),
                }
            }
            MobileAction::Unregister => {
                match self.repos.registrations.find(user.id, today).await? {
                    Some(existing) => self.cancel(user, existing).await,
                    None => Ok(RegistrationOutcome::Unchanged(LedgerState::Unregistered)),
                }
            }
        }
    }

    pub async fn mobile_status(
        &self,
        user: &User,
        now: NaiveDateTime,
    ) -> Result<MobileStatus, RegistrationError> {
        let date = now.date();
        let menu = self.repos.menus.find_by_date(date).await?;
        let state = self.state(user.id, date).await?;
        let registration_open = menu
            .as_ref()
            .is_some_and(|m| is_registration_open(m, now));

        Ok(MobileStatus {
            user: user.clone(),
            date,
            menu,
            state,
            registration_open,
        })
    }

    async fn cancel(
        &self,
        user: &User,
        existing: Registration,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let removed = self
            .repos
            .registrations
            .delete(user.id, existing.date)
            .await?;

        if removed {
            info!("Unregistered user {} for {}", user.id, existing.date);
            self.notify(user, false, existing.menu_choice, existing.date);
        } else {
            // A concurrent toggle got there first; the end state is the same.
            info!(
                "Registration of user {} for {} was already gone",
                user.id, existing.date
            );
        }
        Ok(RegistrationOutcome::Unregistered(Some(existing.menu_choice)))
    }

    async fn insert(
        &self,
        user: &User,
        date: NaiveDate,
        option: MenuOption,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        // One retry covers a row that a concurrent cancel removed between our
        // failed insert and the re-read.
        let mut retried = false;
        loop {
            match self.repos.registrations.insert(user.id, date, option).await {
                Ok(row) => {
                    info!(
                        "Registered user {} for {} (option {})",
                        user.id,
                        date,
                        row.menu_choice.as_i64()
                    );
                    self.notify(user, true, row.menu_choice, date);
                    return Ok(RegistrationOutcome::Registered(row.menu_choice));
                }
                Err(err) if err.is_unique_violation() => {
                    warn!("Insert race for user {} on {}, re-reading", user.id, date);
                    match self.repos.registrations.find(user.id, date).await? {
                        Some(existing) => {
                            return Ok(RegistrationOutcome::Unchanged(LedgerState::Registered(
                                existing.menu_choice,
                            )))
                        }
                        None if !retried => retried = true,
                        None => {
                            warn!(
                                "Registration of user {} for {} keeps flipping, leaving it unregistered",
                                user.id, date
                            );
                            return Ok(RegistrationOutcome::Unchanged(LedgerState::Unregistered));
                        }
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn notify(&self, user: &User, registered: bool, option: MenuOption, date: NaiveDate) {
        dispatch(
            &self.notifier,
            RegistrationChange {
                user_name: user.name.clone(),
                registered,
                option,
                date,
            },
        );
    }
}

fn needs_choice(menu: Option<&MenuOfDay>) -> RegistrationOutcome {
    RegistrationOutcome::NeedsChoice {
        menu1_name: menu.and_then(|m| m.menu1_name.clone()),
        menu2_name: menu.and_then(|m| m.menu2_name.clone()),
    }
}
