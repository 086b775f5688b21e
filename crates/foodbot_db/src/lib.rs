//! Database integration for FoodBot
//!
//! All persistence goes through SQLx's `Any` driver, with SQLite as the
//! default backend. Six tables are managed here:
//!
//! - `users`: the directory of people who can sign up
//! - `menus`: one configuration row per calendar day
//! - `registrations`: the ledger, unique on `(user_id, date)`
//! - `guests`: walk-in counts, unique on `(date, menu_choice)`
//! - `admin_log`: append-only audit trail
//! - `preset_menus`: the kitchen's pick list of dish names
//!
//! # Example
//!
//! ```rust,no_run
//! use foodbot_db::{DbClientFactory, UserRepository};
//!
//! async fn count_users() -> Result<i64, foodbot_db::DbError> {
//!     let repos = DbClientFactory::new().open("sqlite::memory:").await?;
//!     repos.users.count().await
//! }
//! ```

pub mod client;
pub mod error;
pub mod factory;
pub mod repositories;
pub mod repository;
mod rows;

#[cfg(test)]
mod repositories_test;

pub use client::{DbClient, DbTransaction};
pub use error::DbError;
pub use factory::DbClientFactory;
pub use repository::RepositoryFactory;

pub use repositories::{
    AdminLogEntry, AdminLogRepository, DayDeletion, GuestEntry, GuestRepository, MenuOfDay,
    MenuRecord, MenuRepository, NewUser, OptionCount, PresetMenu, PresetMenuRepository,
    RegisteredUser, Registration, RegistrationRepository, Repositories, SqlAdminLogRepository,
    SqlGuestRepository, SqlMenuRepository, SqlPresetMenuRepository, SqlRegistrationRepository,
    SqlRepositoryFactory, SqlStatsRepository, SqlUserRepository, StatsRepository, User,
    UserHistoryRow, UserRepository,
};
