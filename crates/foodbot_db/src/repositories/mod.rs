//! Repository modules for database access
//!
//! Each table gets a trait describing what the rest of FoodBot needs from it
//! and a SQL implementation over the shared [`DbClient`].

pub mod admin_log;
pub mod admin_log_sql;
pub mod guest;
pub mod guest_sql;
pub mod menu;
pub mod menu_sql;
pub mod preset;
pub mod preset_sql;
pub mod registration;
pub mod registration_sql;
pub mod stats;
pub mod stats_sql;
pub mod user;
pub mod user_sql;

pub use admin_log::{AdminLogEntry, AdminLogRepository};
pub use admin_log_sql::SqlAdminLogRepository;
pub use guest::{GuestEntry, GuestRepository};
pub use guest_sql::SqlGuestRepository;
pub use menu::{DayDeletion, MenuOfDay, MenuRecord, MenuRepository};
pub use menu_sql::SqlMenuRepository;
pub use preset::{PresetMenu, PresetMenuRepository};
pub use preset_sql::SqlPresetMenuRepository;
pub use registration::{Registration, RegistrationRepository};
pub use registration_sql::SqlRegistrationRepository;
pub use stats::{OptionCount, RegisteredUser, StatsRepository, UserHistoryRow};
pub use stats_sql::SqlStatsRepository;
pub use user::{NewUser, User, UserRepository};
pub use user_sql::SqlUserRepository;

use crate::error::DbError;
use crate::{DbClient, RepositoryFactory};
use tracing::info;

/// Builds the SQL repositories from a [`DbClient`].
#[derive(Debug, Clone, Default)]
pub struct SqlRepositoryFactory;

impl SqlRepositoryFactory {
    pub fn new() -> Self {
        Self
    }
}

macro_rules! sql_factory {
    ($($repo:ty),* $(,)?) => {
        $(
            impl RepositoryFactory<$repo, DbClient> for SqlRepositoryFactory {
                fn create_repository(&self, db_client: DbClient) -> $repo {
                    <$repo>::new(db_client)
                }
            }
        )*
    };
}

sql_factory!(
    SqlUserRepository,
    SqlMenuRepository,
    SqlRegistrationRepository,
    SqlGuestRepository,
    SqlAdminLogRepository,
    SqlStatsRepository,
    SqlPresetMenuRepository,
);

/// All repositories over one client, as handed to the feature crates.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub users: SqlUserRepository,
    pub menus: SqlMenuRepository,
    pub registrations: SqlRegistrationRepository,
    pub guests: SqlGuestRepository,
    pub admin_log: SqlAdminLogRepository,
    pub stats: SqlStatsRepository,
    pub presets: SqlPresetMenuRepository,
    client: DbClient,
}

impl Repositories {
    pub fn new(db_client: DbClient) -> Self {
        Self::with_factory(&SqlRepositoryFactory, db_client)
    }

    pub fn with_factory<F>(factory: &F, db_client: DbClient) -> Self
    where
        F: RepositoryFactory<SqlUserRepository, DbClient>
            + RepositoryFactory<SqlMenuRepository, DbClient>
            + RepositoryFactory<SqlRegistrationRepository, DbClient>
            + RepositoryFactory<SqlGuestRepository, DbClient>
            + RepositoryFactory<SqlAdminLogRepository, DbClient>
            + RepositoryFactory<SqlStatsRepository, DbClient>
            + RepositoryFactory<SqlPresetMenuRepository, DbClient>,
    {
        Self {
            users: RepositoryFactory::<SqlUserRepository, _>::create_repository(factory, db_client.clone()),
            menus: RepositoryFactory::<SqlMenuRepository, _>::create_repository(factory, db_client.clone()),
            registrations: RepositoryFactory::<SqlRegistrationRepository, _>::create_repository(factory, db_client.clone()),
            guests: RepositoryFactory::<SqlGuestRepository, _>::create_repository(factory, db_client.clone()),
            admin_log: RepositoryFactory::<SqlAdminLogRepository, _>::create_repository(factory, db_client.clone()),
            stats: RepositoryFactory::<SqlStatsRepository, _>::create_repository(factory, db_client.clone()),
            presets: RepositoryFactory::<SqlPresetMenuRepository, _>::create_repository(factory, db_client.clone()),
            client: db_client,
        }
    }

    /// Create every table. Users come before registrations for the foreign key.
    pub async fn init_schema(&self) -> Result<(), DbError> {
        self.users.init_schema().await?;
        self.menus.init_schema().await?;
        self.registrations.init_schema().await?;
        self.guests.init_schema().await?;
        self.admin_log.init_schema().await?;
        self.presets.init_schema().await?;
        info!("Database schema ready");
        Ok(())
    }

    pub fn client(&self) -> &DbClient {
        &self.client
    }
}
