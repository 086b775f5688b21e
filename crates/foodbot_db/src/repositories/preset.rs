//! Repository for the kitchen's preset dish names

use crate::error::DbError;

pub use foodbot_common::models::PresetMenu;

pub trait PresetMenuRepository {
    /// Create the `preset_menus` table if it doesn't exist
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// All presets in pick-list order.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<PresetMenu>, DbError>> + Send;

    /// Append `name` after the last preset.
    ///
    /// A name that already exists is a [`DbError::UniqueViolation`].
    fn create(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<PresetMenu, DbError>> + Send;

    /// Remove a preset, returning it if it existed.
    fn delete(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<PresetMenu>, DbError>> + Send;
}
