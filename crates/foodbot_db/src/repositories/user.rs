//! Repository for users (the directory)
//!
//! Lookups are exact matches. Card ids are compared in uppercase, the form
//! they are stored in.

use crate::error::DbError;

pub use foodbot_common::models::{NewUser, User};

/// Repository for users
pub trait UserRepository {
    /// Create the `users` table if it doesn't exist
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Insert a user.
    ///
    /// Fails with [`DbError::UniqueViolation`] when the personal number or card id is taken.
    fn create(
        &self,
        user: &NewUser,
    ) -> impl std::future::Future<Output = Result<User, DbError>> + Send;

    /// Replace name, personal number and card id. `None` when the id is unknown.
    fn update(
        &self,
        id: i64,
        user: &NewUser,
    ) -> impl std::future::Future<Output = Result<Option<User>, DbError>> + Send;

    /// Delete a user together with all of their registrations, atomically.
    ///
    /// Returns `false` when no such user existed.
    fn delete(&self, id: i64) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;

    fn find_by_id(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<User>, DbError>> + Send;

    fn find_by_personal_number(
        &self,
        personal_number: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, DbError>> + Send;

    fn find_by_card_id(
        &self,
        card_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, DbError>> + Send;

    fn find_by_mobile_token(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, DbError>> + Send;

    /// Store a mobile token unless the user already has one.
    ///
    /// `false` when the id is unknown or a token was already set.
    fn set_mobile_token(
        &self,
        id: i64,
        token: &str,
    ) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;

    /// One page of users ordered by name.
    fn list_page(
        &self,
        offset: i64,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<User>, DbError>> + Send;

    fn count(&self) -> impl std::future::Future<Output = Result<i64, DbError>> + Send;
}
