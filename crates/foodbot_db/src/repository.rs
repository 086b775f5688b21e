//! Repository factory trait
//!
//! Feature crates receive repositories through this trait so they can be
//! wired against any database client.

/// A trait for database repository factories
///
/// Generic over the repository type and the configuration it is built from.
pub trait RepositoryFactory<R, C> {
    /// Create a new repository instance from `config`
    fn create_repository(&self, config: C) -> R;
}
