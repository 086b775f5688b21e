//! Service abstractions for collaborators outside the registration core.
//!
//! The registration workflow only knows these traits; the backend decides
//! which implementation is wired in.

use crate::models::MenuOption;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// A registration row was created or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationChange {
    pub user_name: String,
    pub registered: bool,
    pub option: MenuOption,
    pub date: NaiveDate,
}

/// Outcome of a notification attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    /// Where the notification went ("log", "webhook", ...).
    pub channel: String,
    pub delivered: bool,
}

/// Receives sign-up changes, best effort.
///
/// Failures are logged by the caller and never reach the user.
pub trait RegistrationNotifier: Send + Sync {
    fn on_registration_changed(
        &self,
        change: RegistrationChange,
    ) -> BoxFuture<'_, NotificationResult, BoxedError>;
}

/// Provides the service implementations the backend wires into its routers.
pub trait ServiceFactory: Send + Sync {
    /// The notifier registration changes are reported to.
    fn registration_notifier(&self) -> Arc<dyn RegistrationNotifier>;
}
