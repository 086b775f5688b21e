// --- File: crates/foodbot_admin/src/lib.rs ---

pub mod auth; // X-Admin-Password middleware
#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_test;
pub mod routes;

pub use auth::{admin_auth_middleware, AdminAuthState, AdminIdentity};
pub use handlers::AdminState;
pub use logic::{record_action, AdminError};
pub use routes::{require_admin, routes};
