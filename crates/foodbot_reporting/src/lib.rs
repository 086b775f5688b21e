// --- File: crates/foodbot_reporting/src/lib.rs ---
#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod logic;
pub mod routes;

pub use handlers::ReportingState;
pub use logic::{DaySummary, ReportingError};
pub use routes::{admin_routes, public_routes};
