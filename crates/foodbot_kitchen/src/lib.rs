// --- File: crates/foodbot_kitchen/src/lib.rs ---
#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod routes;

pub use handlers::KitchenState;
pub use logic::{is_registration_open, KitchenError};
pub use routes::routes;
