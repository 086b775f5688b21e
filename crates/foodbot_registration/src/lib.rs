// --- File: crates/foodbot_registration/src/lib.rs ---

pub mod credential; // Credential lookup
#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod logic; // Toggle state machine
#[cfg(test)]
mod logic_proptest;
pub mod notify;
pub mod rfid;
pub mod routes;

pub use credential::{resolve_credential, Credential};
pub use handlers::RegistrationState;
pub use logic::{Ledger, LedgerState, RegistrationError, RegistrationOutcome, RequestedOption};
pub use notify::{LoggingNotifier, WebhookNotifier};
pub use rfid::RfidMailbox;
pub use routes::routes;
