// --- File: crates/foodbot_common/src/lib.rs ---

pub mod error; // Error handling
pub mod features; // Runtime feature switches
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod models; // Persisted records
pub mod services; // Service abstractions
pub mod time; // Canteen-local clock
pub mod validation; // Input sanitising

pub use error::{config_error, FoodbotError, HttpStatusCode};

pub use http::{
    client::{post_with_timeout, HTTP_CLIENT},
    IntoHttpResponse,
};

pub use logging::{init, init_with_level};

pub use features::{
    is_admin_enabled, is_feature_enabled, is_notifications_enabled, is_rfid_enabled,
};

pub use models::{
    AdminLogEntry, GuestEntry, MenuInput, MenuOfDay, MenuOption, NewUser, PresetMenu,
    Registration, User,
};
