// --- File: crates/foodbot_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. sqlite:data/foodbot.db, overridden via FOODBOT__DATABASE__URL
}

// --- Canteen Rules ---
/// Business rules for the daily sign-up.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CanteenConfig {
    /// IANA zone name used to decide what "today" and "now" are.
    pub timezone: String,
    /// Upper bound for every guest counter row.
    pub max_guests: i64,
    /// Deadline applied to menus created without an explicit one (HH:MM).
    pub default_deadline: String,
    pub stats_default_days: u32,
    pub stats_max_days: u32,
    pub users_default_per_page: u32,
    pub users_max_per_page: u32,
}

impl Default for CanteenConfig {
    fn default() -> Self {
        Self {
            timezone: "Europe/Berlin".to_string(),
            max_guests: 50,
            default_deadline: "19:45".to_string(),
            stats_default_days: 7,
            stats_max_days: 90,
            users_default_per_page: 50,
            users_max_per_page: 100,
        }
    }
}

// --- Notifications ---
// Webhook URL may also come from the legacy WEBHOOK_URL variable.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NotificationConfig {
    pub webhook_url: Option<String>,
    #[serde(default = "default_notification_timeout")]
    pub timeout_secs: u64,
}

fn default_notification_timeout() -> u64 {
    5
}

// --- Admin ---
// Password loaded from FOODBOT_SECRET_ADMIN_PASSWORD or ADMIN_PASSWORD when absent here.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AdminConfig {
    pub password: Option<String>,
}

// --- RFID Reader ---
// Token loaded from FOODBOT_SECRET_RFID_READER_TOKEN or RFID_READER_TOKEN when absent here.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RfidConfig {
    /// Shared secret the reader bridge sends in `X-Reader-Token`.
    pub reader_token: Option<String>,
}

// --- Rate Limits ---
/// Per-client request budgets, counted in fixed one-minute windows.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub register_per_minute: u32,
    pub status_per_minute: u32,
    pub rfid_scan_per_minute: u32,
    /// Key clients by the first `X-Forwarded-For` entry. Only set this behind a proxy.
    pub trust_forwarded_for: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            register_per_minute: 10,
            status_per_minute: 30,
            rfid_scan_per_minute: 60,
            trust_forwarded_for: false,
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_notifications: bool,
    #[serde(default)]
    pub use_rfid: bool,
    #[serde(default)]
    pub use_admin: bool,

    #[serde(default)]
    pub canteen: CanteenConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    // --- Optional Sections ---
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub notifications: Option<NotificationConfig>,
    #[serde(default)]
    pub admin: Option<AdminConfig>,
    #[serde(default)]
    pub rfid: Option<RfidConfig>,
}
