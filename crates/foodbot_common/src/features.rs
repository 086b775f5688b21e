//! Runtime feature switches.
//!
//! A feature is on when its `use_*` flag is set and, where it needs one,
//! its configuration section is present.
//!
//! - `use_notifications` + `[notifications]`: webhook notifier instead of log-only
//! - `use_rfid`: RFID mailbox routes
//! - `use_admin` + `[admin] password`: admin, kitchen and reporting routes

use foodbot_config::AppConfig;

/// Check if a feature is enabled at runtime based on configuration.
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

pub fn is_notifications_enabled(config: &AppConfig) -> bool {
    let webhook = config
        .notifications
        .as_ref()
        .and_then(|n| n.webhook_url.as_ref());
    is_feature_enabled(config.use_notifications, webhook)
}

pub fn is_rfid_enabled(config: &AppConfig) -> bool {
    config.use_rfid
}

pub fn is_admin_enabled(config: &AppConfig) -> bool {
    let password = config.admin.as_ref().and_then(|a| a.password.as_ref());
    is_feature_enabled(config.use_admin, password)
}
