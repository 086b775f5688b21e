//! Environment variable naming for FoodBot.
//!
//! Configuration values use `FOODBOT__SECTION__KEY`, secrets use
//! `FOODBOT_SECRET_SECTION_KEY`. Older deployments exported bare names such as
//! `ADMIN_PASSWORD` or `WEBHOOK_URL`; those are still honoured as a fallback.

use std::env;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "FOODBOT";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "FOODBOT_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Bare variable names that predate the prefixed scheme.
const LEGACY_ALIASES: &[(&str, &str)] = &[
    ("admin.password", "ADMIN_PASSWORD"),
    ("notifications.webhook_url", "WEBHOOK_URL"),
    ("notifications.enabled", "NOTIFICATIONS_ENABLED"),
];

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// `"server.port"` becomes `"FOODBOT__SERVER__PORT"`.
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to an environment variable name
///
/// `"admin.password"` becomes `"FOODBOT_SECRET_ADMIN_PASSWORD"`.
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a path to the bare variable name older deployments used.
pub fn legacy_path_to_env_var(path: &str) -> String {
    if let Some((_, alias)) = LEGACY_ALIASES.iter().find(|(p, _)| *p == path) {
        return (*alias).to_string();
    }

    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let section = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", section, key).to_uppercase()
}

/// Get an environment variable for a configuration path
pub fn get_config_env_var(path: &str) -> Option<String> {
    let env_var = config_path_to_env_var(path);
    env::var(&env_var).ok()
}

/// Get an environment variable for a secret path
///
/// The prefixed name wins; the legacy name is consulted only when it is unset.
pub fn get_secret_env_var(path: &str) -> Option<String> {
    if let Ok(value) = env::var(secret_path_to_env_var(path)) {
        return Some(value);
    }

    env::var(legacy_path_to_env_var(path)).ok()
}

/// Check if a path is a secret path
///
/// Paths containing "secret", "password", "token" or "webhook" are treated as secrets.
pub fn is_secret_path(path: &str) -> bool {
    let path_lower = path.to_lowercase();
    path_lower.contains("secret")
        || path_lower.contains("password")
        || path_lower.contains("token")
        || path_lower.contains("webhook")
}

/// Get an environment variable for a path, secret or not.
pub fn get_env_var(path: &str) -> Option<String> {
    if is_secret_path(path) {
        get_secret_env_var(path)
    } else {
        get_config_env_var(path).or_else(|| env::var(legacy_path_to_env_var(path)).ok())
    }
}
