use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod env_vars;
pub mod models;
pub use models::*;

/// Loads the layered configuration for the running process.
///
/// Sources, later ones winning:
/// 1. `config/default.*`
/// 2. `config/{RUN_ENV}.*` (RUN_ENV defaults to `debug`)
/// 3. `FOODBOT__SECTION__KEY` environment variables
///
/// The directory can be moved with `FOODBOT_CONFIG_DIR`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let config_dir = env::var("FOODBOT_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));
    load_config_from(&config_dir)
}

/// Same as [`load_config`] but reads the files from `config_dir`.
pub fn load_config_from(config_dir: &Path) -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    debug!("config: default_path: {}", default_path.display());
    debug!("config: env_path: {}", env_path.display());

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    Ok(apply_env_fallbacks(raw_config))
}

/// Fills secrets and flags that are still unset from their environment variables.
///
/// Values present in the files or in `FOODBOT__` variables are left alone.
pub fn apply_env_fallbacks(mut config: AppConfig) -> AppConfig {
    let admin_password_missing = config
        .admin
        .as_ref()
        .and_then(|a| a.password.as_ref())
        .is_none();
    if admin_password_missing {
        if let Some(password) = env_vars::get_secret_env_var("admin.password") {
            config.admin.get_or_insert_with(AdminConfig::default).password = Some(password);
            config.use_admin = true;
        }
    }

    let webhook_missing = config
        .notifications
        .as_ref()
        .and_then(|n| n.webhook_url.as_ref())
        .is_none();
    if webhook_missing {
        if let Some(url) = env_vars::get_secret_env_var("notifications.webhook_url") {
            config
                .notifications
                .get_or_insert_with(|| NotificationConfig {
                    webhook_url: None,
                    timeout_secs: 5,
                })
                .webhook_url = Some(url);
        }
    }

    let reader_token_missing = config
        .rfid
        .as_ref()
        .and_then(|r| r.reader_token.as_ref())
        .is_none();
    if reader_token_missing {
        if let Some(token) = env_vars::get_secret_env_var("rfid.reader_token") {
            config.rfid.get_or_insert_with(RfidConfig::default).reader_token = Some(token);
        }
    }

    if let Some(flag) = env_vars::get_env_var("notifications.enabled") {
        if flag.eq_ignore_ascii_case("true") {
            config.use_notifications = true;
        }
    }

    config
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment once.
///
/// `DOTENV_OVERRIDE` picks a different file, and so does a first command line
/// argument starting with `.env`. Otherwise `.env` is used. A missing file is
/// not an error. Returns the path that was tried.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
