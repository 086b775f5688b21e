use foodbot_common::services::ServiceFactory;
use foodbot_common::time::CanteenClock;
use foodbot_common::FoodbotError;
use foodbot_config::AppConfig;
use foodbot_db::{DbClientFactory, Repositories};
use std::sync::Arc;
use tracing::{info, warn};

use crate::rate_limit::RateLimiter;
use crate::service_factory::FoodbotServiceFactory;

/// Fallback when no `[database]` section is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:data/foodbot.db";

/// Application state shared by every router.
///
/// The feature crates each get their own state struct; this one holds what
/// they are built from.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repos: Repositories,
    pub clock: CanteenClock,
    pub service_factory: Arc<dyn ServiceFactory>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Open the configured database, create missing tables and pick the notifier.
    pub async fn new(config: Arc<AppConfig>) -> Result<Self, FoodbotError> {
        let clock = CanteenClock::from_config(&config)?;

        let db_url = match config.database.as_ref() {
            Some(db) => db.url.clone(),
            None => {
                warn!(
                    "No [database] section configured, using {}",
                    DEFAULT_DATABASE_URL
                );
                DEFAULT_DATABASE_URL.to_string()
            }
        };
        let repos = DbClientFactory::new().open(&db_url).await?;
        info!("Database ready");

        let service_factory = Arc::new(FoodbotServiceFactory::new(&config, clock));
        Ok(Self::from_parts(config, repos, clock, service_factory))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        repos: Repositories,
        clock: CanteenClock,
        service_factory: Arc<dyn ServiceFactory>,
    ) -> Self {
        let rate_limiter = RateLimiter::from_config(&config.rate_limit);
        Self {
            config,
            repos,
            clock,
            service_factory,
            rate_limiter,
        }
    }
}
