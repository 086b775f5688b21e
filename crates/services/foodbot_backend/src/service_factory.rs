//! Service factory implementation.
//!
//! Chooses the registration notifier from configuration: a webhook when
//! notifications are switched on and a URL is configured, the log otherwise.
use foodbot_common::is_notifications_enabled;
use foodbot_common::services::{RegistrationNotifier, ServiceFactory};
use foodbot_common::time::CanteenClock;
use foodbot_config::AppConfig;
use foodbot_registration::{LoggingNotifier, WebhookNotifier};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct FoodbotServiceFactory {
    notifier: Arc<dyn RegistrationNotifier>,
}

impl FoodbotServiceFactory {
    pub fn new(config: &AppConfig, clock: CanteenClock) -> Self {
        let webhook = config
            .notifications
            .as_ref()
            .and_then(|n| n.webhook_url.clone().map(|url| (url, n.timeout_secs)));

        let notifier: Arc<dyn RegistrationNotifier> = match webhook {
            Some((url, timeout_secs)) if is_notifications_enabled(config) => {
                info!("Registration changes are posted to the configured webhook");
                Arc::new(WebhookNotifier::new(
                    url,
                    Duration::from_secs(timeout_secs),
                    clock,
                ))
            }
            _ => {
                info!("Registration changes are only logged");
                Arc::new(LoggingNotifier)
            }
        };

        Self { notifier }
    }

    /// A factory around an existing notifier, mostly for tests.
    pub fn with_notifier(notifier: Arc<dyn RegistrationNotifier>) -> Self {
        Self { notifier }
    }
}

impl ServiceFactory for FoodbotServiceFactory {
    fn registration_notifier(&self) -> Arc<dyn RegistrationNotifier> {
        self.notifier.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use foodbot_common::services::RegistrationChange;
    use foodbot_common::MenuOption;
    use foodbot_config::NotificationConfig;

    fn clock() -> CanteenClock {
        CanteenClock::Fixed(
            NaiveDate::from_ymd_opt(2026, 3, 2)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        )
    }

    fn change() -> RegistrationChange {
        RegistrationChange {
            user_name: "Anna Berg".to_string(),
            registered: true,
            option: MenuOption::One,
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_defaults_to_log_notifier() {
        let factory = FoodbotServiceFactory::new(&AppConfig::default(), clock());
        let result = factory
            .registration_notifier()
            .on_registration_changed(change())
            .await
            .unwrap();
        assert_eq!(result.channel, "log");
    }

    #[tokio::test]
    async fn test_webhook_needs_the_flag() {
        let config = AppConfig {
            use_notifications: false,
            notifications: Some(NotificationConfig {
                webhook_url: Some("http://127.0.0.1:9/hook".to_string()),
                timeout_secs: 1,
            }),
            ..AppConfig::default()
        };
        let factory = FoodbotServiceFactory::new(&config, clock());
        let result = factory
            .registration_notifier()
            .on_registration_changed(change())
            .await
            .unwrap();
        assert_eq!(result.channel, "log");
    }
}
