// --- File: crates/foodbot_registration/src/notify.rs ---
//! Notifiers for sign-up changes.
//!
//! Delivery is best effort: [`dispatch`] spawns the call and only logs the
//! result, so a slow or broken webhook never delays or fails a sign-up.

use foodbot_common::post_with_timeout;
use foodbot_common::time::CanteenClock;
use foodbot_common::services::{
    BoxFuture, BoxedError, NotificationResult, RegistrationChange, RegistrationNotifier,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Webhook request failed: {0}")]
    RequestError(#[from] reqwest::Error),
}

/// Human-readable line for a change, as posted to the webhook.
pub fn describe_change(change: &RegistrationChange) -> String {
    let verb = if change.registered {
        "signed up for"
    } else {
        "cancelled"
    };
    format!(
        "{} {} meal {} on {}",
        change.user_name,
        verb,
        change.option.as_i64(),
        change.date.format("%d.%m.%Y")
    )
}

/// Writes changes to the log. Used when no webhook is configured.
#[derive(Debug, Default, Clone)]
pub struct LoggingNotifier;

impl RegistrationNotifier for LoggingNotifier {
    fn on_registration_changed(
        &self,
        change: RegistrationChange,
    ) -> BoxFuture<'_, NotificationResult, BoxedError> {
        Box::pin(async move {
            info!("{}", describe_change(&change));
            Ok(NotificationResult {
                channel: "log".to_string(),
                delivered: true,
            })
        })
    }
}

#[derive(Serialize, Debug)]
struct WebhookPayload {
    text: String,
}

/// Posts `{"text": "[dd.mm.YYYY HH:MM:SS] INFO: ..."}` to a chat webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    timeout: Duration,
    clock: CanteenClock,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration, clock: CanteenClock) -> Self {
        Self {
            url: url.into(),
            timeout,
            clock,
        }
    }

    fn payload(&self, change: &RegistrationChange) -> WebhookPayload {
        let stamp = self.clock.now().format("%d.%m.%Y %H:%M:%S");
        WebhookPayload {
            text: format!("[{}] INFO: {}", stamp, describe_change(change)),
        }
    }

    async fn send(&self, change: &RegistrationChange) -> Result<(), NotifyError> {
        let payload = self.payload(change);
        post_with_timeout(&self.url, &payload, self.timeout).await?;
        Ok(())
    }
}

impl RegistrationNotifier for WebhookNotifier {
    fn on_registration_changed(
        &self,
        change: RegistrationChange,
    ) -> BoxFuture<'_, NotificationResult, BoxedError> {
        Box::pin(async move {
            self.send(&change)
                .await
                .map_err(|e| BoxedError(Box::new(e)))?;
            Ok(NotificationResult {
                channel: "webhook".to_string(),
                delivered: true,
            })
        })
    }
}

/// Fire-and-forget delivery of one change.
pub fn dispatch(notifier: &Arc<dyn RegistrationNotifier>, change: RegistrationChange) {
    let notifier = Arc::clone(notifier);
    tokio::spawn(async move {
        match notifier.on_registration_changed(change).await {
            Ok(result) => debug!(
                "Notification via {} delivered={}",
                result.channel, result.delivered
            ),
            Err(e) => error!("Notification failed: {}", e),
        }
    });
}
