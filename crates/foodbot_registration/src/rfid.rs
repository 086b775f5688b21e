// --- File: crates/foodbot_registration/src/rfid.rs ---

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use constant_time_eq::constant_time_eq;
use foodbot_common::FoodbotError;
use foodbot_config::AppConfig;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, warn};

/// Header the reader bridge authenticates with.
pub const READER_TOKEN_HEADER: &str = "X-Reader-Token";

/// Single-slot hand-off between a card reader bridge and the kiosk.
///
/// The reader deposits the last scanned card id; the kiosk takes it. A new
/// scan overwrites one that was never taken.
#[derive(Debug, Default)]
pub struct RfidMailbox {
    slot: Mutex<Option<String>>,
}

impl RfidMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deposit(&self, card_id: impl Into<String>) {
        let card_id = card_id.into();
        match self.slot.lock() {
            Ok(mut slot) => {
                if slot.replace(card_id).is_some() {
                    debug!("Unconsumed RFID scan overwritten");
                }
            }
            Err(poisoned) => {
                warn!("RFID mailbox lock was poisoned, recovering");
                *poisoned.into_inner() = Some(card_id);
            }
        }
    }

    /// Read and clear the pending scan in one step.
    pub fn take(&self) -> Option<String> {
        match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

/// Guards `/rfid/scan`: only the reader bridge may deposit scans.
///
/// Compares `X-Reader-Token` against `[rfid] reader_token` in constant time.
/// Without a configured token every scan is refused.
pub async fn reader_token_middleware(
    State(config): State<Arc<AppConfig>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let expected = match config.rfid.as_ref().and_then(|r| r.reader_token.as_deref()) {
        Some(token) if !token.is_empty() => token.to_string(),
        _ => {
            error!("RFID reader token is not configured");
            return FoodbotError::ConfigError("RFID reader token is not configured".to_string())
                .into_response();
        }
    };

    let provided = req
        .headers()
        .get(READER_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(token) if constant_time_eq(token.as_bytes(), expected.as_bytes()) => next.run(req).await,
        Some(_) => {
            warn!("RFID scan with invalid reader token");
            FoodbotError::AuthError("Unauthorized: Invalid reader token.".to_string()).into_response()
        }
        None => {
            warn!("RFID scan without {} header", READER_TOKEN_HEADER);
            FoodbotError::AuthError(format!("Unauthorized: Missing {} header.", READER_TOKEN_HEADER))
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_clears() {
        let mailbox = RfidMailbox::new();
        assert_eq!(mailbox.take(), None);
        mailbox.deposit("04A2BC");
        assert_eq!(mailbox.take().as_deref(), Some("04A2BC"));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn test_deposit_overwrites() {
        let mailbox = RfidMailbox::new();
        mailbox.deposit("AA");
        mailbox.deposit("BB");
        assert_eq!(mailbox.take().as_deref(), Some("BB"));
    }

    #[test]
    fn test_each_scan_taken_at_most_once() {
        let mailbox = Arc::new(RfidMailbox::new());
        mailbox.deposit("CAFE");
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let mailbox = Arc::clone(&mailbox);
                std::thread::spawn(move || mailbox.take())
            })
            .collect();
        let taken = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .count();
        assert_eq!(taken, 1);
    }
}
