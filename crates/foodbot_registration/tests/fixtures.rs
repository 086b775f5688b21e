//! Test fixtures for the sign-up routes
//!
//! One in-memory database per test, a pinned canteen clock and a couple of
//! known users.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use foodbot_common::time::CanteenClock;
use foodbot_common::{MenuInput, User};
use foodbot_config::{AppConfig, RfidConfig};
use foodbot_db::{DbClientFactory, NewUser, Repositories, UserRepository};
use foodbot_kitchen::logic::upsert_menu;
use foodbot_registration::{routes, Ledger, LoggingNotifier, RegistrationState, RfidMailbox};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const MOBILE_TOKEN: &str = "5f0c3e9a2b7d4c1e8a6f9b0d2c4e6a8b";
pub const READER_TOKEN: &str = "reader-bridge-secret";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

pub fn at(h: u32, m: u32) -> NaiveDateTime {
    today().and_hms_opt(h, m, 0).unwrap()
}

/// Creates a config with the RFID mailbox switched on
pub fn create_mock_config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        use_rfid: true,
        rfid: Some(RfidConfig {
            reader_token: Some(READER_TOKEN.to_string()),
        }),
        ..AppConfig::default()
    })
}

pub struct TestApp {
    pub router: Router,
    pub repos: Repositories,
    pub anna: User,
}

pub async fn create_test_app(now: NaiveDateTime) -> TestApp {
    create_test_app_with(now, create_mock_config()).await
}

pub async fn create_test_app_with(now: NaiveDateTime, config: Arc<AppConfig>) -> TestApp {
    let repos = DbClientFactory::new().open("sqlite::memory:").await.unwrap();
    let anna = repos
        .users
        .create(&NewUser {
            name: "Anna Berg".to_string(),
            personal_number: "4711".to_string(),
            card_id: Some("04A2BC".to_string()),
        })
        .await
        .unwrap();
    repos
        .users
        .set_mobile_token(anna.id, MOBILE_TOKEN)
        .await
        .unwrap();

    let state = Arc::new(RegistrationState {
        config,
        ledger: Ledger::new(repos.clone(), Arc::new(LoggingNotifier)),
        clock: CanteenClock::Fixed(now),
        rfid: Arc::new(RfidMailbox::new()),
    });
    TestApp {
        router: routes(state),
        repos,
        anna,
    }
}

/// Plans today's menu
pub async fn plan_today(repos: &Repositories, two_menus: bool) {
    let input = MenuInput {
        description: Some("Kartoffelsuppe".to_string()),
        two_menus,
        menu1_name: Some("Schnitzel".to_string()),
        menu2_name: Some("Curry".to_string()),
        registration_deadline: Some("19:45".to_string()),
        deadline_enabled: true,
    };
    upsert_menu(repos, today(), &input, "19:45").await.unwrap();
}

pub async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_with_header(router, method, uri, body, None).await
}

/// Like [`send`], with one extra `(name, value)` header
pub async fn send_with_header(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    header: Option<(&str, &str)>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((name, value)) = header {
        builder = builder.header(name, value);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}
