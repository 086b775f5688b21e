//! Test fixtures for the kitchen routes
//!
//! Builds an in-memory database, a pinned clock and the admin headers the
//! guarded routes expect.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use foodbot_common::time::CanteenClock;
use foodbot_config::{AdminConfig, AppConfig};
use foodbot_db::{DbClientFactory, Repositories};
use foodbot_kitchen::{routes, KitchenState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const ADMIN_PASSWORD: &str = "kitchen-secret";

/// Creates a config with the admin password set
pub fn create_mock_config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        use_admin: true,
        admin: Some(AdminConfig {
            password: Some(ADMIN_PASSWORD.to_string()),
        }),
        ..AppConfig::default()
    })
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn moment(day: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    day.and_hms_opt(h, m, 0).unwrap()
}

/// Router plus the repositories behind it
pub async fn create_test_app(now: NaiveDateTime) -> (Router, Repositories) {
    let repos = DbClientFactory::new().open("sqlite::memory:").await.unwrap();
    let state = Arc::new(KitchenState {
        config: create_mock_config(),
        repos: repos.clone(),
        clock: CanteenClock::Fixed(now),
    });
    (routes(state), repos)
}

/// Sends one request with the admin password and returns status plus parsed JSON body
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Admin-Password", ADMIN_PASSWORD)
        .header("X-Admin-User", "chef");
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
