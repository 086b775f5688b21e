//! Test fixtures for the reporting routes

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use foodbot_common::time::CanteenClock;
use foodbot_common::{MenuOption, User};
use foodbot_config::{AdminConfig, AppConfig};
use foodbot_db::{DbClientFactory, NewUser, RegistrationRepository, Repositories, UserRepository};
use foodbot_reporting::{admin_routes, public_routes, ReportingState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const ADMIN_PASSWORD: &str = "report-secret";

pub fn create_mock_config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        use_admin: true,
        admin: Some(AdminConfig {
            password: Some(ADMIN_PASSWORD.to_string()),
        }),
        ..AppConfig::default()
    })
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()
}

fn noon() -> NaiveDateTime {
    today().and_hms_opt(12, 0, 0).unwrap()
}

/// Public and admin routes on one router, pinned to noon on `today()`
pub async fn create_test_app() -> (Router, Repositories) {
    let repos = DbClientFactory::new().open("sqlite::memory:").await.unwrap();
    let state = Arc::new(ReportingState {
        config: create_mock_config(),
        repos: repos.clone(),
        clock: CanteenClock::Fixed(noon()),
    });
    let router = public_routes(state.clone()).merge(admin_routes(state));
    (router, repos)
}

pub async fn add_user(repos: &Repositories, name: &str, personal_number: &str) -> User {
    repos
        .users
        .create(&NewUser {
            name: name.to_string(),
            personal_number: personal_number.to_string(),
            card_id: None,
        })
        .await
        .unwrap()
}

pub async fn sign_up(repos: &Repositories, user: &User, date: NaiveDate, option: MenuOption) {
    repos
        .registrations
        .insert(user.id, date, option)
        .await
        .unwrap();
}

/// GET with optional admin password, returning status plus parsed JSON body
pub async fn get(app: &Router, uri: &str, admin: bool) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if admin {
        builder = builder
            .header("X-Admin-Password", ADMIN_PASSWORD)
            .header("X-Admin-User", "leitung");
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
