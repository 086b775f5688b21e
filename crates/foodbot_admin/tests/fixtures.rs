//! Test fixtures for the admin routes

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use foodbot_admin::{routes, AdminState};
use foodbot_config::{AdminConfig, AppConfig};
use foodbot_db::{DbClientFactory, Repositories};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const ADMIN_PASSWORD: &str = "admin-secret";

pub fn create_mock_config(password: Option<&str>) -> Arc<AppConfig> {
    Arc::new(AppConfig {
        use_admin: true,
        admin: Some(AdminConfig {
            password: password.map(str::to_string),
        }),
        ..AppConfig::default()
    })
}

pub async fn create_test_app() -> (Router, Repositories) {
    create_test_app_with(create_mock_config(Some(ADMIN_PASSWORD))).await
}

pub async fn create_test_app_with(config: Arc<AppConfig>) -> (Router, Repositories) {
    let repos = DbClientFactory::new().open("sqlite::memory:").await.unwrap();
    let state = Arc::new(AdminState {
        config,
        repos: repos.clone(),
    });
    (routes(state), repos)
}

/// Sends one request with the given password (if any) and returns status plus JSON body
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    password: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Admin-User", "hausmeister");
    if let Some(password) = password {
        builder = builder.header("X-Admin-Password", password);
    }
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
