//! Per-client request budgets for the public sign-up and status endpoints.
//!
//! Counting is a fixed one-minute window per `(rule, client)` pair, kept in
//! process memory.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use foodbot_common::FoodbotError;
use foodbot_config::RateLimitConfig;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

const WINDOW: Duration = Duration::from_secs(60);

/// Windows idle for longer than this are dropped by [`RateLimiter::cleanup`].
pub const STALE_AFTER: Duration = Duration::from_secs(300);

/// One limited endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateRule {
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
    pub per_minute: u32,
}

impl RateRule {
    fn matches(&self, method: &Method, path: &str) -> bool {
        &self.method == method && self.path == path.trim_end_matches('/')
    }
}

struct Window {
    count: u32,
    started: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    rules: Arc<Vec<RateRule>>,
    trust_forwarded_for: bool,
    windows: Arc<Mutex<HashMap<(&'static str, String), Window>>>,
}

impl RateLimiter {
    pub fn new(rules: Vec<RateRule>, trust_forwarded_for: bool) -> Self {
        Self {
            rules: Arc::new(rules),
            trust_forwarded_for,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Rules for `/api/register`, `/api/status` and `/api/rfid/scan`.
    ///
    /// Disabled config, or a zero budget, leaves the endpoint unlimited.
    pub fn from_config(config: &RateLimitConfig) -> Self {
        let rules = if config.enabled {
            [
                ("register", Method::POST, "/api/register", config.register_per_minute),
                ("status", Method::GET, "/api/status", config.status_per_minute),
                ("rfid_scan", Method::POST, "/api/rfid/scan", config.rfid_scan_per_minute),
            ]
            .into_iter()
            .filter(|(_, _, _, per_minute)| *per_minute > 0)
            .map(|(name, method, path, per_minute)| RateRule {
                name,
                method,
                path,
                per_minute,
            })
            .collect()
        } else {
            Vec::new()
        };
        Self::new(rules, config.trust_forwarded_for)
    }

    pub fn rules(&self) -> &[RateRule] {
        &self.rules
    }

    /// Count one request. Returns `false` once the client is over budget.
    pub async fn check(&self, rule: &RateRule, client: &str) -> bool {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();
        let window = windows
            .entry((rule.name, client.to_owned()))
            .or_insert(Window {
                count: 0,
                started: now,
            });

        if now.duration_since(window.started) >= WINDOW {
            window.count = 0;
            window.started = now;
        }

        window.count = window.count.saturating_add(1);
        window.count <= rule.per_minute
    }

    pub async fn cleanup(&self) {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();
        let before = windows.len();
        windows.retain(|_, window| now.duration_since(window.started) < STALE_AFTER);
        debug!("Rate limiter cleanup dropped {} windows", before - windows.len());
    }

    fn client_key(&self, req: &Request<Body>) -> String {
        if self.trust_forwarded_for {
            let forwarded = req
                .headers()
                .get("x-forwarded-for")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(',').next())
                .map(str::trim)
                .filter(|ip| !ip.is_empty());
            if let Some(ip) = forwarded {
                return ip.to_owned();
            }
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip().to_string())
            .unwrap_or_else(|| "unknown".to_owned())
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(rule) = limiter
        .rules()
        .iter()
        .find(|rule| rule.matches(req.method(), req.uri().path()))
        .cloned()
    else {
        return next.run(req).await;
    };

    let client = limiter.client_key(&req);
    if limiter.check(&rule, &client).await {
        next.run(req).await
    } else {
        warn!("Rate limit for {} exceeded by {}", rule.name, client);
        FoodbotError::RateLimitError(format!(
            "at most {} requests per minute to {}",
            rule.per_minute, rule.path
        ))
        .into_response()
    }
}
