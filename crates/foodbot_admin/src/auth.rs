// --- File: crates/foodbot_admin/src/auth.rs ---

use axum::{
    body::Body as AxumBody,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use constant_time_eq::constant_time_eq;
use foodbot_common::FoodbotError;
use foodbot_config::AppConfig;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Header carrying the shared admin secret.
pub const ADMIN_AUTH_HEADER: &str = "X-Admin-Password";

/// Optional header naming who is acting; recorded in the admin log.
pub const ADMIN_USER_HEADER: &str = "X-Admin-User";

const DEFAULT_ADMIN_USER: &str = "admin";
const ADMIN_USER_MAX: usize = 50;

// The middleware only needs the configured secret.
#[derive(Clone)]
pub struct AdminAuthState {
    pub config: Arc<AppConfig>,
}

/// Who performed an admin request. Inserted into request extensions by
/// [`admin_auth_middleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity(pub String);

impl AdminIdentity {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for AdminIdentity {
    fn default() -> Self {
        AdminIdentity(DEFAULT_ADMIN_USER.to_string())
    }
}

/// Axum middleware guarding admin, kitchen and reporting routes.
///
/// Compares `X-Admin-Password` against `[admin] password` in constant time.
pub async fn admin_auth_middleware(
    State(auth_state): State<Arc<AdminAuthState>>,
    mut req: Request<AxumBody>,
    next: Next,
) -> Response {
    let expected = match auth_state
        .config
        .admin
        .as_ref()
        .and_then(|a| a.password.clone())
    {
        Some(secret) if !secret.is_empty() => secret,
        _ => {
            error!("Admin password is not configured");
            return FoodbotError::ConfigError("admin authentication is not configured".to_string())
                .into_response();
        }
    };

    let provided = req
        .headers()
        .get(ADMIN_AUTH_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(secret) if constant_time_eq(secret.as_bytes(), expected.as_bytes()) => {
            let identity = req
                .headers()
                .get(ADMIN_USER_HEADER)
                .and_then(|value| value.to_str().ok())
                .and_then(|name| foodbot_common::validation::sanitize_string(name, ADMIN_USER_MAX))
                .map(AdminIdentity)
                .unwrap_or_default();
            debug!("Admin request authenticated as {}", identity.name());
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Some(_) => {
            warn!("Admin request with invalid password");
            unauthorized("Unauthorized: Invalid credentials.")
        }
        None => {
            warn!("Admin request without {} header", ADMIN_AUTH_HEADER);
            unauthorized(&format!("Unauthorized: Missing {} header.", ADMIN_AUTH_HEADER))
        }
    }
}

fn unauthorized(message: &str) -> Response {
    FoodbotError::AuthError(message.to_string()).into_response()
}
