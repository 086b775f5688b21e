// --- File: crates/foodbot_reporting/src/routes.rs ---

use crate::handlers::{
    history_handler, menu_days_handler, stats_handler, status_handler, user_history_handler,
    users_handler, ReportingState,
};
use axum::{routing::get, Router};
use foodbot_admin::{require_admin, AdminAuthState};
use std::sync::Arc;

/// Status, statistics and the user directory. No authentication.
pub fn public_routes(state: Arc<ReportingState>) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/stats", get(stats_handler))
        .route("/users", get(users_handler))
        .with_state(state)
}

/// Per-user history and the menu-day overview, behind the admin password.
pub fn admin_routes(state: Arc<ReportingState>) -> Router {
    let auth_state = Arc::new(AdminAuthState {
        config: state.config.clone(),
    });
    let router = Router::new()
        .route("/history", get(history_handler))
        .route("/history/{user_id}", get(user_history_handler))
        .route("/stats/menu-days", get(menu_days_handler))
        .with_state(state);

    require_admin(router, auth_state)
}
