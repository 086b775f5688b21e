// --- File: crates/foodbot_admin/src/routes.rs ---

use crate::auth::{admin_auth_middleware, AdminAuthState};
use crate::handlers::{
    admin_log_handler, create_user_handler, delete_user_handler, mobile_token_handler,
    update_user_handler, AdminState,
};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

/// Wrap `router` in the admin password check.
///
/// Kitchen and reporting routers are guarded the same way.
pub fn require_admin<S>(router: Router<S>, auth_state: Arc<AdminAuthState>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(auth_state, admin_auth_middleware))
}

/// User management and admin log routes, already behind the password check.
pub fn routes(state: Arc<AdminState>) -> Router {
    let auth_state = Arc::new(AdminAuthState {
        config: state.config.clone(),
    });

    let router = Router::new()
        .route("/admin/users", post(create_user_handler))
        .route(
            "/admin/users/{id}",
            put(update_user_handler).delete(delete_user_handler),
        )
        .route("/admin/users/{id}/token", post(mobile_token_handler))
        .route("/admin/log", get(admin_log_handler))
        .with_state(state);

    require_admin(router, auth_state)
}
