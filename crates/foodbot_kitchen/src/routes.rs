// --- File: crates/foodbot_kitchen/src/routes.rs ---

use crate::handlers::{
    add_day_handler, create_preset_handler, delete_day_handler, delete_preset_handler,
    get_guests_handler, get_menu_handler, list_presets_handler, put_menu_handler,
    update_guests_handler, week_handler, KitchenState,
};
use axum::{
    routing::{delete, get, post},
    Router,
};
use foodbot_admin::{require_admin, AdminAuthState};
use std::sync::Arc;

/// Kitchen console routes. All of them require the admin password.
pub fn routes(state: Arc<KitchenState>) -> Router {
    let auth_state = Arc::new(AdminAuthState {
        config: state.config.clone(),
    });

    let router = Router::new()
        .route(
            "/kitchen/menu/{date}",
            get(get_menu_handler).put(put_menu_handler),
        )
        .route("/kitchen/week", get(week_handler))
        .route(
            "/kitchen/day/{date}",
            post(add_day_handler).delete(delete_day_handler),
        )
        .route(
            "/kitchen/guests/{date}",
            get(get_guests_handler).post(update_guests_handler),
        )
        .route(
            "/kitchen/presets",
            get(list_presets_handler).post(create_preset_handler),
        )
        .route("/kitchen/presets/{id}", delete(delete_preset_handler))
        .with_state(state);

    require_admin(router, auth_state)
}
