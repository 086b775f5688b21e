// --- File: crates/foodbot_registration/src/routes.rs ---

use crate::handlers::{
    mobile_action_handler, mobile_status_handler, register_choice_handler, register_handler,
    rfid_consume_handler, rfid_scan_handler, RegistrationState,
};
use crate::rfid::reader_token_middleware;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use foodbot_common::is_rfid_enabled;
use std::sync::Arc;

/// Public sign-up routes. The RFID mailbox is only mounted when `use_rfid` is
/// set, and depositing a scan needs the reader token.
pub fn routes(state: Arc<RegistrationState>) -> Router {
    let mut router = Router::new()
        .route("/register", post(register_handler))
        .route("/register/choice", post(register_choice_handler))
        .route(
            "/m/{token}",
            get(mobile_status_handler).post(mobile_action_handler),
        );

    if is_rfid_enabled(&state.config) {
        router = router
            .route(
                "/rfid/scan",
                post(rfid_scan_handler).route_layer(middleware::from_fn_with_state(
                    state.config.clone(),
                    reader_token_middleware,
                )),
            )
            .route("/rfid/consume", post(rfid_consume_handler));
    }

    router.with_state(state)
}
