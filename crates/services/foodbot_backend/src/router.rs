//! Assembles the feature routers under `/api`.

use crate::app_state::AppState;
use crate::rate_limit::rate_limit_middleware;
use axum::{
    extract::State, http::StatusCode, middleware, response::Json, routing::get, Router,
};
use foodbot_admin::AdminState;
use foodbot_common::is_admin_enabled;
use foodbot_kitchen::KitchenState;
use foodbot_registration::{Ledger, RegistrationState, RfidMailbox};
use foodbot_reporting::ReportingState;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if state.repos.client().is_healthy().await {
        (StatusCode::OK, Json(json!({ "status": "ok", "database": "up" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "database": "down" })),
        )
    }
}

/// Every route of the service, nested under `/api`.
///
/// Admin, kitchen and history routes are only mounted when the admin
/// password is configured. Sign-up, status and RFID scan requests are rate
/// limited per client.
pub fn build_router(state: AppState) -> Router {
    let ledger = Ledger::new(
        state.repos.clone(),
        state.service_factory.registration_notifier(),
    );
    let registration_state = Arc::new(RegistrationState {
        config: state.config.clone(),
        ledger,
        clock: state.clock,
        rfid: Arc::new(RfidMailbox::new()),
    });
    let reporting_state = Arc::new(ReportingState {
        config: state.config.clone(),
        repos: state.repos.clone(),
        clock: state.clock,
    });

    let mut api = Router::new()
        .route("/", get(|| async { "Welcome to the FoodBot API!" }))
        .route("/health", get(health_handler))
        .with_state(state.clone())
        .merge(foodbot_registration::routes(registration_state))
        .merge(foodbot_reporting::public_routes(reporting_state.clone()));

    if is_admin_enabled(&state.config) {
        let admin_state = Arc::new(AdminState {
            config: state.config.clone(),
            repos: state.repos.clone(),
        });
        let kitchen_state = Arc::new(KitchenState {
            config: state.config.clone(),
            repos: state.repos.clone(),
            clock: state.clock,
        });
        api = api
            .merge(foodbot_admin::routes(admin_state))
            .merge(foodbot_kitchen::routes(kitchen_state))
            .merge(foodbot_reporting::admin_routes(reporting_state));
    } else {
        info!("Admin password not configured, admin and kitchen routes are disabled");
    }

    #[allow(unused_mut)]
    let mut app = Router::new().nest("/api", api);

    #[cfg(feature = "openapi")]
    {
        use foodbot_admin::doc::AdminApiDoc;
        use foodbot_kitchen::doc::KitchenApiDoc;
        use foodbot_registration::doc::RegistrationApiDoc;
        use foodbot_reporting::doc::ReportingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "FoodBot API",
                version = "0.1.0",
                description = "Canteen meal sign-up service"
            ),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(RegistrationApiDoc::openapi());
        openapi_doc.merge(ReportingApiDoc::openapi());
        openapi_doc.merge(KitchenApiDoc::openapi());
        openapi_doc.merge(AdminApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    app.layer(middleware::from_fn_with_state(
        state.rate_limiter.clone(),
        rate_limit_middleware,
    ))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
}
