use foodbot_backend::{build_router, AppState};
use foodbot_common::logging;
use foodbot_backend::rate_limit::STALE_AFTER;
use foodbot_config::load_config;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let config = match load_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::new(config.clone()).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialise application state: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Periodic rate limiter cleanup
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(STALE_AFTER);
        loop {
            interval.tick().await;
            rate_limiter.cleanup().await;
        }
    });

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
