// --- File: crates/foodbot_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{FoodbotError, HttpStatusCode};

pub mod client;

/// Extension trait for FoodbotError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for FoodbotError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": {
                "message": self.public_message(),
                "code": status_code.as_u16(),
            }
        }));

        (status_code, body).into_response()
    }
}

/// Implement IntoResponse for FoodbotError to make it easier to use in Axum handlers.
impl IntoResponse for FoodbotError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}
