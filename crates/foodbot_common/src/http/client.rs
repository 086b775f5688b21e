use once_cell::sync::Lazy;
use reqwest::{Client, Error as ReqwestError, Response};
use std::time::Duration;

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A shared HTTP client reused across the application.
pub static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// POST a JSON body with a per-request timeout, failing on non-2xx responses.
pub async fn post_with_timeout<T: serde::Serialize>(
    url: &str,
    body: &T,
    timeout: Duration,
) -> Result<Response, ReqwestError> {
    HTTP_CLIENT
        .post(url)
        .timeout(timeout)
        .json(body)
        .send()
        .await?
        .error_for_status()
}
