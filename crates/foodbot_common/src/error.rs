use std::fmt;
use thiserror::Error;

/// The base error type shared by all FoodBot crates.
///
/// Feature crates keep their own error enums and convert into this one at the
/// HTTP boundary by implementing `From<TheirError> for FoodbotError`.
#[derive(Error, Debug)]
pub enum FoodbotError {
    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Missing or wrong admin credentials
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Malformed input, rejected before touching the store
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Any persistence failure that was rolled back
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred due to a conflict (e.g., resource already exists)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// A client used up its request budget for the current window
    #[error("Too many requests: {0}")]
    RateLimitError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for FoodbotError {
    fn status_code(&self) -> u16 {
        match self {
            FoodbotError::ConfigError(_) => 500,
            FoodbotError::AuthError(_) => 401,
            FoodbotError::ValidationError(_) => 400,
            FoodbotError::DatabaseError(_) => 500,
            FoodbotError::ConflictError(_) => 409,
            FoodbotError::NotFoundError(_) => 404,
            FoodbotError::RateLimitError(_) => 429,
            FoodbotError::InternalError(_) => 500,
        }
    }
}

impl FoodbotError {
    /// Message safe to show to a client.
    ///
    /// Storage and internal failures are reported generically; their detail
    /// only goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            FoodbotError::DatabaseError(_) => "Database error: storage failure".to_string(),
            FoodbotError::InternalError(_) => "Internal error".to_string(),
            other => other.to_string(),
        }
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> FoodbotError {
    FoodbotError::ConfigError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(FoodbotError::ValidationError("bad date".into()).status_code(), 400);
        assert_eq!(FoodbotError::NotFoundError("user".into()).status_code(), 404);
        assert_eq!(config_error("no zone").status_code(), 500);
        assert_eq!(FoodbotError::ConflictError("taken".into()).status_code(), 409);
        assert_eq!(FoodbotError::AuthError("x".into()).status_code(), 401);
        assert_eq!(FoodbotError::RateLimitError("register".into()).status_code(), 429);
        assert_eq!(FoodbotError::DatabaseError("disk".into()).status_code(), 500);
    }

    #[test]
    fn test_public_message_hides_storage_detail() {
        let err = FoodbotError::DatabaseError("disk I/O error at /var/lib".into());
        assert!(!err.public_message().contains("/var/lib"));
        assert_eq!(
            FoodbotError::ValidationError("option".into()).public_message(),
            "Validation error: option"
        );
    }
}
