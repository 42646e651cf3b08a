//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`; failures are captured to
//! Sentry before responding. No retries and no partial results: a failure
//! anywhere aborts the whole fetch and the endpoint returns a non-200.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::config::ConfigError;
use crate::shopify::AdminApiError;

/// Application-level error type for the feeds service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Credential resolution or settings lookup failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] AdminApiError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Request error"
        );

        let status = match &self {
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Shopify(_) => StatusCode::BAD_GATEWAY,
        };

        // The feed consumer is a trusted import tool; surface the message so
        // failed imports are diagnosable from its logs
        (status, self.to_string()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config(ConfigError::MissingEnvVar("SHOPIFY_URL".to_string()));
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing environment variable: SHOPIFY_URL"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::Config(ConfigError::MissingEnvVar(
                "SHOPIFY_URL".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Shopify(AdminApiError::Upstream {
                body: "{}".to_string()
            })),
            StatusCode::BAD_GATEWAY
        );
    }
}
