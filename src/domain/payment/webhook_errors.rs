//! Webhook error types for Stripe webhook handling.
//!
//! Status codes drive Stripe's retry behaviour: 2xx acknowledges, 4xx is
//! final, 5xx is retried.

use http::StatusCode;
use thiserror::Error;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No signing secret configured, so nothing can be verified.
    #[error("Webhook verification is not configured")]
    NotConfigured,

    /// The `Stripe-Signature` header is absent or not valid UTF-8.
    #[error("Missing Stripe-Signature header")]
    MissingSignature,

    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is older than the tolerance window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Failed to parse webhook payload or signature header.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Event was intentionally ignored (not an error condition).
    #[error("Event ignored: {0}")]
    Ignored(String),

    /// A downstream event handler failed.
    #[error("Handler failed: {0}")]
    HandlerFailed(String),

    /// Idempotency store failed.
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl WebhookError {
    /// Returns true if Stripe should retry delivering this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::NotConfigured
                | WebhookError::HandlerFailed(_)
                | WebhookError::StorageError(_)
        )
    }

    /// Maps the error to an appropriate HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature | WebhookError::TimestampOutOfRange => {
                StatusCode::UNAUTHORIZED
            }

            WebhookError::MissingSignature
            | WebhookError::InvalidTimestamp
            | WebhookError::ParseError(_) => StatusCode::BAD_REQUEST,

            // Ignored events are acknowledged as success
            WebhookError::Ignored(_) => StatusCode::OK,

            WebhookError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,

            WebhookError::HandlerFailed(_) | WebhookError::StorageError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code for error responses.
    pub fn code(&self) -> &'static str {
        match self {
            WebhookError::NotConfigured => "WEBHOOK_NOT_CONFIGURED",
            WebhookError::MissingSignature => "MISSING_SIGNATURE",
            WebhookError::InvalidSignature => "INVALID_WEBHOOK_SIGNATURE",
            WebhookError::TimestampOutOfRange => "TIMESTAMP_OUT_OF_RANGE",
            WebhookError::InvalidTimestamp => "INVALID_TIMESTAMP",
            WebhookError::ParseError(_) => "INVALID_PAYLOAD",
            WebhookError::Ignored(_) => "IGNORED",
            WebhookError::HandlerFailed(_) => "HANDLER_FAILED",
            WebhookError::StorageError(_) => "STORAGE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_displays_message() {
        let err = WebhookError::ParseError("invalid JSON".to_string());
        assert_eq!(format!("{}", err), "Parse error: invalid JSON");
    }

    #[test]
    fn verification_failures_are_not_retryable() {
        assert!(!WebhookError::InvalidSignature.is_retryable());
        assert!(!WebhookError::TimestampOutOfRange.is_retryable());
        assert!(!WebhookError::MissingSignature.is_retryable());
        assert!(!WebhookError::ParseError("x".into()).is_retryable());
    }

    #[test]
    fn transient_failures_are_retryable() {
        assert!(WebhookError::NotConfigured.is_retryable());
        assert!(WebhookError::HandlerFailed("upstream down".into()).is_retryable());
        assert!(WebhookError::StorageError("lock".into()).is_retryable());
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            WebhookError::InvalidSignature.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebhookError::MissingSignature.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::InvalidTimestamp.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::Ignored("not relevant".into()).status_code(),
            StatusCode::OK
        );
        assert_eq!(
            WebhookError::NotConfigured.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            WebhookError::HandlerFailed("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
