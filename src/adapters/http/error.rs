//! JSON error bodies shared by every HTTP adapter.

use axum::extract::OriginalUri;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Error body returned by routes this server answers itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Render with the given status.
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Fallback for requests no registration accepts.
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> Response {
    ErrorResponse::new("NOT_FOUND", format!("No route for {} {}", method, uri.path()))
        .with_status(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_code_and_message() {
        let body = serde_json::to_value(ErrorResponse::new("NOT_FOUND", "gone")).unwrap();
        assert_eq!(body, serde_json::json!({"code": "NOT_FOUND", "message": "gone"}));
    }

    #[tokio::test]
    async fn not_found_names_method_and_path() {
        let response = not_found(
            Method::DELETE,
            OriginalUri("/nowhere?x=1".parse().unwrap()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.message, "No route for DELETE /nowhere");
    }
}
