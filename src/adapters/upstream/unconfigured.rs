//! Placeholder delegate for services without an upstream.

use async_trait::async_trait;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;

use crate::adapters::http::ErrorResponse;
use crate::ports::RequestDelegate;

/// Answers every request with `503 Service Unavailable`.
#[derive(Debug, Clone, Copy)]
pub struct UnconfiguredDelegate {
    service: &'static str,
}

impl UnconfiguredDelegate {
    pub fn new(service: &'static str) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RequestDelegate for UnconfiguredDelegate {
    async fn handle(&self, request: Request) -> Response {
        tracing::debug!(service = self.service, uri = %request.uri(), "No upstream configured");
        ErrorResponse::new(
            "SERVICE_UNAVAILABLE",
            format!("The {} service is not configured", self.service),
        )
        .with_status(StatusCode::SERVICE_UNAVAILABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[tokio::test]
    async fn answers_service_unavailable() {
        let delegate = UnconfiguredDelegate::new("project");
        let request = axum::http::Request::builder()
            .uri("/api/project/1")
            .body(Body::empty())
            .unwrap();

        let response = delegate.handle(request).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.message, "The project service is not configured");
    }
}
