//! `POST /api/stripe` - raw-body payment webhook endpoint.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::payment::WebhookError;
use crate::ports::{PaymentWebhookHandler, WebhookAck};

use super::error::ErrorResponse;

/// Header carrying Stripe's signature.
pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookReceived {
    pub received: bool,
}

/// Receives the body as `Bytes`; nothing decodes it before the handler.
pub async fn receive_payment_webhook(
    State(handler): State<Arc<dyn PaymentWebhookHandler>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookReceived>, WebhookApiError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    match handler.handle(body, signature).await? {
        WebhookAck::Processed { event_id } => {
            tracing::info!(%event_id, "Payment webhook processed");
        }
        WebhookAck::Duplicate { event_id } => {
            tracing::debug!(%event_id, "Payment webhook already processed");
        }
        WebhookAck::Ignored { event_id } => {
            tracing::debug!(%event_id, "Payment webhook ignored");
        }
    }

    Ok(Json(WebhookReceived { received: true }))
}

/// HTTP rendering of [`WebhookError`].
#[derive(Debug)]
pub struct WebhookApiError(pub WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status == StatusCode::OK {
            return Json(WebhookReceived { received: true }).into_response();
        }

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Payment webhook failed");
        } else {
            tracing::warn!(error = %self.0, "Payment webhook rejected");
        }

        ErrorResponse::new(self.0.code(), self.0.to_string()).with_status(status)
    }
}
