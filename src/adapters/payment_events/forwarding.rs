//! Payment event handler that POSTs verified events to another service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::payment::{StripeEvent, StripeEventType, WebhookError};
use crate::ports::PaymentEventHandler;

/// Forwards each verified event as JSON to `PAYMENT_EVENTS_URL`.
///
/// Any transport error or non-2xx answer is a `HandlerFailed`, which leaves
/// the event unrecorded so Stripe's redelivery retries it.
#[derive(Debug, Clone)]
pub struct ForwardingPaymentEventHandler {
    client: Client,
    url: String,
}

impl ForwardingPaymentEventHandler {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, WebhookError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WebhookError::HandlerFailed(format!("failed to build client: {e}")))?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl PaymentEventHandler for ForwardingPaymentEventHandler {
    fn handles(&self) -> Vec<StripeEventType> {
        StripeEventType::KNOWN.to_vec()
    }

    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let response = self
            .client
            .post(&self.url)
            .json(event)
            .send()
            .await
            .map_err(|e| WebhookError::HandlerFailed(format!("payment events request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::HandlerFailed(format!(
                "payment events endpoint answered {status}"
            )));
        }

        tracing::debug!(event_id = %event.id, url = %self.url, "Forwarded payment event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::StripeEventBuilder;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    async fn spawn_receiver(status: StatusCode) -> (String, Arc<Mutex<Vec<serde_json::Value>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let app = Router::new().route(
            "/events",
            post(move |Json(body): Json<serde_json::Value>| {
                let sink = sink.clone();
                async move {
                    sink.lock().await.push(body);
                    status
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/events"), received)
    }

    #[tokio::test]
    async fn posts_event_json() {
        let (url, received) = spawn_receiver(StatusCode::NO_CONTENT).await;
        let handler = ForwardingPaymentEventHandler::new(url, Duration::from_secs(5)).unwrap();
        let event = StripeEventBuilder::new()
            .id("evt_fwd")
            .event_type("charge.refunded")
            .build();

        handler.handle(&event).await.unwrap();

        let received = received.lock().await;
        assert_eq!(received.len(), 1);
        assert_eq!(received[0]["id"], "evt_fwd");
        assert_eq!(received[0]["type"], "charge.refunded");
    }

    #[tokio::test]
    async fn error_status_is_retryable_failure() {
        let (url, _) = spawn_receiver(StatusCode::INTERNAL_SERVER_ERROR).await;
        let handler = ForwardingPaymentEventHandler::new(url, Duration::from_secs(5)).unwrap();

        let err = handler
            .handle(&StripeEventBuilder::new().build())
            .await
            .unwrap_err();

        assert!(matches!(err, WebhookError::HandlerFailed(_)));
        assert!(err.is_retryable());
    }
}
