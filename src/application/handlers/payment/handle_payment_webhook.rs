//! HandlePaymentWebhookHandler - Verifies and processes Stripe webhook deliveries.

use async_trait::async_trait;
use axum::body::Bytes;

use crate::domain::payment::{IdempotentWebhookProcessor, StripeWebhookVerifier, WebhookError};
use crate::ports::{PaymentWebhookHandler, WebhookAck};

/// Handler behind `POST /api/stripe`.
///
/// Without a verifier every delivery is refused with `NotConfigured`, so an
/// unsigned body is never acted on.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookHandler {
    verifier: Option<StripeWebhookVerifier>,
    processor: IdempotentWebhookProcessor,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        verifier: Option<StripeWebhookVerifier>,
        processor: IdempotentWebhookProcessor,
    ) -> Self {
        Self {
            verifier,
            processor,
        }
    }
}

#[async_trait]
impl PaymentWebhookHandler for HandlePaymentWebhookHandler {
    async fn handle(
        &self,
        payload: Bytes,
        signature: Option<&str>,
    ) -> Result<WebhookAck, WebhookError> {
        let verifier = self.verifier.as_ref().ok_or(WebhookError::NotConfigured)?;
        let signature = signature.ok_or(WebhookError::MissingSignature)?;

        let event = verifier.verify_and_parse(&payload, signature)?;

        tracing::info!(
            event_id = %event.id,
            event_type = %event.event_type,
            livemode = event.livemode,
            "Verified Stripe webhook event"
        );

        self.processor.process(event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::webhook_store::InMemoryWebhookEventRepository;
    use crate::domain::payment::{sign_payload, EventDispatcher, StripeEvent, StripeEventType};
    use crate::ports::PaymentEventHandler;
    use secrecy::SecretString;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    const SECRET: &str = "whsec_handler_test";

    #[derive(Default)]
    struct RecordingHandler {
        calls: AtomicU32,
    }

    #[async_trait]
    impl PaymentEventHandler for RecordingHandler {
        fn handles(&self) -> Vec<StripeEventType> {
            vec![StripeEventType::CheckoutSessionCompleted]
        }

        async fn handle(&self, _event: &StripeEvent) -> Result<(), WebhookError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn handler(verifier: Option<StripeWebhookVerifier>) -> (HandlePaymentWebhookHandler, Arc<RecordingHandler>) {
        let recording = Arc::new(RecordingHandler::default());
        let dispatcher = EventDispatcher::new().register(recording.clone());
        let processor = IdempotentWebhookProcessor::new(
            Arc::new(InMemoryWebhookEventRepository::new()),
            dispatcher,
        );
        (HandlePaymentWebhookHandler::new(verifier, processor), recording)
    }

    fn verifier() -> Option<StripeWebhookVerifier> {
        Some(StripeWebhookVerifier::new(SecretString::new(
            SECRET.to_string(),
        )))
    }

    fn payload(id: &str) -> Bytes {
        Bytes::from(format!(
            r#"{{"id":"{id}","type":"checkout.session.completed","created":1704067200,"data":{{"object":{{"id":"cs_1"}}}}}}"#
        ))
    }

    fn signed(payload: &Bytes) -> String {
        sign_payload(SECRET, chrono::Utc::now().timestamp(), payload).unwrap()
    }

    #[tokio::test]
    async fn processes_signed_event() {
        let (handler, recording) = handler(verifier());
        let body = payload("evt_ok");
        let signature = signed(&body);

        let ack = handler.handle(body, Some(&signature)).await.unwrap();

        assert_eq!(
            ack,
            WebhookAck::Processed {
                event_id: "evt_ok".to_string()
            }
        );
        assert_eq!(recording.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn redelivery_is_acknowledged_as_duplicate() {
        let (handler, recording) = handler(verifier());
        let body = payload("evt_twice");
        let signature = signed(&body);

        handler.handle(body.clone(), Some(&signature)).await.unwrap();
        let ack = handler.handle(body, Some(&signature)).await.unwrap();

        assert!(matches!(ack, WebhookAck::Duplicate { .. }));
        assert_eq!(recording.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejects_missing_signature() {
        let (handler, recording) = handler(verifier());

        let result = handler.handle(payload("evt_1"), None).await;

        assert!(matches!(result, Err(WebhookError::MissingSignature)));
        assert_eq!(recording.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejects_tampered_body() {
        let (handler, recording) = handler(verifier());
        let signature = signed(&payload("evt_1"));

        let result = handler.handle(payload("evt_2"), Some(&signature)).await;

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
        assert_eq!(recording.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn refuses_everything_without_secret() {
        let (handler, _) = handler(None);
        let body = payload("evt_1");
        let signature = signed(&body);

        let result = handler.handle(body, Some(&signature)).await;

        assert!(matches!(result, Err(WebhookError::NotConfigured)));
    }
}
