//! Webhook processor - Orchestrates idempotent webhook event handling.
//!
//! ## Design
//!
//! 1. Skip events whose id is already recorded
//! 2. Dispatch to the handler registered for the event type
//! 3. Record the outcome, unless the failure is retryable
//!
//! Retryable failures are left unrecorded so Stripe's redelivery gets a
//! second chance. Concurrent deliveries of one event may both dispatch;
//! the repository decides which one reports `Processed`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ports::{
    PaymentEventHandler, SaveResult, WebhookAck, WebhookEventRecord, WebhookEventRepository,
    WebhookOutcome,
};

use super::stripe_event::{StripeEvent, StripeEventType};
use super::webhook_errors::WebhookError;

/// Routes events to the handler registered for their type.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    handlers: HashMap<StripeEventType, Arc<dyn PaymentEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every type it declares. Later registrations
    /// replace earlier ones for the same type.
    pub fn register(mut self, handler: Arc<dyn PaymentEventHandler>) -> Self {
        for event_type in handler.handles() {
            self.handlers.insert(event_type, handler.clone());
        }
        self
    }

    pub fn handles(&self, event_type: StripeEventType) -> bool {
        self.handlers.contains_key(&event_type)
    }

    /// Dispatch an event to its handler.
    ///
    /// Returns `Err(WebhookError::Ignored)` if no handler is registered.
    pub async fn dispatch(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        let event_type = event.parsed_type();
        match self.handlers.get(&event_type) {
            Some(handler) => handler.handle(event).await,
            None => Err(WebhookError::Ignored(format!(
                "no handler for event type {}",
                event.event_type
            ))),
        }
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handled_types", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Processes webhook events at most once per event id.
#[derive(Clone)]
pub struct IdempotentWebhookProcessor {
    repository: Arc<dyn WebhookEventRepository>,
    dispatcher: EventDispatcher,
}

impl IdempotentWebhookProcessor {
    pub fn new(repository: Arc<dyn WebhookEventRepository>, dispatcher: EventDispatcher) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    /// Process a verified event.
    ///
    /// # Returns
    ///
    /// - `Ok(WebhookAck::Processed)` - a handler ran successfully
    /// - `Ok(WebhookAck::Ignored)` - no handler wanted it
    /// - `Ok(WebhookAck::Duplicate)` - already recorded, nothing done
    /// - `Err(_)` - handler failed
    pub async fn process(&self, event: StripeEvent) -> Result<WebhookAck, WebhookError> {
        if self.repository.find_by_event_id(&event.id).await?.is_some() {
            tracing::debug!(event_id = %event.id, "Skipping already processed webhook event");
            return Ok(WebhookAck::Duplicate { event_id: event.id });
        }

        let result = match self.dispatcher.dispatch(&event).await {
            Err(e) if e.is_retryable() => {
                tracing::warn!(event_id = %event.id, error = %e, "Webhook handler failed, leaving event open for retry");
                return Err(e);
            }
            other => other,
        };

        let (outcome, detail) = match &result {
            Ok(()) => (WebhookOutcome::Processed, None),
            Err(WebhookError::Ignored(reason)) => (WebhookOutcome::Ignored, Some(reason.clone())),
            Err(e) => (WebhookOutcome::Failed, Some(e.to_string())),
        };

        let record = WebhookEventRecord::new(&event.id, &event.event_type, outcome, detail);
        if self.repository.save(record).await? == SaveResult::AlreadyExists {
            return Ok(WebhookAck::Duplicate { event_id: event.id });
        }

        match result {
            Ok(()) => Ok(WebhookAck::Processed { event_id: event.id }),
            Err(WebhookError::Ignored(reason)) => {
                tracing::debug!(event_id = %event.id, %reason, "Webhook event ignored");
                Ok(WebhookAck::Ignored { event_id: event.id })
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for IdempotentWebhookProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdempotentWebhookProcessor")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::StripeEventBuilder;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::sync::RwLock;

    // ══════════════════════════════════════════════════════════════
    // Test Infrastructure
    // ══════════════════════════════════════════════════════════════

    #[derive(Default)]
    struct MockWebhookRepository {
        records: RwLock<HashMap<String, WebhookEventRecord>>,
    }

    #[async_trait]
    impl WebhookEventRepository for MockWebhookRepository {
        async fn find_by_event_id(
            &self,
            event_id: &str,
        ) -> Result<Option<WebhookEventRecord>, WebhookError> {
            Ok(self.records.read().await.get(event_id).cloned())
        }

        async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, WebhookError> {
            let mut records = self.records.write().await;
            if records.contains_key(&record.event_id) {
                return Ok(SaveResult::AlreadyExists);
            }
            records.insert(record.event_id.clone(), record);
            Ok(SaveResult::Inserted)
        }
    }

    struct CountingHandler {
        calls: AtomicU32,
        fail_with: Option<fn() -> WebhookError>,
    }

    impl CountingHandler {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                fail_with: None,
            })
        }

        fn failing(f: fn() -> WebhookError) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                fail_with: Some(f),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PaymentEventHandler for CountingHandler {
        fn handles(&self) -> Vec<StripeEventType> {
            vec![StripeEventType::PaymentIntentSucceeded]
        }

        async fn handle(&self, _event: &StripeEvent) -> Result<(), WebhookError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.fail_with {
                Some(f) => Err(f()),
                None => Ok(()),
            }
        }
    }

    fn processor(
        handler: Arc<CountingHandler>,
    ) -> (IdempotentWebhookProcessor, Arc<MockWebhookRepository>) {
        let repository = Arc::new(MockWebhookRepository::default());
        let dispatcher = EventDispatcher::new().register(handler);
        (
            IdempotentWebhookProcessor::new(repository.clone(), dispatcher),
            repository,
        )
    }

    // ══════════════════════════════════════════════════════════════
    // Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn processes_new_event_once() {
        let handler = CountingHandler::ok();
        let (processor, repository) = processor(handler.clone());
        let event = StripeEventBuilder::new().id("evt_1").build();

        let ack = processor.process(event).await.unwrap();

        assert_eq!(
            ack,
            WebhookAck::Processed {
                event_id: "evt_1".to_string()
            }
        );
        assert_eq!(handler.calls(), 1);
        let record = repository.find_by_event_id("evt_1").await.unwrap().unwrap();
        assert_eq!(record.outcome, WebhookOutcome::Processed);
    }

    #[tokio::test]
    async fn duplicate_delivery_is_not_dispatched() {
        let handler = CountingHandler::ok();
        let (processor, _) = processor(handler.clone());
        let event = StripeEventBuilder::new().id("evt_dup").build();

        processor.process(event.clone()).await.unwrap();
        let second = processor.process(event).await.unwrap();

        assert!(matches!(second, WebhookAck::Duplicate { .. }));
        assert_eq!(handler.calls(), 1);
    }

    #[tokio::test]
    async fn unhandled_type_is_ignored_and_recorded() {
        let handler = CountingHandler::ok();
        let (processor, repository) = processor(handler.clone());
        let event = StripeEventBuilder::new()
            .id("evt_other")
            .event_type("customer.created")
            .build();

        let ack = processor.process(event).await.unwrap();

        assert!(matches!(ack, WebhookAck::Ignored { .. }));
        assert_eq!(handler.calls(), 0);
        let record = repository
            .find_by_event_id("evt_other")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.outcome, WebhookOutcome::Ignored);
    }

    #[tokio::test]
    async fn retryable_failure_is_not_recorded() {
        let handler = CountingHandler::failing(|| WebhookError::HandlerFailed("down".into()));
        let (processor, repository) = processor(handler.clone());
        let event = StripeEventBuilder::new().id("evt_retry").build();

        let first = processor.process(event.clone()).await;
        assert!(matches!(first, Err(WebhookError::HandlerFailed(_))));
        assert!(repository
            .find_by_event_id("evt_retry")
            .await
            .unwrap()
            .is_none());

        let _ = processor.process(event).await;
        assert_eq!(handler.calls(), 2);
    }

    #[tokio::test]
    async fn permanent_failure_is_recorded() {
        let handler = CountingHandler::failing(|| WebhookError::ParseError("bad object".into()));
        let (processor, repository) = processor(handler.clone());
        let event = StripeEventBuilder::new().id("evt_bad").build();

        let result = processor.process(event).await;

        assert!(matches!(result, Err(WebhookError::ParseError(_))));
        let record = repository
            .find_by_event_id("evt_bad")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.outcome, WebhookOutcome::Failed);
    }

    #[test]
    fn dispatcher_reports_registered_types() {
        let dispatcher = EventDispatcher::new().register(CountingHandler::ok());
        assert!(dispatcher.handles(StripeEventType::PaymentIntentSucceeded));
        assert!(!dispatcher.handles(StripeEventType::ChargeRefunded));
    }
}
