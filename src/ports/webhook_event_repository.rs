//! WebhookEventRepository port - Interface for tracking processed Stripe webhooks.
//!
//! Stripe may deliver the same webhook more than once (timeouts, 5xx
//! responses, lost acknowledgements). Recording each event id lets the
//! processor skip redeliveries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::payment::WebhookError;

/// Outcome recorded for a processed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Processed,
    Ignored,
    Failed,
}

/// Record of a processed webhook event.
#[derive(Debug, Clone)]
pub struct WebhookEventRecord {
    /// Stripe event ID (evt_xxx format).
    pub event_id: String,

    /// Type of Stripe event (e.g., "payment_intent.succeeded").
    pub event_type: String,

    pub processed_at: DateTime<Utc>,

    pub outcome: WebhookOutcome,

    /// Error or ignore reason, if any.
    pub detail: Option<String>,
}

impl WebhookEventRecord {
    pub fn new(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        outcome: WebhookOutcome,
        detail: Option<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at: Utc::now(),
            outcome,
            detail,
        }
    }
}

/// Result of attempting to save a webhook event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// Record was inserted (first time seeing this event).
    Inserted,
    /// Record already exists (duplicate event).
    AlreadyExists,
}

/// Port for storing and retrieving processed webhook events.
#[async_trait]
pub trait WebhookEventRepository: Send + Sync {
    /// Find a previously processed event by its Stripe event ID.
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRecord>, WebhookError>;

    /// Save a record unless one with the same event id exists.
    ///
    /// Must be atomic per event id: of two concurrent saves, exactly one
    /// reports `Inserted`.
    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, WebhookError>;
}
