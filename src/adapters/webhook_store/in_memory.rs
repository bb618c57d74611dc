//! In-memory webhook event store.
//!
//! Process-local: records are lost on restart, so a redelivery after a
//! restart is dispatched again. Handlers must tolerate that.
//!
//! Records older than the retention window are pruned on every save.
//! Stripe stops redelivering an event after three days, so a record past
//! that age can no longer suppress a duplicate.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use crate::domain::payment::WebhookError;
use crate::ports::{SaveResult, WebhookEventRecord, WebhookEventRepository};

/// How long a processed event id is remembered.
pub const DEFAULT_RETENTION_DAYS: i64 = 3;

/// Webhook event records kept in a map keyed by event id.
#[derive(Debug)]
pub struct InMemoryWebhookEventRepository {
    records: RwLock<HashMap<String, WebhookEventRecord>>,
    retention: Duration,
}

impl Default for InMemoryWebhookEventRepository {
    fn default() -> Self {
        Self {
            records: RwLock::default(),
            retention: Duration::days(DEFAULT_RETENTION_DAYS),
        }
    }
}

impl InMemoryWebhookEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    fn is_live(&self, record: &WebhookEventRecord) -> bool {
        record.processed_at > Utc::now() - self.retention
    }
}

#[async_trait]
impl WebhookEventRepository for InMemoryWebhookEventRepository {
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRecord>, WebhookError> {
        Ok(self
            .records
            .read()
            .await
            .get(event_id)
            .filter(|record| self.is_live(record))
            .cloned())
    }

    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, WebhookError> {
        let mut records = self.records.write().await;
        let cutoff = Utc::now() - self.retention;
        records.retain(|_, existing| existing.processed_at > cutoff);

        if records.contains_key(&record.event_id) {
            return Ok(SaveResult::AlreadyExists);
        }
        records.insert(record.event_id.clone(), record);
        Ok(SaveResult::Inserted)
    }
}
