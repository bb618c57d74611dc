//! Payment event handler that only logs.

use async_trait::async_trait;

use crate::domain::payment::{StripeEvent, StripeEventType, WebhookError};
use crate::ports::PaymentEventHandler;

/// Records verified events in the log and does nothing else.
///
/// Used when no `PAYMENT_EVENTS_URL` is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingPaymentEventHandler;

#[async_trait]
impl PaymentEventHandler for LoggingPaymentEventHandler {
    fn handles(&self) -> Vec<StripeEventType> {
        StripeEventType::KNOWN.to_vec()
    }

    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError> {
        tracing::info!(
            event_id = %event.id,
            event_type = %event.event_type,
            object_id = event.object_id().unwrap_or("-"),
            livemode = event.is_live(),
            "Payment event received"
        );
        Ok(())
    }
}
