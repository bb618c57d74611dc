//! PaymentEventHandler port - Consumer of verified Stripe events.
//!
//! Handlers see events only after the signature has been checked and the
//! event id has been checked against the idempotency store. What they do with the
//! event (crediting an account, marking a transaction paid) is theirs.

use async_trait::async_trait;

use crate::domain::payment::{StripeEvent, StripeEventType, WebhookError};

/// Handler for one or more Stripe event types.
#[async_trait]
pub trait PaymentEventHandler: Send + Sync {
    /// Event types this handler accepts.
    fn handles(&self) -> Vec<StripeEventType>;

    /// Handles a verified event.
    ///
    /// Returns `Err(WebhookError::Ignored(_))` if the event should be
    /// acknowledged without effect; other errors make Stripe retry.
    async fn handle(&self, event: &StripeEvent) -> Result<(), WebhookError>;
}
