//! PaymentWebhookHandler port - Receiver for raw payment-provider callbacks.

use async_trait::async_trait;
use axum::body::Bytes;

use crate::domain::payment::WebhookError;

/// What the webhook endpoint acknowledges back to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookAck {
    /// Event handled now.
    Processed { event_id: String },
    /// Event seen before; nothing done.
    Duplicate { event_id: String },
    /// Event accepted but no handler cares about it.
    Ignored { event_id: String },
}

/// Receives the webhook body exactly as it arrived on the wire.
///
/// # Contract
///
/// - `payload` is the unparsed request body; it must not be re-encoded
///   before signature verification.
/// - `signature` is the provider's signature header, if the request had one.
#[async_trait]
pub trait PaymentWebhookHandler: Send + Sync {
    async fn handle(
        &self,
        payload: Bytes,
        signature: Option<&str>,
    ) -> Result<WebhookAck, WebhookError>;
}
