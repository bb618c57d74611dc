//! Ports - Interfaces the HTTP layer and the payment domain depend on.
//!
//! Adapters implement these traits; the router only ever sees `Arc<dyn _>`.

mod payment_event_handler;
mod payment_webhook;
mod request_delegate;
mod webhook_event_repository;

pub use payment_event_handler::PaymentEventHandler;
pub use payment_webhook::{PaymentWebhookHandler, WebhookAck};
pub use request_delegate::RequestDelegate;
pub use webhook_event_repository::{
    SaveResult, WebhookEventRecord, WebhookEventRepository, WebhookOutcome,
};
