//! Payment handlers.

mod handle_payment_webhook;

pub use handle_payment_webhook::HandlePaymentWebhookHandler;
