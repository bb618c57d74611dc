//! Command handlers.

pub mod payment;

pub use payment::HandlePaymentWebhookHandler;
