//! Application layer - Handlers that coordinate domain logic and ports.

pub mod handlers;

pub use handlers::HandlePaymentWebhookHandler;
