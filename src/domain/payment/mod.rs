//! Payment domain - Stripe webhook events, signatures and processing.
//!
//! # Module Structure
//!
//! - `stripe_event` - Stripe event envelope and known event types
//! - `webhook_verifier` - `Stripe-Signature` verification
//! - `webhook_processor` - type dispatch with idempotent recording
//! - `webhook_errors` - error type and its HTTP status mapping

mod stripe_event;
mod webhook_errors;
mod webhook_processor;
mod webhook_verifier;

pub use stripe_event::{StripeEvent, StripeEventData, StripeEventType};
pub use webhook_errors::WebhookError;
pub use webhook_processor::{EventDispatcher, IdempotentWebhookProcessor};
pub use webhook_verifier::{sign_payload, SignatureHeader, StripeWebhookVerifier};

#[cfg(test)]
pub(crate) use stripe_event::StripeEventBuilder;
