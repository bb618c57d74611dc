//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - axum router, middleware and endpoints
//! - `upstream` - `reqwest` reverse proxy for delegated prefixes
//! - `payment_events` - consumers of verified Stripe events
//! - `webhook_store` - processed webhook event records

pub mod http;
pub mod payment_events;
pub mod upstream;
pub mod webhook_store;
