//! HTTP adapter - axum wiring of the request pipeline.
//!
//! # Module Structure
//!
//! - `app` - assembles the router from a `Pipeline` and `Collaborators`
//! - `cors` - origin policy from `TRUSTED_ORIGINS`
//! - `webhook` - raw-body `POST /api/stripe`
//! - `body_limit` - size limit on JSON bodies past the parser
//! - `delegate` - whole-request delegation for auth and resource routers
//! - `health` - `GET /health` and `GET /`
//! - `error` - JSON error bodies and the 404 fallback

mod app;
mod body_limit;
mod cors;
mod delegate;
mod error;
mod health;
mod webhook;

pub use app::{build_app, Collaborators};
pub use body_limit::limit_json_bodies;
pub use cors::cors_layer;
pub use delegate::{delegate_router, mount_delegate, mount_nested};
pub use error::{not_found, ErrorResponse};
pub use health::{health, root, HealthResponse, Uptime};
pub use webhook::{receive_payment_webhook, WebhookApiError, WebhookReceived, STRIPE_SIGNATURE_HEADER};
