//! Router assembly from a validated [`Pipeline`].
//!
//! Steps before the JSON body parser land in the raw segment, steps after it
//! in the parsed segment, which carries the parser's limit on JSON bodies.
//! Bodies of other content types in that segment are not limited. The
//! segments are merged, given the 404 fallback and wrapped in tracing and,
//! outermost, the cross-origin policy.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::domain::dispatch::{
    Pipeline, RegistrationStep, AUTH_PREFIX, HEALTH_PATH, PAYMENT_WEBHOOK_PATH, PROJECTS_PREFIX,
    ROOT_PATH, USERS_PREFIX,
};
use crate::ports::{PaymentWebhookHandler, RequestDelegate};

use super::body_limit::limit_json_bodies;
use super::cors::cors_layer;
use super::delegate::{mount_delegate, mount_nested};
use super::error::not_found;
use super::health::{health, root, Uptime};
use super::webhook::receive_payment_webhook;

/// Everything the router hands requests to.
#[derive(Clone)]
pub struct Collaborators {
    /// Receives every request under `/api/auth`, URI untouched.
    pub auth: Arc<dyn RequestDelegate>,
    /// Nested under `/api/user`.
    pub users: Router,
    /// Nested under `/api/project`.
    pub projects: Router,
    /// Receives the raw `POST /api/stripe` body.
    pub payment_webhook: Arc<dyn PaymentWebhookHandler>,
}

/// Build the application router.
///
/// Steps absent from `pipeline` are not registered.
pub fn build_app(
    pipeline: &Pipeline,
    collaborators: Collaborators,
    config: &ServerConfig,
    uptime: Uptime,
) -> Router {
    let mut raw = Router::new();
    let mut parsed = Router::new();

    for step in pipeline.steps() {
        let segment = if pipeline.is_body_parsed(*step) {
            &mut parsed
        } else {
            &mut raw
        };

        let current = std::mem::take(segment);
        *segment = match step {
            RegistrationStep::CrossOriginPolicy | RegistrationStep::JsonBodyParser => current,
            RegistrationStep::PaymentWebhook => current.route(
                PAYMENT_WEBHOOK_PATH,
                post(receive_payment_webhook).with_state(collaborators.payment_webhook.clone()),
            ),
            RegistrationStep::Auth => {
                current.merge(mount_delegate(AUTH_PREFIX, collaborators.auth.clone()))
            }
            RegistrationStep::Users => {
                mount_nested(current, USERS_PREFIX, collaborators.users.clone())
            }
            RegistrationStep::Projects => {
                mount_nested(current, PROJECTS_PREFIX, collaborators.projects.clone())
            }
            RegistrationStep::Health => {
                current.route(HEALTH_PATH, get(health).with_state(uptime))
            }
            RegistrationStep::Root => current.route(ROOT_PATH, get(root)),
        };

        tracing::debug!(%step, "Registered pipeline step");
    }

    let raw = raw.layer(DefaultBodyLimit::max(config.webhook_body_limit));

    let mut app = raw;
    if pipeline.contains(RegistrationStep::JsonBodyParser) {
        let parsed = parsed
            .layer(middleware::from_fn_with_state(
                config.json_body_limit,
                limit_json_bodies,
            ))
            .layer(DefaultBodyLimit::disable());
        app = app.merge(parsed);
    }

    let app = app.fallback(not_found).layer(TraceLayer::new_for_http());

    if pipeline.contains(RegistrationStep::CrossOriginPolicy) {
        app.layer(cors_layer(config))
    } else {
        app
    }
}
