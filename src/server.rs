//! Composition root - builds collaborators from configuration and serves.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::adapters::http::{build_app, delegate_router, Collaborators, Uptime};
use crate::adapters::payment_events::{ForwardingPaymentEventHandler, LoggingPaymentEventHandler};
use crate::adapters::upstream::{UnconfiguredDelegate, UpstreamError, UpstreamForwarder};
use crate::adapters::webhook_store::InMemoryWebhookEventRepository;
use crate::application::HandlePaymentWebhookHandler;
use crate::config::{AppConfig, ConfigError, ValidationError};
use crate::domain::dispatch::Pipeline;
use crate::domain::payment::{
    EventDispatcher, IdempotentWebhookProcessor, StripeWebhookVerifier, WebhookError,
};
use crate::ports::{PaymentEventHandler, RequestDelegate};

/// Errors that stop the server from starting or keep it from running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Upstream setup failed: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Payment event handler setup failed: {0}")]
    PaymentEvents(#[from] WebhookError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl Collaborators {
    /// Wire collaborators from configuration.
    ///
    /// Prefixes without a service URL get an [`UnconfiguredDelegate`]. The
    /// webhook refuses deliveries when no signing secret is set.
    pub fn from_config(config: &AppConfig) -> Result<Self, ServerError> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream.timeout())
            .build()
            .map_err(UpstreamError::Client)?;

        let auth = delegate("auth", config.upstream.auth_service_url.as_deref(), &client)?;
        let users = delegate("user", config.upstream.user_service_url.as_deref(), &client)?;
        let projects = delegate(
            "project",
            config.upstream.project_service_url.as_deref(),
            &client,
        )?;

        Ok(Self {
            auth,
            users: delegate_router(users),
            projects: delegate_router(projects),
            payment_webhook: Arc::new(payment_webhook_handler(config)?),
        })
    }
}

fn delegate(
    service: &'static str,
    url: Option<&str>,
    client: &reqwest::Client,
) -> Result<Arc<dyn RequestDelegate>, ServerError> {
    match url {
        Some(url) => {
            tracing::info!(service, %url, "Delegating to upstream");
            Ok(Arc::new(UpstreamForwarder::with_client(
                service,
                url,
                client.clone(),
            )?))
        }
        None => {
            tracing::warn!(service, "No upstream configured, requests will get 503");
            Ok(Arc::new(UnconfiguredDelegate::new(service)))
        }
    }
}

fn payment_webhook_handler(config: &AppConfig) -> Result<HandlePaymentWebhookHandler, ServerError> {
    let verifier = config
        .payment
        .stripe_webhook_secret
        .clone()
        .map(StripeWebhookVerifier::new);
    if !config.payment.webhooks_enabled() {
        tracing::warn!("STRIPE_WEBHOOK_SECRET not set, payment webhooks will be refused");
    }

    let events: Arc<dyn PaymentEventHandler> = match &config.payment.payment_events_url {
        Some(url) => Arc::new(ForwardingPaymentEventHandler::new(
            url.clone(),
            config.upstream.timeout(),
        )?),
        None => Arc::new(LoggingPaymentEventHandler),
    };

    let processor = IdempotentWebhookProcessor::new(
        Arc::new(InMemoryWebhookEventRepository::new()),
        EventDispatcher::new().register(events),
    );

    Ok(HandlePaymentWebhookHandler::new(verifier, processor))
}

/// Build the router for a validated configuration.
pub fn app(config: &AppConfig, uptime: Uptime) -> Result<Router, ServerError> {
    let collaborators = Collaborators::from_config(config)?;
    Ok(build_app(
        &Pipeline::standard(),
        collaborators,
        &config.server,
        uptime,
    ))
}

/// Bind the listening socket. Failure is not retried.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Build, bind and serve until Ctrl-C or SIGTERM.
pub async fn run(config: AppConfig) -> Result<(), ServerError> {
    let uptime = Uptime::start();
    let app = app(&config, uptime)?;
    let listener = bind(config.server.socket_addr()?).await?;
    serve(listener, app, shutdown_signal()).await
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let port = listener.local_addr().map_err(ServerError::Serve)?.port();
    tracing::info!("Server running on port {}", port);

    let service = app.into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
