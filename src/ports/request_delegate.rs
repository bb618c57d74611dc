//! RequestDelegate port - A collaborator that takes over a whole request.
//!
//! The authentication handler is the main user: everything under its prefix
//! (method, untouched URI, headers, cookies, body) is handed over and its
//! response is returned to the client as-is. Nothing here inspects either.

use async_trait::async_trait;
use axum::extract::Request;
use axum::response::Response;

/// Opaque request handler.
///
/// # Contract
///
/// Implementations must always produce a response; failures are expressed
/// as error statuses, never as a missing response.
#[async_trait]
pub trait RequestDelegate: Send + Sync {
    async fn handle(&self, request: Request) -> Response;
}
