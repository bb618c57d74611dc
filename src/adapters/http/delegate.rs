//! Mounting of whole-request delegates.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use tower::ServiceExt;

use crate::ports::RequestDelegate;

async fn delegate_request(
    State(delegate): State<Arc<dyn RequestDelegate>>,
    request: Request,
) -> Response {
    delegate.handle(request).await
}

/// Hand every method on `prefix` and everything below it to `delegate`.
///
/// The request URI reaches the delegate unchanged. `prefix/` is registered on
/// its own since `/*rest` needs a non-empty tail.
pub fn mount_delegate(prefix: &str, delegate: Arc<dyn RequestDelegate>) -> Router {
    Router::new()
        .route(prefix, any(delegate_request))
        .route(&format!("{prefix}/"), any(delegate_request))
        .route(&format!("{prefix}/*rest"), any(delegate_request))
        .with_state(delegate)
}

/// Nest `router` under `prefix` and route `prefix/` to the nested root.
///
/// `Router::nest` maps the nested `/` to `prefix` only.
pub fn mount_nested(outer: Router, prefix: &str, router: Router) -> Router {
    let nested_root = router.clone();
    outer.nest(prefix, router).route(
        &format!("{prefix}/"),
        any(move |request: Request| call_nested_root(nested_root.clone(), request)),
    )
}

async fn call_nested_root(router: Router, mut request: Request) -> Response {
    let stripped = match request.uri().query() {
        Some(query) => format!("/?{query}"),
        None => "/".to_string(),
    };
    match stripped.parse::<Uri>() {
        Ok(uri) => *request.uri_mut() = uri,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    }

    match router.oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}

/// A router that answers every path with `delegate`, for nesting under a
/// resource prefix. Nested requests see the stripped URI; the full one is in
/// the `OriginalUri` extension.
pub fn delegate_router(delegate: Arc<dyn RequestDelegate>) -> Router {
    Router::new()
        .route("/", any(delegate_request))
        .route("/*rest", any(delegate_request))
        .with_state(delegate)
}
