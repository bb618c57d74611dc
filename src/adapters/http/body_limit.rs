//! Size limit for JSON request bodies.
//!
//! Only bodies declared `application/json` are limited. Other content types
//! pass through to their handler untouched, whatever their size.
//!
//! ```ignore
//! router.layer(middleware::from_fn_with_state(limit, limit_json_bodies));
//! ```

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use http_body_util::Limited;

use super::error::ErrorResponse;

/// Reject JSON bodies over `limit` bytes.
///
/// A declared `Content-Length` over the limit is answered with 413 before the
/// handler runs. Otherwise the body is capped so that reading past `limit`
/// fails.
pub async fn limit_json_bodies(
    State(limit): State<usize>,
    request: Request,
    next: Next,
) -> Response {
    if !is_json(request.headers()) {
        return next.run(request).await;
    }

    if declared_length(request.headers()).is_some_and(|length| length > limit) {
        tracing::debug!(limit, "Rejected JSON body over limit");
        return ErrorResponse::new(
            "PAYLOAD_TOO_LARGE",
            format!("JSON body exceeds {limit} bytes"),
        )
        .with_status(StatusCode::PAYLOAD_TOO_LARGE);
    }

    let (parts, body) = request.into_parts();
    let request = Request::from_parts(parts, Body::new(Limited::new(body, limit)));
    next.run(request).await
}

/// Whether the media type is `application/json`, ignoring case and parameters.
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
}
