//! Cross-origin policy layer.

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::config::ServerConfig;

/// Build the CORS layer from `TRUSTED_ORIGINS`.
///
/// With an allow list only those exact origins are echoed back. Without one
/// the request origin is mirrored, so every origin is accepted. Credentials
/// are allowed in both cases, which rules out the `*` wildcard.
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let allow_origin = match config.trusted_origins_list() {
        Some(origins) => {
            let values: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(%origin, "Dropping trusted origin that is not a valid header value");
                        None
                    }
                })
                .collect();
            AllowOrigin::list(values)
        }
        None => AllowOrigin::mirror_request(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}
