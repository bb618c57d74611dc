//! Reverse-proxy delegate backed by `reqwest`.
//!
//! Forwards method, original path and query, end-to-end headers and the
//! buffered body to a base URL, then streams the upstream response back.
//! The client's host, scheme and address travel in `X-Forwarded-*` headers.

use std::error::Error as StdError;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{ConnectInfo, OriginalUri, Request};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;
use reqwest::{Client, Url};
use thiserror::Error;

use crate::adapters::http::ErrorResponse;
use crate::ports::RequestDelegate;

/// Headers that describe a single connection and are never forwarded.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");
const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Errors raised while forwarding a request.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Invalid upstream URL for {service}: {reason}")]
    InvalidUrl {
        service: &'static str,
        reason: String,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request body exceeds the configured limit")]
    BodyTooLarge,

    #[error("Failed to read request body: {0}")]
    Body(String),

    #[error("Upstream {service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            UpstreamError::BodyTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            UpstreamError::Body(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            UpstreamError::Request { .. } => (StatusCode::BAD_GATEWAY, "BAD_GATEWAY"),
            UpstreamError::InvalidUrl { .. } | UpstreamError::Client(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Upstream delegation failed");
        }

        ErrorResponse::new(code, self.to_string()).with_status(status)
    }
}

/// Delegate that proxies requests to an upstream service.
#[derive(Debug, Clone)]
pub struct UpstreamForwarder {
    service: &'static str,
    base_url: String,
    client: Client,
}

impl UpstreamForwarder {
    /// Create a forwarder with its own client.
    ///
    /// `service` names the upstream in logs and error messages.
    pub fn new(
        service: &'static str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(UpstreamError::Client)?;
        Self::with_client(service, base_url, client)
    }

    /// Create a forwarder sharing an existing client.
    pub fn with_client(
        service: &'static str,
        base_url: &str,
        client: Client,
    ) -> Result<Self, UpstreamError> {
        let parsed = Url::parse(base_url).map_err(|e| UpstreamError::InvalidUrl {
            service,
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(UpstreamError::InvalidUrl {
                service,
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        Ok(Self {
            service,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Upstream URL for an incoming path and query.
    fn target_url(&self, path_and_query: &str) -> Result<Url, UpstreamError> {
        Url::parse(&format!("{}{}", self.base_url, path_and_query)).map_err(|e| {
            UpstreamError::InvalidUrl {
                service: self.service,
                reason: e.to_string(),
            }
        })
    }

    async fn forward(&self, request: Request) -> Result<Response, UpstreamError> {
        let (parts, body) = request.into_parts();

        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let url = self.target_url(path_and_query)?;

        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(classify_body_error)?;

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        let mut headers = end_to_end_headers(&parts.headers);
        add_forwarding_headers(&mut headers, peer);
        headers.remove(header::HOST);
        headers.remove(header::CONTENT_LENGTH);

        tracing::debug!(service = self.service, method = %parts.method, %url, "Forwarding request upstream");

        let upstream = self
            .client
            .request(parts.method, url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|source| UpstreamError::Request {
                service: self.service,
                source,
            })?;

        let status = upstream.status();
        let headers = end_to_end_headers(upstream.headers());

        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

#[async_trait]
impl RequestDelegate for UpstreamForwarder {
    async fn handle(&self, request: Request) -> Response {
        match self.forward(request).await {
            Ok(response) => response,
            Err(err) => err.into_response(),
        }
    }
}

fn end_to_end_headers(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = headers.clone();
    for name in HOP_BY_HOP {
        forwarded.remove(name);
    }
    forwarded
}

/// Record the client's view of the request. Values set by a proxy in front
/// of this server are kept; the peer address is appended to the chain.
fn add_forwarding_headers(headers: &mut HeaderMap, peer: Option<SocketAddr>) {
    if !headers.contains_key(&X_FORWARDED_HOST) {
        if let Some(host) = headers.get(header::HOST).cloned() {
            headers.insert(X_FORWARDED_HOST, host);
        }
    }

    if !headers.contains_key(&X_FORWARDED_PROTO) {
        headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("http"));
    }

    if let Some(peer) = peer {
        let ip = peer.ip().to_string();
        let chain = match headers.get(&X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
            Some(existing) => format!("{existing}, {ip}"),
            None => ip,
        };
        if let Ok(value) = HeaderValue::from_str(&chain) {
            headers.insert(X_FORWARDED_FOR, value);
        }
    }
}

/// A body cut off by the body limit layer surfaces as `LengthLimitError`
/// somewhere in the source chain.
fn classify_body_error(err: axum::Error) -> UpstreamError {
    let mut source: Option<&(dyn StdError + 'static)> = Some(&err);
    while let Some(current) = source {
        if current.is::<LengthLimitError>() {
            return UpstreamError::BodyTooLarge;
        }
        source = current.source();
    }
    UpstreamError::Body(err.to_string())
}
