//! Liveness and smoke-test endpoints.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Process start marker used to report uptime.
#[derive(Debug, Clone, Copy)]
pub struct Uptime(Instant);

impl Uptime {
    pub fn start() -> Self {
        Self(Instant::now())
    }

    /// Seconds elapsed since the marker was taken.
    pub fn seconds(&self) -> f64 {
        self.0.elapsed().as_secs_f64()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime: f64,
}

/// `GET /health`
pub async fn health(State(uptime): State<Uptime>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        uptime: uptime.seconds(),
    })
}

/// `GET /`
pub async fn root() -> &'static str {
    "Server is Live!"
}
