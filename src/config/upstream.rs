//! Upstream service configuration
//!
//! Base URLs for the services that own authentication and the user and
//! project resources. Unset URLs leave the prefix mounted but answering 503.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upstream service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL for `/api/auth`
    pub auth_service_url: Option<String>,

    /// Base URL for `/api/user`
    pub user_service_url: Option<String>,

    /// Base URL for `/api/project`
    pub project_service_url: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_upstream_timeout")]
    pub upstream_timeout_secs: u64,
}

impl UpstreamConfig {
    /// Get the upstream timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// Validate upstream configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.upstream_timeout_secs == 0 || self.upstream_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        let urls = [
            ("AUTH_SERVICE_URL", &self.auth_service_url),
            ("USER_SERVICE_URL", &self.user_service_url),
            ("PROJECT_SERVICE_URL", &self.project_service_url),
        ];
        for (name, url) in urls {
            if let Some(url) = url {
                validate_service_url(name, url)?;
            }
        }
        Ok(())
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            auth_service_url: None,
            user_service_url: None,
            project_service_url: None,
            upstream_timeout_secs: default_upstream_timeout(),
        }
    }
}

pub(crate) fn validate_service_url(name: &'static str, value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidServiceUrl {
        name,
        value: value.to_string(),
    };
    let url = reqwest::Url::parse(value).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(())
}

fn default_upstream_timeout() -> u64 {
    30
}
