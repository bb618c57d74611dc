//! Server configuration

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

use super::error::ValidationError;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed to make credentialed cross-origin requests (comma-separated).
    /// `None` mirrors whatever origin the request carries.
    pub trusted_origins: Option<String>,

    /// Maximum `application/json` body size in bytes for routes registered after
    /// the JSON body parser
    #[serde(default = "default_json_body_limit")]
    pub json_body_limit: usize,

    /// Maximum raw body size in bytes for the payment webhook
    #[serde(default = "default_webhook_body_limit")]
    pub webhook_body_limit: usize,

    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log filter directive used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl ServerConfig {
    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ValidationError::InvalidHost(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Get trusted origins as a vector
    ///
    /// Entries are trimmed and empty entries dropped. `None` means the
    /// variable was not set at all, which is different from an empty list.
    pub fn trusted_origins_list(&self) -> Option<Vec<String>> {
        self.trusted_origins.as_deref().map(parse_origin_list)
    }

    /// Validate server configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        self.socket_addr()?;
        if self.json_body_limit == 0 {
            return Err(ValidationError::InvalidBodyLimit("JSON_BODY_LIMIT"));
        }
        if self.webhook_body_limit == 0 {
            return Err(ValidationError::InvalidBodyLimit("WEBHOOK_BODY_LIMIT"));
        }
        for origin in self.trusted_origins_list().unwrap_or_default() {
            let scheme_ok = origin.starts_with("http://") || origin.starts_with("https://");
            if !scheme_ok || origin.contains('*') || http::HeaderValue::from_str(&origin).is_err() {
                return Err(ValidationError::InvalidTrustedOrigin(origin));
            }
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            trusted_origins: None,
            json_body_limit: default_json_body_limit(),
            webhook_body_limit: default_webhook_body_limit(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

pub(crate) fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// 50 MiB.
fn default_json_body_limit() -> usize {
    50 * 1024 * 1024
}

/// 100 KiB.
fn default_webhook_body_limit() -> usize {
    100 * 1024
}

fn default_log_level() -> String {
    "info,sitecraft_server=debug,tower_http=info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.json_body_limit, 52_428_800);
        assert_eq!(config.webhook_body_limit, 102_400);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.trusted_origins.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 4000,
            ..Default::default()
        };
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:4000");
    }

    #[test]
    fn test_socket_addr_rejects_hostname() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.socket_addr(),
            Err(ValidationError::InvalidHost(_))
        ));
    }

    #[test]
    fn test_trusted_origins_parsing() {
        let config = ServerConfig {
            trusted_origins: Some("https://a.com, https://b.com,,".to_string()),
            ..Default::default()
        };
        let origins = config.trusted_origins_list().unwrap();
        assert_eq!(origins, vec!["https://a.com", "https://b.com"]);
    }

    #[test]
    fn test_trusted_origins_unset_is_none() {
        let config = ServerConfig::default();
        assert!(config.trusted_origins_list().is_none());
    }

    #[test]
    fn test_validation_invalid_port() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPort));
    }

    #[test]
    fn test_validation_zero_body_limits() {
        let config = ServerConfig {
            json_body_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            webhook_body_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_wildcard_origin() {
        let config = ServerConfig {
            trusted_origins: Some("*".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTrustedOrigin(_))
        ));
    }

    #[test]
    fn test_validation_rejects_origin_without_scheme() {
        let config = ServerConfig {
            trusted_origins: Some("https://a.com,b.com".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidTrustedOrigin("b.com".to_string()))
        );
    }

    #[test]
    fn test_validation_valid_config() {
        let config = ServerConfig {
            trusted_origins: Some("https://a.com,http://localhost:5173".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    proptest! {
        #[test]
        fn origin_list_entries_are_trimmed_and_non_empty(raw in "[a-z:/., ]{0,64}") {
            for origin in parse_origin_list(&raw) {
                prop_assert!(!origin.is_empty());
                prop_assert_eq!(origin.trim(), origin.as_str());
                prop_assert!(!origin.contains(','));
            }
        }
    }
}
