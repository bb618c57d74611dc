//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind host: {0}")]
    InvalidHost(String),

    #[error("Body limit for {0} must be greater than zero")]
    InvalidBodyLimit(&'static str),

    #[error("Invalid trusted origin: {0}")]
    InvalidTrustedOrigin(String),

    #[error("Invalid Stripe webhook secret format")]
    InvalidStripeWebhookSecret,

    #[error("Invalid URL for {name}: {value}")]
    InvalidServiceUrl { name: &'static str, value: String },

    #[error("Invalid upstream timeout")]
    InvalidTimeout,
}
