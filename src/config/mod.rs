//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Variables are read without a prefix
//! (`PORT`, `TRUSTED_ORIGINS`, `STRIPE_WEBHOOK_SECRET`, ...) so the server can
//! be dropped into the same environment the rest of the platform uses.
//!
//! # Example
//!
//! ```no_run
//! use sitecraft_server::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server will listen on port {}", config.server.port);
//! ```

mod error;
mod payment;
mod server;
mod upstream;

pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{LogFormat, ServerConfig};
pub use upstream::UpstreamConfig;

/// Root application configuration
///
/// Every section is read from the same flat set of environment variables.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Server configuration (bind address, origins, body limits, logging)
    pub server: ServerConfig,

    /// Payment configuration (Stripe webhook secret, event forwarding)
    pub payment: PaymentConfig,

    /// Upstream services behind the delegated prefixes
    pub upstream: UpstreamConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads every environment variable, lowercased, as a config key
    /// 3. Deserializes each section from the same source
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        Self::from_environment(config::Environment::default())
    }

    /// Build configuration from an explicit environment source.
    ///
    /// `load()` uses the process environment; tests pass a fixed map via
    /// `config::Environment::source`.
    pub fn from_environment(environment: config::Environment) -> Result<Self, ConfigError> {
        // An empty variable counts as unset, so `TRUSTED_ORIGINS=` allows any origin.
        let settings = config::Config::builder()
            .add_source(environment.ignore_empty(true))
            .build()?;

        Ok(Self {
            server: settings.clone().try_deserialize()?,
            payment: settings.clone().try_deserialize()?,
            upstream: settings.try_deserialize()?,
        })
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate()?;
        self.upstream.validate()?;
        Ok(())
    }
}
