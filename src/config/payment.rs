//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::upstream::validate_service_url;

/// Payment configuration (Stripe webhooks)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Stripe webhook signing secret
    pub stripe_webhook_secret: Option<SecretString>,

    /// Where verified payment events are forwarded, if anywhere
    pub payment_events_url: Option<String>,
}

impl PaymentConfig {
    /// Whether incoming webhooks can be verified at all
    pub fn webhooks_enabled(&self) -> bool {
        self.stripe_webhook_secret.is_some()
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(secret) = &self.stripe_webhook_secret {
            if !secret.expose_secret().starts_with("whsec_") {
                return Err(ValidationError::InvalidStripeWebhookSecret);
            }
        }
        if let Some(url) = &self.payment_events_url {
            validate_service_url("PAYMENT_EVENTS_URL", url)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> Option<SecretString> {
        Some(SecretString::new(value.to_string()))
    }

    #[test]
    fn test_webhooks_disabled_by_default() {
        let config = PaymentConfig::default();
        assert!(!config.webhooks_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_webhook_secret_prefix() {
        let config = PaymentConfig {
            stripe_webhook_secret: secret("secret_xxx"),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidStripeWebhookSecret)
        );
    }

    #[test]
    fn test_validation_invalid_events_url() {
        let config = PaymentConfig {
            stripe_webhook_secret: secret("whsec_xyz789"),
            payment_events_url: Some("ftp://events".to_string()),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        let config = PaymentConfig {
            stripe_webhook_secret: secret("whsec_xyz789"),
            payment_events_url: Some("http://billing.internal/events".to_string()),
        };
        assert!(config.webhooks_enabled());
        assert!(config.validate().is_ok());
    }
}
