//! Stripe webhook event types.
//!
//! Only the envelope is modelled; `data.object` stays as JSON because its
//! shape depends on the event type and the handlers downstream own it.

use serde::{Deserialize, Serialize};

/// Stripe webhook event envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "payment_intent.succeeded").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    pub created: i64,

    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,

    /// API version used to render this event.
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,

    /// Previous values for updated attributes (only for update events).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<serde_json::Value>,
}

impl StripeEvent {
    pub fn is_live(&self) -> bool {
        self.livemode
    }

    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::parse(&self.event_type)
    }

    /// Id of the Stripe object the event is about (`data.object.id`).
    pub fn object_id(&self) -> Option<&str> {
        self.data.object.get("id").and_then(|v| v.as_str())
    }
}

/// Stripe event types this server knows how to route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StripeEventType {
    CheckoutSessionCompleted,
    PaymentIntentSucceeded,
    PaymentIntentFailed,
    ChargeRefunded,
    Unknown,
}

impl StripeEventType {
    /// Every type with a dedicated variant.
    pub const KNOWN: [StripeEventType; 4] = [
        StripeEventType::CheckoutSessionCompleted,
        StripeEventType::PaymentIntentSucceeded,
        StripeEventType::PaymentIntentFailed,
        StripeEventType::ChargeRefunded,
    ];

    /// Parse event type from string.
    pub fn parse(s: &str) -> Self {
        match s {
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            "payment_intent.succeeded" => Self::PaymentIntentSucceeded,
            "payment_intent.payment_failed" => Self::PaymentIntentFailed,
            "charge.refunded" => Self::ChargeRefunded,
            _ => Self::Unknown,
        }
    }

    /// Convert to the Stripe event type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckoutSessionCompleted => "checkout.session.completed",
            Self::PaymentIntentSucceeded => "payment_intent.succeeded",
            Self::PaymentIntentFailed => "payment_intent.payment_failed",
            Self::ChargeRefunded => "charge.refunded",
            Self::Unknown => "unknown",
        }
    }
}

/// Builder for creating test StripeEvent instances.
#[cfg(test)]
pub(crate) struct StripeEventBuilder {
    id: String,
    event_type: String,
    object: serde_json::Value,
    livemode: bool,
}

#[cfg(test)]
impl StripeEventBuilder {
    pub(crate) fn new() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "payment_intent.succeeded".to_string(),
            object: serde_json::json!({}),
            livemode: false,
        }
    }

    pub(crate) fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub(crate) fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub(crate) fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub(crate) fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: chrono::Utc::now().timestamp(),
            data: StripeEventData {
                object: self.object,
                previous_attributes: None,
            },
            livemode: self.livemode,
            api_version: Some("2024-06-20".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_event() {
        let json = r#"{"id":"evt_1","type":"charge.refunded","created":1704067200,"data":{"object":{"id":"ch_1"}}}"#;
        let event: StripeEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, "evt_1");
        assert_eq!(event.parsed_type(), StripeEventType::ChargeRefunded);
        assert_eq!(event.object_id(), Some("ch_1"));
        assert!(!event.is_live());
        assert!(event.api_version.is_none());
    }

    #[test]
    fn unknown_types_fall_back() {
        assert_eq!(
            StripeEventType::parse("customer.created"),
            StripeEventType::Unknown
        );
        assert_eq!(
            StripeEventType::parse(StripeEventType::PaymentIntentFailed.as_str()),
            StripeEventType::PaymentIntentFailed
        );
    }
}
