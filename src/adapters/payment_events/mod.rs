//! Consumers of verified payment events.

mod forwarding;
mod logging;

pub use forwarding::ForwardingPaymentEventHandler;
pub use logging::LoggingPaymentEventHandler;
