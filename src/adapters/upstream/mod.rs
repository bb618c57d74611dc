//! Upstream delegates for the auth, user and project prefixes.

mod forwarder;
mod unconfigured;

pub use forwarder::{UpstreamError, UpstreamForwarder};
pub use unconfigured::UnconfiguredDelegate;
