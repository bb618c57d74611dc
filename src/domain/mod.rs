//! Domain layer - Routing order rules and payment webhook logic.
//!
//! Nothing here performs I/O; adapters drive it through the ports.

pub mod dispatch;
pub mod payment;
