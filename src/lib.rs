//! Sitecraft Server - HTTP entry point for the Sitecraft platform.
//!
//! Builds the request pipeline (origin policy, raw-body payment webhook,
//! JSON body limit, delegated auth and resource prefixes, health) and
//! serves it.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod observability;
pub mod ports;
pub mod server;
