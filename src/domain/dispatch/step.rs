//! Registration steps - the units the request pipeline is built from.

use std::fmt;

/// Path of the payment webhook endpoint.
pub const PAYMENT_WEBHOOK_PATH: &str = "/api/stripe";
/// Prefix delegated to the authentication handler.
pub const AUTH_PREFIX: &str = "/api/auth";
/// Prefix owned by the user resource router.
pub const USERS_PREFIX: &str = "/api/user";
/// Prefix owned by the project resource router.
pub const PROJECTS_PREFIX: &str = "/api/project";
/// Liveness endpoint polled by external monitoring.
pub const HEALTH_PATH: &str = "/health";
/// Manual smoke-test endpoint.
pub const ROOT_PATH: &str = "/";

/// HTTP method constraint of a route registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodMatch {
    Any,
    Get,
    Post,
}

/// How a registration matches request paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMatch {
    /// Exactly this path.
    Exact(&'static str),
    /// This path and everything beneath it.
    Prefix(&'static str),
}

impl PathMatch {
    /// Returns true if `path` falls under this registration.
    ///
    /// Prefixes match on segment boundaries: `/api/user` covers `/api/user`
    /// and `/api/user/42` but not `/api/users`.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathMatch::Exact(p) => path == *p,
            PathMatch::Prefix(p) => match path.strip_prefix(p) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }
}

/// One entry of the ordered startup sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationStep {
    /// Origin policy applied to every request before routing.
    CrossOriginPolicy,
    /// `POST /api/stripe` with the body kept as raw bytes.
    PaymentWebhook,
    /// Body size limit for JSON-parsed routes registered after this point.
    JsonBodyParser,
    /// Everything under `/api/auth`, handed over whole.
    Auth,
    /// Everything under `/api/user`.
    Users,
    /// Everything under `/api/project`.
    Projects,
    /// `GET /health`.
    Health,
    /// `GET /`.
    Root,
}

impl RegistrationStep {
    /// The (method, path) registration this step contributes, if it is a route.
    ///
    /// Middleware steps return `None`.
    pub fn route(&self) -> Option<(MethodMatch, PathMatch)> {
        match self {
            RegistrationStep::CrossOriginPolicy | RegistrationStep::JsonBodyParser => None,
            RegistrationStep::PaymentWebhook => {
                Some((MethodMatch::Post, PathMatch::Exact(PAYMENT_WEBHOOK_PATH)))
            }
            RegistrationStep::Auth => Some((MethodMatch::Any, PathMatch::Prefix(AUTH_PREFIX))),
            RegistrationStep::Users => Some((MethodMatch::Any, PathMatch::Prefix(USERS_PREFIX))),
            RegistrationStep::Projects => {
                Some((MethodMatch::Any, PathMatch::Prefix(PROJECTS_PREFIX)))
            }
            RegistrationStep::Health => Some((MethodMatch::Get, PathMatch::Exact(HEALTH_PATH))),
            RegistrationStep::Root => Some((MethodMatch::Get, PathMatch::Exact(ROOT_PATH))),
        }
    }
}

impl fmt::Display for RegistrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegistrationStep::CrossOriginPolicy => "cross-origin policy",
            RegistrationStep::PaymentWebhook => "payment webhook",
            RegistrationStep::JsonBodyParser => "JSON body parser",
            RegistrationStep::Auth => "auth delegate",
            RegistrationStep::Users => "user router",
            RegistrationStep::Projects => "project router",
            RegistrationStep::Health => "health check",
            RegistrationStep::Root => "root",
        };
        f.write_str(name)
    }
}
