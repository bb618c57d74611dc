//! Request dispatch domain module.
//!
//! Describes which registrations exist, the order they are installed in, and
//! the first-match rule used to pick a handler.
//!
//! # Module Structure
//!
//! - `step` - `RegistrationStep` and its method/path registration
//! - `pipeline` - validated ordering of steps
//! - `errors` - ordering violations

mod errors;
mod pipeline;
mod step;

pub use errors::PipelineError;
pub use pipeline::Pipeline;
pub use step::{
    MethodMatch, PathMatch, RegistrationStep, AUTH_PREFIX, HEALTH_PATH, PAYMENT_WEBHOOK_PATH,
    PROJECTS_PREFIX, ROOT_PATH, USERS_PREFIX,
};
