//! Pipeline construction errors.

use thiserror::Error;

use super::step::RegistrationStep;

/// Reasons an ordering of registration steps is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Pipeline has no registration steps")]
    Empty,

    #[error("Step registered twice: {0}")]
    DuplicateStep(RegistrationStep),

    #[error("Cross-origin policy must be the first step, found at position {position}")]
    CrossOriginNotFirst { position: usize },

    /// The webhook would receive a body the JSON parser has already consumed.
    #[error("Payment webhook must be registered before the JSON body parser")]
    WebhookAfterBodyParser,
}
