//! Pipeline - the ordered, validated list of registration steps.
//!
//! The order is the contract: the raw-body webhook has to be registered before
//! the JSON body parser, and the origin policy has to see every request first.
//! `Pipeline::new` refuses any ordering that breaks those rules so a reordering
//! fails at startup instead of silently corrupting webhook payloads.

use std::collections::HashSet;

use super::errors::PipelineError;
use super::step::{MethodMatch, RegistrationStep};

/// Ordered registration sequence, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    steps: Vec<RegistrationStep>,
}

impl Pipeline {
    /// The production ordering.
    pub const STANDARD: [RegistrationStep; 8] = [
        RegistrationStep::CrossOriginPolicy,
        RegistrationStep::PaymentWebhook,
        RegistrationStep::JsonBodyParser,
        RegistrationStep::Auth,
        RegistrationStep::Users,
        RegistrationStep::Projects,
        RegistrationStep::Health,
        RegistrationStep::Root,
    ];

    /// Build a pipeline from an explicit ordering.
    ///
    /// # Errors
    ///
    /// - `Empty` - no steps given
    /// - `DuplicateStep` - a step appears twice
    /// - `CrossOriginNotFirst` - the origin policy is present but not first
    /// - `WebhookAfterBodyParser` - the raw-body webhook would sit behind the parser
    pub fn new(steps: Vec<RegistrationStep>) -> Result<Self, PipelineError> {
        if steps.is_empty() {
            return Err(PipelineError::Empty);
        }

        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(*step) {
                return Err(PipelineError::DuplicateStep(*step));
            }
        }

        if let Some(pos) = position(&steps, RegistrationStep::CrossOriginPolicy) {
            if pos != 0 {
                return Err(PipelineError::CrossOriginNotFirst { position: pos });
            }
        }

        if let (Some(webhook), Some(parser)) = (
            position(&steps, RegistrationStep::PaymentWebhook),
            position(&steps, RegistrationStep::JsonBodyParser),
        ) {
            if webhook > parser {
                return Err(PipelineError::WebhookAfterBodyParser);
            }
        }

        Ok(Self { steps })
    }

    /// The production pipeline.
    pub fn standard() -> Self {
        Self {
            steps: Self::STANDARD.to_vec(),
        }
    }

    /// Steps in registration order.
    pub fn steps(&self) -> &[RegistrationStep] {
        &self.steps
    }

    pub fn contains(&self, step: RegistrationStep) -> bool {
        self.steps.contains(&step)
    }

    /// Returns true if `step` is registered after the JSON body parser and so
    /// receives the parser's body limit.
    pub fn is_body_parsed(&self, step: RegistrationStep) -> bool {
        match (
            position(&self.steps, RegistrationStep::JsonBodyParser),
            position(&self.steps, step),
        ) {
            (Some(parser), Some(pos)) => pos > parser,
            _ => false,
        }
    }

    /// First registration whose method and path accept the request.
    ///
    /// This is the routing rule the HTTP layer realises; `None` means the
    /// request falls through to the not-found handler.
    pub fn resolve(&self, method: &http::Method, path: &str) -> Option<RegistrationStep> {
        self.steps.iter().copied().find(|step| match step.route() {
            Some((method_match, path_match)) => {
                method_allows(method_match, method) && path_match.matches(path)
            }
            None => false,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

fn position(steps: &[RegistrationStep], step: RegistrationStep) -> Option<usize> {
    steps.iter().position(|s| *s == step)
}

fn method_allows(expected: MethodMatch, method: &http::Method) -> bool {
    match expected {
        MethodMatch::Any => true,
        // HEAD is answered by GET routes.
        MethodMatch::Get => *method == http::Method::GET || *method == http::Method::HEAD,
        MethodMatch::Post => *method == http::Method::POST,
    }
}
