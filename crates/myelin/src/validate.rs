//! The validation seam: structural constraints on decoded request values

use myelin_core::{RequestContext, StatusError};
use thiserror::Error;

/// Structural validation capability for decoded request types
///
/// The provided default accepts everything, so constraint-free types opt in
/// with an empty impl. Types with constraints collect every violation, not
/// just the first:
///
/// ```
/// use myelin::{Validate, Violations};
/// use myelin_core::RequestContext;
///
/// struct CreateOrder {
///     sku: String,
///     quantity: u32,
/// }
///
/// impl Validate for CreateOrder {
///     fn validate(&self, _cx: &RequestContext) -> Result<(), Violations> {
///         let mut violations = Violations::new();
///         if self.sku.is_empty() {
///             violations.add("sku", "must not be empty");
///         }
///         if self.quantity == 0 {
///             violations.add("quantity", "must be at least 1");
///         }
///         violations.finish()
///     }
/// }
/// ```
pub trait Validate {
    /// Check the value's declared constraints
    fn validate(&self, _cx: &RequestContext) -> Result<(), Violations> {
        Ok(())
    }
}

/// Aggregate validation failure listing every failed constraint
#[derive(Debug, Default, Error)]
#[error("{}", summarize(.violations))]
pub struct Violations {
    violations: Vec<Violation>,
}

/// A single failed constraint on a named field
#[derive(Debug)]
struct Violation {
    field: String,
    message: String,
}

impl Violations {
    /// Start an empty violation list
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed constraint on `field`
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Whether no constraint failed
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of failed constraints
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// `Ok` when nothing was recorded, otherwise the collected violations
    pub fn finish(self) -> Result<(), Self> {
        if self.violations.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("{}: {}", violation.field, violation.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// The swappable validation strategy
///
/// Sits between decode and the business handler; any failure it returns
/// short-circuits the request into error rendering. The default runs the
/// value's own [`Validate`] capability; replace it through
/// [`PipelineBuilder::validator`](crate::PipelineBuilder::validator) to add
/// cross-cutting checks or plug in another engine.
pub trait Validator: Send + Sync {
    /// Check a decoded value, classifying failure as a status error
    fn validate(&self, cx: &RequestContext, value: &dyn Validate) -> Result<(), StatusError>;
}

/// Validator that runs the value's own constraints
///
/// Failures become 422 Unprocessable Entity with the violation list as the
/// internal cause, so the client sees the reason phrase and the log record
/// keeps the detail.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValidator;

impl Validator for DefaultValidator {
    fn validate(&self, cx: &RequestContext, value: &dyn Validate) -> Result<(), StatusError> {
        value
            .validate(cx)
            .map_err(|violations| StatusError::UNPROCESSABLE_ENTITY.with_internal(violations))
    }
}
