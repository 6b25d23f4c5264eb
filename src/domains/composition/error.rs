//! Composition planning errors.

use thiserror::Error;

/// Errors that can occur while building a composition plan.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The requested template does not exist.
    #[error("Unknown template '{name}'. Available: {available}")]
    UnknownTemplate { name: String, available: String },

    /// A plan needs at least one section.
    #[error("Invalid section count: {0}")]
    InvalidSectionCount(usize),

    /// The plan failed validation.
    #[error("Invalid plan: {0}")]
    Invalid(String),
}
