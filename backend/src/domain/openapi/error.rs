//! Failure taxonomy shared by the pipeline stages.
//!
//! Stage errors convert into [`PipelineError`], which in turn maps onto the
//! transport-agnostic domain [`Error`].

use serde_json::{Value, json};

use super::{DereferenceError, ExtractionError, FlattenError, SynthesisError};
use crate::domain::Error;

/// Pipeline failure, classified by who has to act on it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// The document or synthesis request is malformed or incomplete.
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },
    /// A `$ref` could not be resolved.
    #[error(transparent)]
    Resolution(#[from] DereferenceError),
    /// The document is well formed but declares no paths.
    #[error(transparent)]
    Schema(#[from] ExtractionError),
    /// A stage was driven with input no earlier stage could have produced.
    #[error(transparent)]
    Usage(#[from] FlattenError),
    /// Anything else; the message is logged but never shown to clients.
    #[error("{0}")]
    Unexpected(String),
}

impl PipelineError {
    pub fn validation(message: impl Into<String>, details: Option<Value>) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
}

impl From<SynthesisError> for PipelineError {
    fn from(err: SynthesisError) -> Self {
        let reason = err.to_string();
        match err {
            SynthesisError::Missing { field } | SynthesisError::Empty { field } => {
                Self::validation(
                    "No data provided",
                    Some(json!({ "field": field, "reason": reason })),
                )
            }
            SynthesisError::NotAnObject { .. } | SynthesisError::DepthExceeded { .. } => {
                Self::validation(reason, None)
            }
        }
    }
}

impl From<PipelineError> for Error {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation { message, details } => {
                let error = Error::invalid_request(message);
                match details {
                    Some(details) => error.with_details(details),
                    None => error,
                }
            }
            PipelineError::Resolution(DereferenceError::Cancelled) => {
                Error::cancelled(DereferenceError::Cancelled.to_string())
            }
            PipelineError::Resolution(other) => Error::unresolvable_reference(other.to_string()),
            PipelineError::Schema(other) => Error::empty_schema(other.to_string()),
            PipelineError::Usage(other) => Error::usage(other.to_string()),
            PipelineError::Unexpected(message) => Error::internal(message),
        }
    }
}
