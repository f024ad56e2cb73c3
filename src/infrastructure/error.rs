//! Infrastructure-level errors (wraps application errors)

use thiserror::Error;

use crate::application::{ApplicationError, ValidationError};
use crate::domain::DomainError;

/// Failures converting between text and the tree/scheme model.
///
/// Messages name the offending key and the expected vs actual kind so they can be shown to
/// a user as is.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("invalid JSON ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected an object for {what}, got {actual}")]
    NotAnObject { what: String, actual: String },

    #[error("unsupported value for key '{key}': expected {expected}, got {actual}")]
    UnsupportedValue {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("array '{key}' mixes element kinds: expected {expected}, got {actual}")]
    MixedArray {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("field name '{0}' is reserved")]
    ReservedKey(String),

    #[error("a 'none' node cannot be serialized")]
    NoneNode,

    #[error("number {value} of field '{key}' cannot be represented in JSON")]
    NonFiniteNumber { key: String, value: f64 },

    #[error("field '{field}' on node '{node_type}' has unknown value type '{value_type}'")]
    UnknownValueType {
        node_type: String,
        field: String,
        value_type: String,
    },
}

impl InfraError {
    /// Create a JSON error with context.
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
