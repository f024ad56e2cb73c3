//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::application::validator::ValidationError;
use crate::domain::{DomainError, FieldKind};

/// Application errors wrap domain errors and add API-usage failures of the operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("target node (type '{node_type}') is not part of the tree")]
    NodeNotInTree { node_type: String },

    #[error("node (type '{node_type}') is not part of the layout")]
    NodeNotInLayout { node_type: String },

    #[error("offset {offset} is out of range for field '{field}' with {len} elements")]
    OffsetOutOfRange {
        field: String,
        offset: usize,
        len: usize,
    },

    #[error("field '{field}' expects {expected}, got {actual}")]
    KindMismatch {
        field: String,
        expected: FieldKind,
        actual: FieldKind,
    },

    #[error("field '{field}' of kind {kind} is not an array")]
    NotAnArray { field: String, kind: FieldKind },

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
