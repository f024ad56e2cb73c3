//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent construction and invariant violations of the tree and scheme model.
/// They are always fatal to the operation that raised them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node type must not be empty")]
    EmptyNodeType,

    #[error("a 'none' node cannot have fields (got '{field}')")]
    NoneNodeWithFields { field: String },

    #[error("duplicate field '{field}' on node '{node_type}'")]
    DuplicateField { node_type: String, field: String },

    #[error("identifier must not be empty")]
    EmptyIdentifier,

    #[error("alias '{0}' must have at least one value")]
    EmptyAlias(String),

    #[error("alias '{alias}' lists node type '{value}' more than once")]
    DuplicateAliasValue { alias: String, value: String },

    #[error("enum '{0}' must have at least one entry")]
    EmptyEnum(String),

    #[error("enum '{enum_id}' lists value {value} more than once")]
    DuplicateEnumValue { enum_id: String, value: i64 },

    #[error("identifier '{0}' is reserved for a primitive value type")]
    ReservedIdentifier(String),

    #[error("duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    #[error("duplicate node type: {0}")]
    DuplicateNodeType(String),

    #[error("node type '{0}' is reserved")]
    ReservedNodeType(String),

    #[error("root alias '{0}' is not defined")]
    MissingRootAlias(String),

    #[error("alias '{alias}' references undefined node type '{node_type}'")]
    UndefinedAliasValue { alias: String, node_type: String },
}

/// Result type for domain construction.
pub type DomainResult<T> = Result<T, DomainError>;
