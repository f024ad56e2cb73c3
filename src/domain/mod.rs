//! Domain layer: immutable tree and scheme model
//!
//! This layer is independent of external concerns (no I/O, no config loading).

pub mod error;
pub mod scheme;
pub mod tree;

pub use error::{DomainError, DomainResult};
pub use scheme::{
    create_scheme, get_field_kind, get_pretty_field_value_type, Alias, AliasRef, Enum, EnumEntry,
    EnumRef, FieldDefinition, FieldValueType, NodeDefinition, NodeDefinitionBuilder, Scheme,
    SchemeBuilder, SchemeFeatures, PRIMITIVE_VALUE_TYPES,
};
pub use tree::{
    create_node, ChildSlot, Field, FieldElement, FieldKind, FieldValue, Node, NodeBuilder,
    NodeRef, ANONYMOUS_NODE_TYPE, NONE_NODE_TYPE,
};
