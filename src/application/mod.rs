//! Application layer: pure operations over the tree and scheme model
//!
//! Validation, instantiation, structural editing and layout. Nothing here performs I/O.

pub mod error;
pub mod instantiator;
pub mod layout;
pub mod modifications;
pub mod pack;
pub mod path;
pub mod validator;

pub use error::{ApplicationError, ApplicationResult};
pub use instantiator::{
    change_node_type, duplicate_with_missing_fields, instantiate_default_field,
    instantiate_default_node,
};
pub use layout::{node_size, NodeLayout, PositionLookup};
pub use modifications::{
    clone_node, field_with_element, field_with_new_element, field_with_value,
    field_without_element, node_with_field, node_with_name, tree_with_replaced_node,
};
pub use pack::TreePack;
pub use path::{find_path_to_root, get_parent, NodeOutput, PathElement};
pub use validator::{validate, validate_field, validate_node, ValidationError};
