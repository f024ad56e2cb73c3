//! Scheme conformance checks for node trees.
//!
//! Validation starts at the scheme's root alias and recurses through node and node-array
//! fields, switching to the alias of the field definition at each level. The first failure
//! is returned; failures are never aggregated.

use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{
    Alias, Field, FieldDefinition, FieldKind, FieldValue, FieldValueType, Node, Scheme,
};

/// Data validity failure of a tree against a scheme.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error(
        "invalid node type '{node_type}' for alias '{alias}', valid options: {}",
        quote_list(.valid_options)
    )]
    InvalidNodeType {
        node_type: String,
        alias: String,
        valid_options: Vec<String>,
    },

    #[error(
        "unknown field '{field}' on node '{node_type}', valid fields: {}",
        quote_list(.valid_fields)
    )]
    UnknownField {
        node_type: String,
        field: String,
        valid_fields: Vec<String>,
    },

    #[error("field '{field}' on node '{node_type}' should be {expected}, but is {actual}")]
    FieldKindMismatch {
        node_type: String,
        field: String,
        expected: FieldKind,
        actual: FieldKind,
    },

    #[error(
        "value {value} of field '{field}' on node '{node_type}' is not part of enum '{enum_id}', valid values: {}",
        join_values(.valid_values)
    )]
    InvalidEnumValue {
        node_type: String,
        field: String,
        enum_id: String,
        value: f64,
        valid_values: Vec<i64>,
    },
}

fn quote_list(items: &[String]) -> String {
    items.iter().map(|i| format!("'{}'", i)).join(", ")
}

fn join_values(values: &[i64]) -> String {
    values.iter().join(", ")
}

/// Check that `tree` conforms to `scheme`, starting from the root alias.
#[instrument(level = "debug", skip_all, fields(root_alias = scheme.root_alias().identifier()))]
pub fn validate(scheme: &Scheme, tree: &Node) -> Result<(), ValidationError> {
    let result = validate_node(scheme, tree, scheme.root_alias());
    if let Err(e) = &result {
        debug!(error = %e, "validation failed");
    }
    result
}

/// Check a node against an expected alias.
///
/// `none` is never an alias member, so a `none` node fails here; empty child slots are
/// accepted by the field check instead.
pub fn validate_node(scheme: &Scheme, node: &Node, alias: &Alias) -> Result<(), ValidationError> {
    let definition = match scheme.get_node(node.node_type()) {
        Some(definition) if alias.contains(node.node_type()) => definition,
        _ => {
            return Err(ValidationError::InvalidNodeType {
                node_type: node.node_type().to_string(),
                alias: alias.identifier().to_string(),
                valid_options: alias.values().to_vec(),
            })
        }
    };

    for field in node.fields() {
        let field_definition =
            definition
                .field(field.name())
                .ok_or_else(|| ValidationError::UnknownField {
                    node_type: node.node_type().to_string(),
                    field: field.name().to_string(),
                    valid_fields: definition
                        .fields()
                        .iter()
                        .map(|f| f.name().to_string())
                        .collect(),
                })?;
        validate_field(scheme, node.node_type(), field, field_definition)?;
    }
    Ok(())
}

/// Check one field against its definition, recursing into child nodes.
pub fn validate_field(
    scheme: &Scheme,
    node_type: &str,
    field: &Field,
    definition: &FieldDefinition,
) -> Result<(), ValidationError> {
    let expected = definition.kind();
    if field.kind() != expected {
        return Err(ValidationError::FieldKindMismatch {
            node_type: node_type.to_string(),
            field: field.name().to_string(),
            expected,
            actual: field.kind(),
        });
    }

    match field.value() {
        FieldValue::Number(value) => check_enum_value(node_type, field, definition, *value),
        FieldValue::NumberArray(values) => values
            .iter()
            .try_for_each(|v| check_enum_value(node_type, field, definition, *v)),
        FieldValue::Node(child) => check_child(scheme, child, definition),
        FieldValue::NodeArray(children) => children
            .iter()
            .try_for_each(|c| check_child(scheme, c, definition)),
        FieldValue::String(_)
        | FieldValue::Boolean(_)
        | FieldValue::StringArray(_)
        | FieldValue::BooleanArray(_) => Ok(()),
    }
}

fn check_enum_value(
    node_type: &str,
    field: &Field,
    definition: &FieldDefinition,
    value: f64,
) -> Result<(), ValidationError> {
    match definition.value_type() {
        FieldValueType::Enum(enum_def) if !enum_def.contains_value(value) => {
            Err(ValidationError::InvalidEnumValue {
                node_type: node_type.to_string(),
                field: field.name().to_string(),
                enum_id: enum_def.identifier().to_string(),
                value,
                valid_values: enum_def.entries().iter().map(|e| e.value).collect(),
            })
        }
        _ => Ok(()),
    }
}

fn check_child(
    scheme: &Scheme,
    child: &Node,
    definition: &FieldDefinition,
) -> Result<(), ValidationError> {
    if child.is_none() {
        return Ok(());
    }
    match definition.value_type() {
        FieldValueType::Alias(alias) => validate_node(scheme, child, alias),
        // kind already matched, so a node value always has an alias definition
        _ => Ok(()),
    }
}
