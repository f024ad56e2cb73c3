//! Scheme-conformant default data and node type migration.

use std::rc::Rc;

use tracing::{debug, instrument, trace};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::validator::{validate, validate_field};
use crate::domain::{
    Field, FieldDefinition, FieldValue, FieldValueType, Node, NodeBuilder, NodeDefinition,
    NodeRef, Scheme,
};

/// Zero value for a field definition.
///
/// Singular alias fields get a `none` node; singular enum fields get the first entry's value.
pub fn instantiate_default_field(definition: &FieldDefinition) -> Field {
    let value = match (definition.value_type(), definition.is_array()) {
        (FieldValueType::String, false) => FieldValue::String(String::new()),
        (FieldValueType::String, true) => FieldValue::StringArray(Vec::new()),
        (FieldValueType::Number, false) => FieldValue::Number(0.0),
        (FieldValueType::Number | FieldValueType::Enum(_), true) => {
            FieldValue::NumberArray(Vec::new())
        }
        (FieldValueType::Boolean, false) => FieldValue::Boolean(false),
        (FieldValueType::Boolean, true) => FieldValue::BooleanArray(Vec::new()),
        (FieldValueType::Alias(_), false) => FieldValue::Node(Node::none()),
        (FieldValueType::Alias(_), true) => FieldValue::NodeArray(Vec::new()),
        (FieldValueType::Enum(enum_def), false) => FieldValue::Number(enum_def.first().value as f64),
    };
    Field::new(definition.name(), value)
}

/// A node of the definition's type with every declared field set to its default.
pub fn instantiate_default_node(definition: &NodeDefinition) -> ApplicationResult<NodeRef> {
    let mut builder = NodeBuilder::new(definition.node_type());
    for field_definition in definition.fields() {
        builder.push_field(instantiate_default_field(field_definition))?;
    }
    Ok(builder.build()?)
}

/// Rebuild `tree` so every node has exactly the fields its definition declares.
///
/// Existing fields are kept (node fields are rebuilt recursively), missing fields get their
/// default and undeclared fields are dropped. `none` nodes are left untouched.
#[instrument(level = "debug", skip_all, fields(root_type = tree.node_type()))]
pub fn duplicate_with_missing_fields(scheme: &Scheme, tree: &NodeRef) -> ApplicationResult<NodeRef> {
    validate(scheme, tree)?;
    duplicate_node(scheme, tree)
}

fn duplicate_node(scheme: &Scheme, node: &NodeRef) -> ApplicationResult<NodeRef> {
    if node.is_none() {
        return Ok(Rc::clone(node));
    }
    let definition = scheme
        .get_node(node.node_type())
        .ok_or_else(|| ApplicationError::UnknownNodeType(node.node_type().to_string()))?;

    let mut builder = NodeBuilder::new(node.node_type());
    builder.set_name(node.name().map(str::to_string));
    for field_definition in definition.fields() {
        let field = match node.field(field_definition.name()) {
            Some(existing) => duplicate_field(scheme, existing)?,
            None => {
                trace!(
                    node_type = node.node_type(),
                    field = field_definition.name(),
                    "filling missing field"
                );
                instantiate_default_field(field_definition)
            }
        };
        builder.push_field(field)?;
    }
    Ok(builder.build()?)
}

fn duplicate_field(scheme: &Scheme, field: &Field) -> ApplicationResult<Field> {
    let value = match field.value() {
        FieldValue::Node(child) => FieldValue::Node(duplicate_node(scheme, child)?),
        FieldValue::NodeArray(children) => FieldValue::NodeArray(
            children
                .iter()
                .map(|c| duplicate_node(scheme, c))
                .collect::<ApplicationResult<Vec<_>>>()?,
        ),
        FieldValue::String(_)
        | FieldValue::Number(_)
        | FieldValue::Boolean(_)
        | FieldValue::StringArray(_)
        | FieldValue::NumberArray(_)
        | FieldValue::BooleanArray(_) => return Ok(field.clone()),
    };
    Ok(Field::new(field.name(), value))
}

/// Swap a node to `new_type`, keeping every old field that still validates against the new
/// type's definition of the same name. Other fields fall back to their default.
///
/// Changing to `none` yields a fresh `none` node. The node's name is carried over.
#[instrument(level = "debug", skip(scheme, node), fields(old_type = node.node_type()))]
pub fn change_node_type(
    scheme: &Scheme,
    node: &Node,
    new_type: &str,
) -> ApplicationResult<NodeRef> {
    if new_type == crate::domain::NONE_NODE_TYPE {
        return Ok(Node::none());
    }
    let definition = scheme
        .get_node(new_type)
        .ok_or_else(|| ApplicationError::UnknownNodeType(new_type.to_string()))?;

    let mut builder = NodeBuilder::new(new_type);
    builder.set_name(node.name().map(str::to_string));
    let mut reused = 0;
    for field_definition in definition.fields() {
        let field = match node.field(field_definition.name()) {
            Some(old) if validate_field(scheme, new_type, old, field_definition).is_ok() => {
                reused += 1;
                old.clone()
            }
            _ => instantiate_default_field(field_definition),
        };
        builder.push_field(field)?;
    }
    debug!(reused, total = definition.fields().len(), "node type changed");
    Ok(builder.build()?)
}
