//! Pure structural edits. Every function returns new values; inputs are never touched and
//! unchanged subtrees are shared by reference.

use std::rc::Rc;

use tracing::{debug, instrument};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::path::find_path_to_root;
use crate::domain::{Field, FieldElement, FieldValue, NodeBuilder, NodeRef};

fn kind_mismatch(field: &Field, element: &FieldElement) -> ApplicationError {
    ApplicationError::KindMismatch {
        field: field.name().to_string(),
        expected: field.kind().element_kind(),
        actual: element.kind(),
    }
}

fn replaced<T: Clone>(field: &Field, values: &[T], offset: usize, element: T) -> ApplicationResult<Vec<T>> {
    if offset >= values.len() {
        return Err(ApplicationError::OffsetOutOfRange {
            field: field.name().to_string(),
            offset,
            len: values.len(),
        });
    }
    let mut values = values.to_vec();
    values[offset] = element;
    Ok(values)
}

/// Replace one element of `field`.
///
/// Array fields get the element at `offset` replaced; scalar fields ignore `offset` and take
/// the element as their whole value.
pub fn field_with_element(
    field: &Field,
    element: FieldElement,
    offset: usize,
) -> ApplicationResult<Field> {
    let value = match (field.value(), element) {
        (FieldValue::String(_), FieldElement::String(v)) => FieldValue::String(v),
        (FieldValue::Number(_), FieldElement::Number(v)) => FieldValue::Number(v),
        (FieldValue::Boolean(_), FieldElement::Boolean(v)) => FieldValue::Boolean(v),
        (FieldValue::Node(_), FieldElement::Node(v)) => FieldValue::Node(v),
        (FieldValue::StringArray(values), FieldElement::String(v)) => {
            FieldValue::StringArray(replaced(field, values, offset, v)?)
        }
        (FieldValue::NumberArray(values), FieldElement::Number(v)) => {
            FieldValue::NumberArray(replaced(field, values, offset, v)?)
        }
        (FieldValue::BooleanArray(values), FieldElement::Boolean(v)) => {
            FieldValue::BooleanArray(replaced(field, values, offset, v)?)
        }
        (FieldValue::NodeArray(values), FieldElement::Node(v)) => {
            FieldValue::NodeArray(replaced(field, values, offset, v)?)
        }
        (_, element) => return Err(kind_mismatch(field, &element)),
    };
    Ok(Field::new(field.name(), value))
}

/// Replace the whole value of `field`. The field's kind cannot change.
pub fn field_with_value(field: &Field, value: FieldValue) -> ApplicationResult<Field> {
    if value.kind() != field.kind() {
        return Err(ApplicationError::KindMismatch {
            field: field.name().to_string(),
            expected: field.kind(),
            actual: value.kind(),
        });
    }
    Ok(Field::new(field.name(), value))
}

/// Append an element to an array field.
pub fn field_with_new_element(field: &Field, element: FieldElement) -> ApplicationResult<Field> {
    fn appended<T: Clone>(values: &[T], element: T) -> Vec<T> {
        let mut values = values.to_vec();
        values.push(element);
        values
    }

    let value = match (field.value(), element) {
        (FieldValue::StringArray(values), FieldElement::String(v)) => {
            FieldValue::StringArray(appended(values, v))
        }
        (FieldValue::NumberArray(values), FieldElement::Number(v)) => {
            FieldValue::NumberArray(appended(values, v))
        }
        (FieldValue::BooleanArray(values), FieldElement::Boolean(v)) => {
            FieldValue::BooleanArray(appended(values, v))
        }
        (FieldValue::NodeArray(values), FieldElement::Node(v)) => {
            FieldValue::NodeArray(appended(values, v))
        }
        (
            FieldValue::String(_)
            | FieldValue::Number(_)
            | FieldValue::Boolean(_)
            | FieldValue::Node(_),
            _,
        ) => {
            return Err(ApplicationError::NotAnArray {
                field: field.name().to_string(),
                kind: field.kind(),
            })
        }
        (_, element) => return Err(kind_mismatch(field, &element)),
    };
    Ok(Field::new(field.name(), value))
}

/// Remove the element at `offset` from an array field.
pub fn field_without_element(field: &Field, offset: usize) -> ApplicationResult<Field> {
    fn removed<T: Clone>(field: &Field, values: &[T], offset: usize) -> ApplicationResult<Vec<T>> {
        if offset >= values.len() {
            return Err(ApplicationError::OffsetOutOfRange {
                field: field.name().to_string(),
                offset,
                len: values.len(),
            });
        }
        let mut values = values.to_vec();
        values.remove(offset);
        Ok(values)
    }

    let value = match field.value() {
        FieldValue::StringArray(values) => FieldValue::StringArray(removed(field, values, offset)?),
        FieldValue::NumberArray(values) => FieldValue::NumberArray(removed(field, values, offset)?),
        FieldValue::BooleanArray(values) => {
            FieldValue::BooleanArray(removed(field, values, offset)?)
        }
        FieldValue::NodeArray(values) => FieldValue::NodeArray(removed(field, values, offset)?),
        FieldValue::String(_)
        | FieldValue::Number(_)
        | FieldValue::Boolean(_)
        | FieldValue::Node(_) => {
            return Err(ApplicationError::NotAnArray {
                field: field.name().to_string(),
                kind: field.kind(),
            })
        }
    };
    Ok(Field::new(field.name(), value))
}

/// Rebuild `node` with `new_field` in place of the same-named field, or appended if absent.
pub fn node_with_field(node: &NodeRef, new_field: Field) -> ApplicationResult<NodeRef> {
    let mut builder = NodeBuilder::new(node.node_type());
    builder.set_name(node.name().map(str::to_string));

    let mut pending = Some(new_field);
    for field in node.fields() {
        if pending.as_ref().is_some_and(|f| f.name() == field.name()) {
            if let Some(replacement) = pending.take() {
                builder.push_field(replacement)?;
            }
        } else {
            builder.push_field(field.clone())?;
        }
    }
    if let Some(appended) = pending {
        builder.push_field(appended)?;
    }
    Ok(builder.build()?)
}

/// Rebuild `node` with a different name.
pub fn node_with_name(node: &NodeRef, name: Option<String>) -> NodeRef {
    node.rebuild(name, node.fields().to_vec())
}

/// Deep copy: every node in the subtree becomes a new instance. Scalar data is copied as is.
pub fn clone_node(node: &NodeRef) -> NodeRef {
    let fields = node
        .fields()
        .iter()
        .map(|field| match field.value() {
            FieldValue::Node(child) => Field::node(field.name(), clone_node(child)),
            FieldValue::NodeArray(children) => {
                Field::node_array(field.name(), children.iter().map(clone_node).collect())
            }
            FieldValue::String(_)
            | FieldValue::Number(_)
            | FieldValue::Boolean(_)
            | FieldValue::StringArray(_)
            | FieldValue::NumberArray(_)
            | FieldValue::BooleanArray(_) => field.clone(),
        })
        .collect();
    node.rebuild(node.name().map(str::to_string), fields)
}

/// New root in which `target` is swapped for `replacement`.
///
/// Only the ancestors of `target` are rebuilt; every other subtree is shared with `root`.
#[instrument(level = "debug", skip_all, fields(target_type = target.node_type()))]
pub fn tree_with_replaced_node(
    root: &NodeRef,
    target: &NodeRef,
    replacement: &NodeRef,
) -> ApplicationResult<NodeRef> {
    let path = find_path_to_root(root, target)?;
    debug!(depth = path.len(), "rebuilding ancestors");

    let mut current = Rc::clone(replacement);
    for element in path {
        let field = element
            .node
            .field(&element.output.field_name)
            .ok_or_else(|| ApplicationError::NodeNotInTree {
                node_type: target.node_type().to_string(),
            })?;
        let new_field = field_with_element(field, FieldElement::Node(current), element.output.offset)?;
        current = node_with_field(&element.node, new_field)?;
    }
    Ok(current)
}
