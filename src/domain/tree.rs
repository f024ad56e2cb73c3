//! Immutable node/field model and traversal primitives.
//!
//! Nodes are shared through [`NodeRef`] (`Rc<Node>`). Editing never mutates a node; it builds a
//! new one that reuses untouched subtrees by reference. Two nodes may be structurally equal and
//! still be distinct instances; identity is `Rc::ptr_eq`.

use std::fmt;
use std::ops::ControlFlow;
use std::rc::Rc;

use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};

/// Node type used when no type information is available. Never serialized as a type tag.
pub const ANONYMOUS_NODE_TYPE: &str = "anonymous";

/// Sentinel type of the "absent" node. Carries no fields and is never serialized.
pub const NONE_NODE_TYPE: &str = "none";

/// Shared handle to an immutable node.
pub type NodeRef = Rc<Node>;

/// The eight kinds a field can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Node,
    StringArray,
    NumberArray,
    BooleanArray,
    NodeArray,
}

impl FieldKind {
    pub fn is_array(self) -> bool {
        match self {
            FieldKind::String | FieldKind::Number | FieldKind::Boolean | FieldKind::Node => false,
            FieldKind::StringArray
            | FieldKind::NumberArray
            | FieldKind::BooleanArray
            | FieldKind::NodeArray => true,
        }
    }

    /// Kind of a single element: arrays map to their scalar counterpart, scalars to themselves.
    pub fn element_kind(self) -> FieldKind {
        match self {
            FieldKind::String | FieldKind::StringArray => FieldKind::String,
            FieldKind::Number | FieldKind::NumberArray => FieldKind::Number,
            FieldKind::Boolean | FieldKind::BooleanArray => FieldKind::Boolean,
            FieldKind::Node | FieldKind::NodeArray => FieldKind::Node,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Node => "node",
            FieldKind::StringArray => "stringArray",
            FieldKind::NumberArray => "numberArray",
            FieldKind::BooleanArray => "booleanArray",
            FieldKind::NodeArray => "nodeArray",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a field; the variant determines the field's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Node(NodeRef),
    StringArray(Vec<String>),
    NumberArray(Vec<f64>),
    BooleanArray(Vec<bool>),
    NodeArray(Vec<NodeRef>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Number(_) => FieldKind::Number,
            FieldValue::Boolean(_) => FieldKind::Boolean,
            FieldValue::Node(_) => FieldKind::Node,
            FieldValue::StringArray(_) => FieldKind::StringArray,
            FieldValue::NumberArray(_) => FieldKind::NumberArray,
            FieldValue::BooleanArray(_) => FieldKind::BooleanArray,
            FieldValue::NodeArray(_) => FieldKind::NodeArray,
        }
    }

    /// Number of elements for array kinds, `None` for scalar kinds.
    pub fn array_len(&self) -> Option<usize> {
        match self {
            FieldValue::String(_)
            | FieldValue::Number(_)
            | FieldValue::Boolean(_)
            | FieldValue::Node(_) => None,
            FieldValue::StringArray(v) => Some(v.len()),
            FieldValue::NumberArray(v) => Some(v.len()),
            FieldValue::BooleanArray(v) => Some(v.len()),
            FieldValue::NodeArray(v) => Some(v.len()),
        }
    }
}

/// A single element of a field: the whole value of a scalar field or one entry of an array field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldElement {
    String(String),
    Number(f64),
    Boolean(bool),
    Node(NodeRef),
}

impl FieldElement {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldElement::String(_) => FieldKind::String,
            FieldElement::Number(_) => FieldKind::Number,
            FieldElement::Boolean(_) => FieldKind::Boolean,
            FieldElement::Node(_) => FieldKind::Node,
        }
    }
}

/// Named, kind-tagged value attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    value: FieldValue,
}

impl Field {
    pub fn new(name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, FieldValue::String(value.into()))
    }

    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, FieldValue::Number(value))
    }

    pub fn boolean(name: impl Into<String>, value: bool) -> Self {
        Self::new(name, FieldValue::Boolean(value))
    }

    pub fn node(name: impl Into<String>, value: NodeRef) -> Self {
        Self::new(name, FieldValue::Node(value))
    }

    pub fn string_array(name: impl Into<String>, value: Vec<String>) -> Self {
        Self::new(name, FieldValue::StringArray(value))
    }

    pub fn number_array(name: impl Into<String>, value: Vec<f64>) -> Self {
        Self::new(name, FieldValue::NumberArray(value))
    }

    pub fn boolean_array(name: impl Into<String>, value: Vec<bool>) -> Self {
        Self::new(name, FieldValue::BooleanArray(value))
    }

    pub fn node_array(name: impl Into<String>, value: Vec<NodeRef>) -> Self {
        Self::new(name, FieldValue::NodeArray(value))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn kind(&self) -> FieldKind {
        self.value.kind()
    }
}

/// Identifies which field (and which array slot) of a parent leads to a child.
///
/// `offset` is `0` for singular node fields and the array index for node array fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildSlot<'a> {
    pub field_name: &'a str,
    pub offset: usize,
}

/// Immutable typed record with ordered, uniquely named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    node_type: String,
    name: Option<String>,
    fields: Vec<Field>,
}

impl Node {
    /// Build a node through a [`NodeBuilder`].
    ///
    /// # Example
    /// ```
    /// use treescheme::domain::{Field, Node};
    ///
    /// let node = Node::create("Wait", |b| {
    ///     b.push_field(Field::number("seconds", 2.0))?;
    ///     Ok(())
    /// })
    /// .unwrap();
    /// assert_eq!(node.fields().len(), 1);
    /// ```
    pub fn create<F>(node_type: impl Into<String>, build: F) -> DomainResult<NodeRef>
    where
        F: FnOnce(&mut NodeBuilder) -> DomainResult<()>,
    {
        let mut builder = NodeBuilder::new(node_type);
        build(&mut builder)?;
        builder.build()
    }

    /// A fresh `none` instance. Every call yields a distinct node.
    pub fn none() -> NodeRef {
        Rc::new(Node {
            node_type: NONE_NODE_TYPE.to_string(),
            name: None,
            fields: Vec::new(),
        })
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_none(&self) -> bool {
        self.node_type == NONE_NODE_TYPE
    }

    pub fn is_anonymous(&self) -> bool {
        self.node_type == ANONYMOUS_NODE_TYPE
    }

    /// Same type, given name and fields, as a new instance.
    ///
    /// Callers pass field names that are already unique, e.g. fields of an existing node.
    pub(crate) fn rebuild(&self, name: Option<String>, fields: Vec<Field>) -> NodeRef {
        Rc::new(Node {
            node_type: self.node_type.clone(),
            name,
            fields,
        })
    }

    /// Visit every node-holding slot in field-declaration order, then array order, `none`
    /// nodes included.
    ///
    /// Returning [`ControlFlow::Break`] from the visitor stops the iteration.
    pub fn for_each_direct_slot<'a, B, V>(&'a self, mut visitor: V) -> ControlFlow<B>
    where
        V: FnMut(&'a NodeRef, ChildSlot<'a>) -> ControlFlow<B>,
    {
        for field in &self.fields {
            match &field.value {
                FieldValue::Node(child) => {
                    visitor(
                        child,
                        ChildSlot {
                            field_name: &field.name,
                            offset: 0,
                        },
                    )?;
                }
                FieldValue::NodeArray(children) => {
                    for (offset, child) in children.iter().enumerate() {
                        visitor(
                            child,
                            ChildSlot {
                                field_name: &field.name,
                                offset,
                            },
                        )?;
                    }
                }
                FieldValue::String(_)
                | FieldValue::Number(_)
                | FieldValue::Boolean(_)
                | FieldValue::StringArray(_)
                | FieldValue::NumberArray(_)
                | FieldValue::BooleanArray(_) => {}
            }
        }
        ControlFlow::Continue(())
    }

    /// Visit the direct children in field-declaration order, then array order.
    ///
    /// `none` nodes are absent and skipped; array offsets of the remaining elements are kept.
    /// Returning [`ControlFlow::Break`] from the visitor stops the iteration.
    pub fn for_each_direct_child<'a, B, V>(&'a self, mut visitor: V) -> ControlFlow<B>
    where
        V: FnMut(&'a NodeRef, ChildSlot<'a>) -> ControlFlow<B>,
    {
        self.for_each_direct_slot(|child, slot| {
            if child.is_none() {
                ControlFlow::Continue(())
            } else {
                visitor(child, slot)
            }
        })
    }

    pub fn direct_children(&self) -> Vec<NodeRef> {
        let mut children = Vec::new();
        let _ = self.for_each_direct_child(|child, _| {
            children.push(Rc::clone(child));
            ControlFlow::<()>::Continue(())
        });
        children
    }

    pub fn has_children(&self) -> bool {
        self.for_each_direct_child(|_, _| ControlFlow::Break(()))
            .is_break()
    }

    /// All descendants in depth-first pre-order, excluding `self`.
    #[instrument(level = "trace", skip(self), fields(node_type = %self.node_type))]
    pub fn all_children(&self) -> Vec<NodeRef> {
        fn collect(node: &Node, out: &mut Vec<NodeRef>) {
            let _ = node.for_each_direct_child(|child, _| {
                out.push(Rc::clone(child));
                collect(child, out);
                ControlFlow::<()>::Continue(())
            });
        }

        let mut out = Vec::new();
        collect(self, &mut out);
        out
    }

    /// This node plus all its descendants.
    pub fn node_count(&self) -> usize {
        let mut count = 1;
        let _ = self.for_each_direct_child(|child, _| {
            count += child.node_count();
            ControlFlow::<()>::Continue(())
        });
        count
    }
}

/// Accumulates fields (and optionally a name) for a new node.
#[derive(Debug)]
pub struct NodeBuilder {
    node_type: String,
    name: Option<String>,
    fields: Vec<Field>,
}

impl NodeBuilder {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            name: None,
            fields: Vec::new(),
        }
    }

    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn set_name(&mut self, name: Option<String>) -> &mut Self {
        self.name = name;
        self
    }

    /// Append a field; a field with the same name must not exist yet.
    pub fn push_field(&mut self, field: Field) -> DomainResult<&mut Self> {
        if self.fields.iter().any(|f| f.name == field.name) {
            return Err(DomainError::DuplicateField {
                node_type: self.node_type.clone(),
                field: field.name,
            });
        }
        self.fields.push(field);
        Ok(self)
    }

    pub fn build(self) -> DomainResult<NodeRef> {
        if self.node_type.is_empty() {
            return Err(DomainError::EmptyNodeType);
        }
        if self.node_type == NONE_NODE_TYPE {
            if let Some(field) = self.fields.first() {
                return Err(DomainError::NoneNodeWithFields {
                    field: field.name.clone(),
                });
            }
        }
        Ok(Rc::new(Node {
            node_type: self.node_type,
            name: self.name,
            fields: self.fields,
        }))
    }
}

/// Convenience wrapper around [`Node::create`].
pub fn create_node<F>(node_type: impl Into<String>, build: F) -> DomainResult<NodeRef>
where
    F: FnOnce(&mut NodeBuilder) -> DomainResult<()>,
{
    Node::create(node_type, build)
}
