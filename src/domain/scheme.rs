//! Immutable scheme model: aliases, enums and node definitions.
//!
//! A [`Scheme`] can only be obtained from a [`SchemeBuilder`], which enforces identifier
//! uniqueness while pushing and reference integrity when building.

use std::rc::Rc;

use bitflags::bitflags;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tree::{FieldKind, ANONYMOUS_NODE_TYPE, NONE_NODE_TYPE};

bitflags! {
    /// Optional editor features a scheme opts into.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SchemeFeatures: u32 {
        /// Nodes may carry a user-assigned name.
        const NODE_NAMES = 1;
    }
}

impl Default for SchemeFeatures {
    fn default() -> Self {
        Self::empty()
    }
}

/// Identifiers of the primitive value types; aliases and enums cannot take these names.
pub const PRIMITIVE_VALUE_TYPES: [&str; 3] = ["string", "number", "boolean"];

pub type AliasRef = Rc<Alias>;
pub type EnumRef = Rc<Enum>;

/// Named set of node types that may substitute for each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    identifier: String,
    values: Vec<String>,
}

impl Alias {
    /// Values must be non-empty and duplicate-free.
    pub fn new(identifier: impl Into<String>, values: Vec<String>) -> DomainResult<Self> {
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(DomainError::EmptyIdentifier);
        }
        if values.is_empty() {
            return Err(DomainError::EmptyAlias(identifier));
        }
        for (i, value) in values.iter().enumerate() {
            if values[..i].contains(value) {
                return Err(DomainError::DuplicateAliasValue {
                    alias: identifier,
                    value: value.clone(),
                });
            }
        }
        Ok(Self { identifier, values })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.values.iter().any(|v| v == node_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    pub value: i64,
    pub name: String,
}

impl EnumEntry {
    pub fn new(value: i64, name: impl Into<String>) -> Self {
        Self {
            value,
            name: name.into(),
        }
    }
}

/// Named set of integer values with display names. Stored on nodes as a number field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    identifier: String,
    entries: Vec<EnumEntry>,
}

impl Enum {
    /// Entries must be non-empty and duplicate-free by value.
    pub fn new(identifier: impl Into<String>, entries: Vec<EnumEntry>) -> DomainResult<Self> {
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(DomainError::EmptyIdentifier);
        }
        if entries.is_empty() {
            return Err(DomainError::EmptyEnum(identifier));
        }
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.value == entry.value) {
                return Err(DomainError::DuplicateEnumValue {
                    enum_id: identifier,
                    value: entry.value,
                });
            }
        }
        Ok(Self {
            identifier,
            entries,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn entries(&self) -> &[EnumEntry] {
        &self.entries
    }

    /// First entry; enums are never empty.
    pub fn first(&self) -> &EnumEntry {
        &self.entries[0]
    }

    pub fn contains_value(&self, value: f64) -> bool {
        self.entries.iter().any(|e| e.value as f64 == value)
    }
}

/// What a field definition holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValueType {
    String,
    Number,
    Boolean,
    Alias(AliasRef),
    Enum(EnumRef),
}

impl FieldValueType {
    pub fn identifier(&self) -> &str {
        match self {
            FieldValueType::String => "string",
            FieldValueType::Number => "number",
            FieldValueType::Boolean => "boolean",
            FieldValueType::Alias(alias) => alias.identifier(),
            FieldValueType::Enum(enum_def) => enum_def.identifier(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    name: String,
    value_type: FieldValueType,
    is_array: bool,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, value_type: FieldValueType, is_array: bool) -> Self {
        Self {
            name: name.into(),
            value_type,
            is_array,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &FieldValueType {
        &self.value_type
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn kind(&self) -> FieldKind {
        get_field_kind(self)
    }
}

/// Map a field definition to the field kind that satisfies it.
///
/// Alias fields hold nodes, enum fields hold numbers.
pub fn get_field_kind(definition: &FieldDefinition) -> FieldKind {
    match (&definition.value_type, definition.is_array) {
        (FieldValueType::String, false) => FieldKind::String,
        (FieldValueType::String, true) => FieldKind::StringArray,
        (FieldValueType::Number | FieldValueType::Enum(_), false) => FieldKind::Number,
        (FieldValueType::Number | FieldValueType::Enum(_), true) => FieldKind::NumberArray,
        (FieldValueType::Boolean, false) => FieldKind::Boolean,
        (FieldValueType::Boolean, true) => FieldKind::BooleanArray,
        (FieldValueType::Alias(_), false) => FieldKind::Node,
        (FieldValueType::Alias(_), true) => FieldKind::NodeArray,
    }
}

/// Display form of a value type, e.g. `string[]`, `Action` or `Priority[]`.
pub fn get_pretty_field_value_type(value_type: &FieldValueType, is_array: bool) -> String {
    if is_array {
        format!("{}[]", value_type.identifier())
    } else {
        value_type.identifier().to_string()
    }
}

/// A node type with its ordered field definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDefinition {
    node_type: String,
    comment: Option<String>,
    fields: Vec<FieldDefinition>,
}

impl NodeDefinition {
    pub fn create<F>(
        node_type: impl Into<String>,
        comment: Option<String>,
        build: F,
    ) -> DomainResult<Self>
    where
        F: FnOnce(&mut NodeDefinitionBuilder) -> DomainResult<()>,
    {
        let mut builder = NodeDefinitionBuilder::new(node_type, comment);
        build(&mut builder)?;
        builder.build()
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug)]
pub struct NodeDefinitionBuilder {
    node_type: String,
    comment: Option<String>,
    fields: Vec<FieldDefinition>,
}

impl NodeDefinitionBuilder {
    pub fn new(node_type: impl Into<String>, comment: Option<String>) -> Self {
        Self {
            node_type: node_type.into(),
            comment,
            fields: Vec::new(),
        }
    }

    pub fn push_field(&mut self, field: FieldDefinition) -> DomainResult<&mut Self> {
        if self.fields.iter().any(|f| f.name == field.name) {
            return Err(DomainError::DuplicateField {
                node_type: self.node_type.clone(),
                field: field.name,
            });
        }
        self.fields.push(field);
        Ok(self)
    }

    pub fn build(self) -> DomainResult<NodeDefinition> {
        if self.node_type.is_empty() {
            return Err(DomainError::EmptyNodeType);
        }
        Ok(NodeDefinition {
            node_type: self.node_type,
            comment: self.comment,
            fields: self.fields,
        })
    }
}

/// Root alias + aliases + enums + node definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheme {
    root_alias: AliasRef,
    aliases: Vec<AliasRef>,
    enums: Vec<EnumRef>,
    nodes: Vec<NodeDefinition>,
    features: SchemeFeatures,
}

impl Scheme {
    /// Build a scheme; see [`SchemeBuilder`] for the checks applied.
    pub fn create<F>(root_alias: &str, build: F) -> DomainResult<Self>
    where
        F: FnOnce(&mut SchemeBuilder) -> DomainResult<()>,
    {
        let mut builder = SchemeBuilder::new();
        build(&mut builder)?;
        builder.build(root_alias)
    }

    pub fn root_alias(&self) -> &AliasRef {
        &self.root_alias
    }

    pub fn aliases(&self) -> &[AliasRef] {
        &self.aliases
    }

    pub fn enums(&self) -> &[EnumRef] {
        &self.enums
    }

    pub fn nodes(&self) -> &[NodeDefinition] {
        &self.nodes
    }

    pub fn features(&self) -> SchemeFeatures {
        self.features
    }

    pub fn get_alias(&self, identifier: &str) -> Option<&AliasRef> {
        self.aliases.iter().find(|a| a.identifier() == identifier)
    }

    pub fn get_enum(&self, identifier: &str) -> Option<&EnumRef> {
        self.enums.iter().find(|e| e.identifier() == identifier)
    }

    pub fn get_node(&self, node_type: &str) -> Option<&NodeDefinition> {
        self.nodes.iter().find(|n| n.node_type() == node_type)
    }

    pub fn is_alias_member(&self, alias: &Alias, node_type: &str) -> bool {
        alias.contains(node_type) && self.get_node(node_type).is_some()
    }

    /// Node definitions an alias accepts, in alias order.
    pub fn node_definitions_for_alias<'a>(
        &'a self,
        alias: &'a Alias,
    ) -> impl Iterator<Item = &'a NodeDefinition> + 'a {
        alias.values().iter().filter_map(|v| self.get_node(v))
    }
}

/// Incrementally collects scheme parts; identifiers are checked as they are pushed.
#[derive(Debug, Default)]
pub struct SchemeBuilder {
    aliases: Vec<AliasRef>,
    enums: Vec<EnumRef>,
    nodes: Vec<NodeDefinition>,
    features: SchemeFeatures,
}

impl SchemeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_features(&mut self, features: SchemeFeatures) -> &mut Self {
        self.features = features;
        self
    }

    fn is_identifier_taken(&self, identifier: &str) -> bool {
        self.aliases.iter().any(|a| a.identifier() == identifier)
            || self.enums.iter().any(|e| e.identifier() == identifier)
    }

    /// Alias and enum identifiers share one namespace, which excludes the primitive type names.
    pub fn push_alias(&mut self, alias: Alias) -> DomainResult<AliasRef> {
        if PRIMITIVE_VALUE_TYPES.contains(&alias.identifier()) {
            return Err(DomainError::ReservedIdentifier(alias.identifier.clone()));
        }
        if self.is_identifier_taken(alias.identifier()) {
            return Err(DomainError::DuplicateIdentifier(alias.identifier.clone()));
        }
        let alias = Rc::new(alias);
        self.aliases.push(Rc::clone(&alias));
        Ok(alias)
    }

    pub fn push_enum(&mut self, enum_def: Enum) -> DomainResult<EnumRef> {
        if PRIMITIVE_VALUE_TYPES.contains(&enum_def.identifier()) {
            return Err(DomainError::ReservedIdentifier(enum_def.identifier.clone()));
        }
        if self.is_identifier_taken(enum_def.identifier()) {
            return Err(DomainError::DuplicateIdentifier(
                enum_def.identifier.clone(),
            ));
        }
        let enum_def = Rc::new(enum_def);
        self.enums.push(Rc::clone(&enum_def));
        Ok(enum_def)
    }

    pub fn push_node_definition(&mut self, definition: NodeDefinition) -> DomainResult<()> {
        let node_type = definition.node_type();
        if node_type == NONE_NODE_TYPE || node_type == ANONYMOUS_NODE_TYPE {
            return Err(DomainError::ReservedNodeType(node_type.to_string()));
        }
        if self.nodes.iter().any(|n| n.node_type() == node_type) {
            return Err(DomainError::DuplicateNodeType(node_type.to_string()));
        }
        self.nodes.push(definition);
        Ok(())
    }

    pub fn get_alias(&self, identifier: &str) -> Option<&AliasRef> {
        self.aliases.iter().find(|a| a.identifier() == identifier)
    }

    pub fn get_enum(&self, identifier: &str) -> Option<&EnumRef> {
        self.enums.iter().find(|e| e.identifier() == identifier)
    }

    /// Seal the scheme. Fails if the root alias is missing or an alias references an undefined
    /// node type.
    #[instrument(level = "debug", skip(self))]
    pub fn build(self, root_alias: &str) -> DomainResult<Scheme> {
        let root = self
            .get_alias(root_alias)
            .cloned()
            .ok_or_else(|| DomainError::MissingRootAlias(root_alias.to_string()))?;

        for alias in &self.aliases {
            for value in alias.values() {
                if !self.nodes.iter().any(|n| n.node_type() == value) {
                    return Err(DomainError::UndefinedAliasValue {
                        alias: alias.identifier().to_string(),
                        node_type: value.clone(),
                    });
                }
            }
        }

        debug!(
            aliases = self.aliases.len(),
            enums = self.enums.len(),
            nodes = self.nodes.len(),
            "scheme built"
        );
        Ok(Scheme {
            root_alias: root,
            aliases: self.aliases,
            enums: self.enums,
            nodes: self.nodes,
            features: self.features,
        })
    }
}

/// Convenience wrapper around [`Scheme::create`].
pub fn create_scheme<F>(root_alias: &str, build: F) -> DomainResult<Scheme>
where
    F: FnOnce(&mut SchemeBuilder) -> DomainResult<()>,
{
    Scheme::create(root_alias, build)
}
