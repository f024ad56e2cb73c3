//! Scheme ⇄ JSON conversion.
//!
//! The document shape is deserialized into raw serde structs first, then folded into the
//! domain model through [`SchemeBuilder`] so every domain check applies to parsed schemes too.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::{
    get_pretty_field_value_type, Alias, Enum, EnumEntry, FieldDefinition, FieldValueType,
    NodeDefinitionBuilder, Scheme, SchemeBuilder, SchemeFeatures,
};
use crate::infrastructure::error::{InfraError, InfraResult};

const ARRAY_SUFFIX: &str = "[]";

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScheme {
    pub root_alias: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub feature_node_names: bool,
    #[serde(default)]
    pub aliases: Vec<RawAlias>,
    #[serde(default)]
    pub enums: Vec<RawEnum>,
    #[serde(default)]
    pub nodes: Vec<RawNodeDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAlias {
    pub identifier: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEnum {
    pub identifier: String,
    pub values: Vec<RawEnumEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEnumEntry {
    pub value: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNodeDefinition {
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub fields: Vec<RawFieldDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFieldDefinition {
    pub name: String,
    /// `string`, `number`, `boolean` or an alias/enum identifier, with `[]` for arrays
    pub value_type: String,
}

/// Parse a scheme from JSON text.
#[instrument(level = "debug", skip_all, fields(len = text.len()))]
pub fn parse_scheme(text: &str) -> InfraResult<Scheme> {
    let raw: RawScheme =
        serde_json::from_str(text).map_err(|e| InfraError::json("parse scheme", e))?;
    scheme_from_raw(raw)
}

pub fn parse_scheme_value(value: &Value) -> InfraResult<Scheme> {
    let raw = RawScheme::deserialize(value).map_err(|e| InfraError::json("parse scheme", e))?;
    scheme_from_raw(raw)
}

pub fn scheme_from_raw(raw: RawScheme) -> InfraResult<Scheme> {
    let mut builder = SchemeBuilder::new();
    if raw.feature_node_names {
        builder.set_features(SchemeFeatures::NODE_NAMES);
    }

    for alias in raw.aliases {
        builder.push_alias(Alias::new(alias.identifier, alias.values)?)?;
    }
    for enum_def in raw.enums {
        let entries = enum_def
            .values
            .into_iter()
            .map(|e| EnumEntry::new(e.value, e.name))
            .collect();
        builder.push_enum(Enum::new(enum_def.identifier, entries)?)?;
    }

    // Aliases and enums are all pushed, so field value types can resolve against any of them.
    for node in raw.nodes {
        let mut definition = NodeDefinitionBuilder::new(node.node_type.as_str(), node.comment);
        for field in node.fields {
            let (value_type, is_array) = resolve_value_type(&builder, &field.value_type)
                .ok_or_else(|| InfraError::UnknownValueType {
                    node_type: node.node_type.clone(),
                    field: field.name.clone(),
                    value_type: field.value_type.clone(),
                })?;
            definition.push_field(FieldDefinition::new(field.name, value_type, is_array))?;
        }
        builder.push_node_definition(definition.build()?)?;
    }

    let scheme = builder.build(&raw.root_alias)?;
    debug!(root_alias = %raw.root_alias, "scheme parsed");
    Ok(scheme)
}

fn resolve_value_type(builder: &SchemeBuilder, raw: &str) -> Option<(FieldValueType, bool)> {
    let (identifier, is_array) = match raw.strip_suffix(ARRAY_SUFFIX) {
        Some(identifier) => (identifier, true),
        None => (raw, false),
    };
    let value_type = match identifier {
        "string" => FieldValueType::String,
        "number" => FieldValueType::Number,
        "boolean" => FieldValueType::Boolean,
        _ => {
            if let Some(alias) = builder.get_alias(identifier) {
                FieldValueType::Alias(alias.clone())
            } else {
                FieldValueType::Enum(builder.get_enum(identifier)?.clone())
            }
        }
    };
    Some((value_type, is_array))
}

pub fn scheme_to_raw(scheme: &Scheme) -> RawScheme {
    RawScheme {
        root_alias: scheme.root_alias().identifier().to_string(),
        feature_node_names: scheme.features().contains(SchemeFeatures::NODE_NAMES),
        aliases: scheme
            .aliases()
            .iter()
            .map(|a| RawAlias {
                identifier: a.identifier().to_string(),
                values: a.values().to_vec(),
            })
            .collect(),
        enums: scheme
            .enums()
            .iter()
            .map(|e| RawEnum {
                identifier: e.identifier().to_string(),
                values: e
                    .entries()
                    .iter()
                    .map(|entry| RawEnumEntry {
                        value: entry.value,
                        name: entry.name.clone(),
                    })
                    .collect(),
            })
            .collect(),
        nodes: scheme
            .nodes()
            .iter()
            .map(|n| RawNodeDefinition {
                node_type: n.node_type().to_string(),
                comment: n.comment().map(str::to_string),
                fields: n
                    .fields()
                    .iter()
                    .map(|f| RawFieldDefinition {
                        name: f.name().to_string(),
                        value_type: get_pretty_field_value_type(f.value_type(), f.is_array()),
                    })
                    .collect(),
            })
            .collect(),
    }
}

pub fn compose_scheme(scheme: &Scheme) -> InfraResult<Value> {
    serde_json::to_value(scheme_to_raw(scheme)).map_err(|e| InfraError::json("compose scheme", e))
}

pub fn compose_scheme_text(scheme: &Scheme, pretty: bool) -> InfraResult<String> {
    let raw = scheme_to_raw(scheme);
    let text = if pretty {
        serde_json::to_string_pretty(&raw)
    } else {
        serde_json::to_string(&raw)
    };
    text.map_err(|e| InfraError::json("compose scheme", e))
}
