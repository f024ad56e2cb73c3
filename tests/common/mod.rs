//! Shared fixtures: a small behavior-tree scheme and node constructors for it.
#![allow(dead_code)]

use std::rc::Rc;

use treescheme::domain::{
    Alias, Enum, EnumEntry, Field, FieldDefinition, FieldValueType, Node, NodeDefinition,
    NodeRef, Scheme,
};

/// Aliases: `Action` (root). Enum: `Speed`. Nodes: `Sequence`, `Repeat`, `Move`, `Wait`.
pub fn behavior_scheme() -> Scheme {
    Scheme::create("Action", |b| {
        let speed = b.push_enum(Enum::new(
            "Speed",
            vec![
                EnumEntry::new(0, "Slow"),
                EnumEntry::new(1, "Normal"),
                EnumEntry::new(2, "Fast"),
            ],
        )?)?;
        let action = b.push_alias(Alias::new(
            "Action",
            vec![
                "Sequence".to_string(),
                "Repeat".to_string(),
                "Move".to_string(),
                "Wait".to_string(),
            ],
        )?)?;

        b.push_node_definition(NodeDefinition::create(
            "Sequence",
            Some("Runs its children in order".to_string()),
            |d| {
                d.push_field(FieldDefinition::new(
                    "children",
                    FieldValueType::Alias(Rc::clone(&action)),
                    true,
                ))?;
                Ok(())
            },
        )?)?;
        b.push_node_definition(NodeDefinition::create("Repeat", None, |d| {
            d.push_field(FieldDefinition::new("count", FieldValueType::Number, false))?;
            d.push_field(FieldDefinition::new(
                "child",
                FieldValueType::Alias(Rc::clone(&action)),
                false,
            ))?;
            Ok(())
        })?)?;
        b.push_node_definition(NodeDefinition::create("Move", None, |d| {
            d.push_field(FieldDefinition::new("target", FieldValueType::String, false))?;
            d.push_field(FieldDefinition::new(
                "speed",
                FieldValueType::Enum(Rc::clone(&speed)),
                false,
            ))?;
            d.push_field(FieldDefinition::new("waypoints", FieldValueType::Number, true))?;
            Ok(())
        })?)?;
        b.push_node_definition(NodeDefinition::create("Wait", None, |d| {
            d.push_field(FieldDefinition::new("seconds", FieldValueType::Number, false))?;
            d.push_field(FieldDefinition::new(
                "interruptible",
                FieldValueType::Boolean,
                false,
            ))?;
            Ok(())
        })?)?;
        Ok(())
    })
    .expect("behavior scheme")
}

pub fn wait(seconds: f64) -> NodeRef {
    Node::create("Wait", |b| {
        b.push_field(Field::number("seconds", seconds))?;
        b.push_field(Field::boolean("interruptible", false))?;
        Ok(())
    })
    .expect("wait node")
}

pub fn move_to(target: &str, speed: f64, waypoints: Vec<f64>) -> NodeRef {
    Node::create("Move", |b| {
        b.push_field(Field::string("target", target))?;
        b.push_field(Field::number("speed", speed))?;
        b.push_field(Field::number_array("waypoints", waypoints))?;
        Ok(())
    })
    .expect("move node")
}

pub fn repeat(count: f64, child: NodeRef) -> NodeRef {
    Node::create("Repeat", |b| {
        b.push_field(Field::number("count", count))?;
        b.push_field(Field::node("child", child))?;
        Ok(())
    })
    .expect("repeat node")
}

pub fn sequence(children: Vec<NodeRef>) -> NodeRef {
    Node::create("Sequence", |b| {
        b.push_field(Field::node_array("children", children))?;
        Ok(())
    })
    .expect("sequence node")
}
