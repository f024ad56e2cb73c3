//! Tests for JSON conversion of trees, schemes and packs

mod common;

use std::rc::Rc;

use rstest::rstest;
use serde_json::json;

use common::{behavior_scheme, move_to, repeat, sequence, wait};
use treescheme::application::{TreePack, ValidationError};
use treescheme::domain::{DomainError, Field, FieldValue, Node, SchemeFeatures};
use treescheme::infrastructure::{
    compose_json, compose_json_text, compose_pack_text, compose_scheme, parse_json,
    parse_json_value, parse_pack, parse_scheme, parse_scheme_value, InfraError,
};
use treescheme::util::testing;

#[rstest]
#[case(wait(1.5))]
#[case(sequence(vec![move_to("door", 2.0, vec![1.0, 2.5]), repeat(3.0, wait(0.25))]))]
#[case(Node::create("anonymous", |b| {
    b.push_field(Field::string_array("tags", vec!["a".into(), "b".into()]))?;
    b.push_field(Field::boolean_array("flags", vec![true]))?;
    Ok(())
}).unwrap())]
fn given_tree_when_composing_and_parsing_then_round_trips(#[case] tree: treescheme::NodeRef) {
    testing::init_test_setup();

    let text = compose_json_text(&tree, false).unwrap();
    let parsed = parse_json(&text).unwrap();

    assert_eq!(parsed, tree);
}

#[test]
fn given_named_tree_when_composing_then_writes_reserved_keys() {
    // Arrange
    let mut builder = treescheme::domain::NodeBuilder::new("Wait");
    builder.name("pause");
    builder.push_field(Field::number("seconds", 2.0)).unwrap();
    builder.push_field(Field::number("ratio", 0.5)).unwrap();
    let node = builder.build().unwrap();

    // Act
    let value = compose_json(&node).unwrap();

    // Assert
    assert_eq!(
        value,
        json!({ "$type": "Wait", "$name": "pause", "seconds": 2, "ratio": 0.5 })
    );
}

#[test]
fn given_anonymous_node_when_composing_then_omits_type() {
    let node = Node::create("anonymous", |b| {
        b.push_field(Field::string("label", "x"))?;
        Ok(())
    })
    .unwrap();

    assert_eq!(compose_json(&node).unwrap(), json!({ "label": "x" }));
}

#[test]
fn given_object_without_type_when_parsing_then_is_anonymous() {
    let node = parse_json(r#"{ "label": "x" }"#).unwrap();

    assert!(node.is_anonymous());
    assert_eq!(node.fields(), &[Field::string("label", "x")]);
}

#[test]
fn given_none_children_and_empty_arrays_when_composing_then_omits_them() {
    // Arrange
    let kept = wait(1.0);
    let node = Node::create("Sequence", |b| {
        b.push_field(Field::node_array(
            "children",
            vec![Node::none(), Rc::clone(&kept)],
        ))?;
        b.push_field(Field::node("fallback", Node::none()))?;
        b.push_field(Field::number_array("weights", vec![]))?;
        b.push_field(Field::node_array("extras", vec![Node::none()]))?;
        Ok(())
    })
    .unwrap();

    // Act
    let value = compose_json(&node).unwrap();

    // Assert
    assert_eq!(
        value,
        json!({
            "$type": "Sequence",
            "children": [{ "$type": "Wait", "seconds": 1, "interruptible": false }]
        })
    );
}

#[test]
fn given_none_node_when_composing_then_errors() {
    let err = compose_json(&Node::none()).unwrap_err();

    assert!(matches!(err, InfraError::NoneNode), "{:?}", err);
}

#[test]
fn given_empty_array_when_parsing_then_skips_field() {
    let node = parse_json(r#"{ "$type": "Sequence", "children": [] }"#).unwrap();

    assert!(node.fields().is_empty());
}

#[rstest]
#[case(r#"{ "values": [1, "two"] }"#, "values")]
#[case(r#"{ "nested": { "flags": [true, 1] } }"#, "flags")]
fn given_mixed_array_when_parsing_then_names_key_and_kinds(
    #[case] text: &str,
    #[case] key: &str,
) {
    let err = parse_json(text).unwrap_err();

    assert!(matches!(err, InfraError::MixedArray { .. }), "{:?}", err);
    let message = err.to_string();
    assert!(message.contains(key), "{}", message);
}

#[rstest]
#[case(r#"{ "value": null }"#)]
#[case(r#"{ "$type": 3 }"#)]
#[case(r#"{ "$name": false }"#)]
#[case(r#"{ "grid": [null] }"#)]
fn given_unsupported_value_when_parsing_then_errors(#[case] text: &str) {
    let err = parse_json(text).unwrap_err();

    assert!(
        matches!(err, InfraError::UnsupportedValue { .. }),
        "{:?}",
        err
    );
}

#[rstest]
#[case("[1, 2]")]
#[case("{ not json")]
fn given_non_object_or_bad_text_when_parsing_then_errors(#[case] text: &str) {
    assert!(parse_json(text).is_err());
}

#[test]
fn given_parsed_nested_value_when_reading_fields_then_infers_kinds() {
    let node = parse_json_value(&json!({
        "$type": "Repeat",
        "count": 3,
        "child": { "$type": "Wait", "seconds": 1.5 }
    }))
    .unwrap();

    assert_eq!(node.field("count").unwrap().value(), &FieldValue::Number(3.0));
    match node.field("child").unwrap().value() {
        FieldValue::Node(child) => assert_eq!(child.node_type(), "Wait"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn given_scheme_when_composing_then_uses_identifier_value_types() {
    let scheme = behavior_scheme();

    let value = compose_scheme(&scheme).unwrap();

    assert_eq!(value["rootAlias"], json!("Action"));
    assert_eq!(
        value["nodes"][0],
        json!({
            "nodeType": "Sequence",
            "comment": "Runs its children in order",
            "fields": [{ "name": "children", "valueType": "Action[]" }]
        })
    );
    assert_eq!(
        value["enums"][0]["values"][2],
        json!({ "value": 2, "name": "Fast" })
    );
    assert!(value.get("featureNodeNames").is_none());
}

#[test]
fn given_scheme_when_composing_and_parsing_then_round_trips() {
    let scheme = behavior_scheme();

    let parsed = parse_scheme_value(&compose_scheme(&scheme).unwrap()).unwrap();

    assert_eq!(parsed, scheme);
}

#[test]
fn given_scheme_text_with_feature_flag_when_parsing_then_enables_names() {
    let text = r#"{
        "rootAlias": "Root",
        "featureNodeNames": true,
        "aliases": [{ "identifier": "Root", "values": ["Leaf"] }],
        "nodes": [{ "nodeType": "Leaf", "fields": [{ "name": "tags", "valueType": "string[]" }] }]
    }"#;

    let scheme = parse_scheme(text).unwrap();

    assert!(scheme.features().contains(SchemeFeatures::NODE_NAMES));
    let field = scheme.get_node("Leaf").unwrap().field("tags").unwrap();
    assert!(field.is_array());
}

#[test]
fn given_unknown_value_type_when_parsing_scheme_then_errors() {
    let text = r#"{
        "rootAlias": "Root",
        "aliases": [{ "identifier": "Root", "values": ["Leaf"] }],
        "nodes": [{ "nodeType": "Leaf", "fields": [{ "name": "next", "valueType": "Missing" }] }]
    }"#;

    let err = parse_scheme(text).unwrap_err();

    assert!(
        matches!(err, InfraError::UnknownValueType { ref value_type, .. } if value_type == "Missing"),
        "{:?}",
        err
    );
}

#[test]
fn given_duplicate_identifier_when_parsing_scheme_then_reports_domain_error() {
    let text = r#"{
        "rootAlias": "Root",
        "aliases": [{ "identifier": "Root", "values": ["Leaf"] }],
        "enums": [{ "identifier": "Root", "values": [{ "value": 1, "name": "One" }] }],
        "nodes": [{ "nodeType": "Leaf" }]
    }"#;

    let err = parse_scheme(text).unwrap_err();

    assert!(
        matches!(err, InfraError::Domain(DomainError::DuplicateIdentifier(ref id)) if id == "Root"),
        "{:?}",
        err
    );
}

#[test]
fn given_alias_named_like_primitive_when_parsing_scheme_then_rejects_it() {
    let text = r#"{
        "rootAlias": "Root",
        "aliases": [
            { "identifier": "Root", "values": ["Leaf"] },
            { "identifier": "string", "values": ["Leaf"] }
        ],
        "nodes": [{ "nodeType": "Leaf", "fields": [{ "name": "label", "valueType": "string" }] }]
    }"#;

    let err = parse_scheme(text).unwrap_err();

    assert!(
        matches!(err, InfraError::Domain(DomainError::ReservedIdentifier(ref id)) if id == "string"),
        "{:?}",
        err
    );
}

#[test]
fn given_valid_pack_when_composing_and_parsing_then_round_trips() {
    // Arrange
    let tree = sequence(vec![move_to("door", 1.0, vec![4.0]), repeat(2.0, wait(1.0))]);
    let pack = TreePack::new(behavior_scheme(), tree).unwrap();

    // Act
    let text = compose_pack_text(&pack, true).unwrap();
    let parsed = parse_pack(&text).unwrap();

    // Assert
    assert_eq!(parsed, pack);
}

#[test]
fn given_pack_with_invalid_tree_when_parsing_then_returns_validation_error() {
    let scheme = compose_scheme(&behavior_scheme()).unwrap();
    let text = json!({ "scheme": scheme, "tree": { "$type": "Jump" } }).to_string();

    let err = parse_pack(&text).unwrap_err();

    assert!(
        matches!(
            err,
            InfraError::Validation(ValidationError::InvalidNodeType { .. })
        ),
        "{:?}",
        err
    );
}
