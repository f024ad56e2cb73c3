//! Tests for default instantiation, field completion and node type migration

mod common;

use std::rc::Rc;

use rstest::{fixture, rstest};

use common::{behavior_scheme, move_to, repeat, sequence, wait};
use treescheme::application::{
    change_node_type, duplicate_with_missing_fields, instantiate_default_node, validate,
    ApplicationError, ValidationError,
};
use treescheme::domain::{
    Alias, Field, FieldDefinition, FieldValue, FieldValueType, Node, NodeDefinition, NodeRef,
    Scheme,
};
use treescheme::util::testing;

#[fixture]
fn scheme() -> Scheme {
    testing::init_test_setup();
    behavior_scheme()
}

fn child_of(node: &NodeRef, field: &str) -> NodeRef {
    match node.field(field).map(|f| f.value()) {
        Some(FieldValue::Node(child)) => Rc::clone(child),
        other => panic!("field {} is not a node field: {:?}", field, other),
    }
}

#[test]
fn given_mixed_definition_when_instantiating_then_uses_zero_values() {
    // Arrange
    let alias = Rc::new(Alias::new("Action", vec!["Wait".to_string()]).unwrap());
    let definition = NodeDefinition::create("Sample", None, |d| {
        d.push_field(FieldDefinition::new("s", FieldValueType::String, false))?;
        d.push_field(FieldDefinition::new("n", FieldValueType::Number, false))?;
        d.push_field(FieldDefinition::new("b", FieldValueType::Boolean, false))?;
        d.push_field(FieldDefinition::new("a", FieldValueType::Alias(alias), false))?;
        d.push_field(FieldDefinition::new("ss", FieldValueType::String, true))?;
        Ok(())
    })
    .unwrap();

    // Act
    let node = instantiate_default_node(&definition).unwrap();

    // Assert
    let values: Vec<_> = node.fields().iter().map(|f| f.value().clone()).collect();
    assert_eq!(values[0], FieldValue::String(String::new()));
    assert_eq!(values[1], FieldValue::Number(0.0));
    assert_eq!(values[2], FieldValue::Boolean(false));
    assert!(matches!(&values[3], FieldValue::Node(n) if n.is_none()));
    assert_eq!(values[4], FieldValue::StringArray(vec![]));
}

#[rstest]
fn given_enum_field_when_instantiating_then_uses_first_entry(scheme: Scheme) {
    let node = instantiate_default_node(scheme.get_node("Move").unwrap()).unwrap();

    assert_eq!(node.field("speed").unwrap().value(), &FieldValue::Number(0.0));
    assert_eq!(
        node.field("waypoints").unwrap().value(),
        &FieldValue::NumberArray(vec![])
    );
}

#[rstest]
fn given_sparse_tree_when_duplicating_then_fills_missing_fields(scheme: Scheme) {
    // Arrange
    let sparse_wait = Node::create("Wait", |b| {
        b.push_field(Field::number("seconds", 4.0))?;
        Ok(())
    })
    .unwrap();
    let tree = repeat(2.0, Rc::clone(&sparse_wait));

    // Act
    let full = duplicate_with_missing_fields(&scheme, &tree).unwrap();

    // Assert
    let wait = child_of(&full, "child");
    assert!(!Rc::ptr_eq(&wait, &sparse_wait));
    assert_eq!(wait.fields().len(), 2);
    assert_eq!(wait.field("seconds").unwrap().value(), &FieldValue::Number(4.0));
    assert_eq!(
        wait.field("interruptible").unwrap().value(),
        &FieldValue::Boolean(false)
    );
    assert!(validate(&scheme, &full).is_ok());
}

#[rstest]
fn given_complete_tree_when_duplicating_then_is_structurally_equal(scheme: Scheme) {
    let tree = sequence(vec![move_to("door", 1.0, vec![3.0]), repeat(1.0, wait(2.0))]);

    let copy = duplicate_with_missing_fields(&scheme, &tree).unwrap();

    assert_eq!(copy, tree);
    assert!(!Rc::ptr_eq(&copy, &tree));
}

#[rstest]
fn given_none_child_when_duplicating_then_keeps_it(scheme: Scheme) {
    let tree = repeat(1.0, Node::none());

    let copy = duplicate_with_missing_fields(&scheme, &tree).unwrap();

    assert!(child_of(&copy, "child").is_none());
}

#[rstest]
fn given_invalid_tree_when_duplicating_then_returns_validation_error(scheme: Scheme) {
    let tree = sequence(vec![Node::create("Jump", |_| Ok(())).unwrap()]);

    let err = duplicate_with_missing_fields(&scheme, &tree).unwrap_err();

    assert!(
        matches!(
            err,
            ApplicationError::Validation(ValidationError::InvalidNodeType { .. })
        ),
        "{:?}",
        err
    );
}

#[rstest]
fn given_compatible_fields_when_changing_type_then_reuses_them(scheme: Scheme) {
    // Arrange
    let node = Node::create("Move", |b| {
        b.name("go");
        b.push_field(Field::string("target", "door"))?;
        b.push_field(Field::number("speed", 2.0))?;
        Ok(())
    })
    .unwrap();

    // Act
    let changed = change_node_type(&scheme, &node, "Move").unwrap();

    // Assert
    assert_eq!(changed.name(), Some("go"));
    assert_eq!(
        changed.field("target").unwrap().value(),
        &FieldValue::String("door".to_string())
    );
    assert_eq!(changed.field("speed").unwrap().value(), &FieldValue::Number(2.0));
    assert_eq!(
        changed.field("waypoints").unwrap().value(),
        &FieldValue::NumberArray(vec![])
    );
}

#[rstest]
fn given_incompatible_field_when_changing_type_then_uses_default(scheme: Scheme) {
    // Arrange: `seconds` exists on the old node, but as a string
    let node = Node::create("Sleep", |b| {
        b.push_field(Field::string("seconds", "long"))?;
        b.push_field(Field::boolean("interruptible", true))?;
        Ok(())
    })
    .unwrap();

    // Act
    let changed = change_node_type(&scheme, &node, "Wait").unwrap();

    // Assert
    assert_eq!(changed.node_type(), "Wait");
    assert_eq!(changed.field("seconds").unwrap().value(), &FieldValue::Number(0.0));
    assert_eq!(
        changed.field("interruptible").unwrap().value(),
        &FieldValue::Boolean(true)
    );
}

#[rstest]
fn given_invalid_enum_value_when_changing_type_then_uses_default(scheme: Scheme) {
    let node = move_to("door", 9.0, vec![]);

    let changed = change_node_type(&scheme, &node, "Move").unwrap();

    assert_eq!(changed.field("speed").unwrap().value(), &FieldValue::Number(0.0));
}

#[rstest]
fn given_none_type_when_changing_then_returns_none_node(scheme: Scheme) {
    let changed = change_node_type(&scheme, &wait(1.0), "none").unwrap();

    assert!(changed.is_none());
    assert!(changed.fields().is_empty());
}

#[rstest]
fn given_unknown_type_when_changing_then_errors(scheme: Scheme) {
    let err = change_node_type(&scheme, &wait(1.0), "Jump").unwrap_err();

    assert_eq!(err, ApplicationError::UnknownNodeType("Jump".to_string()));
}

#[rstest]
#[case("Wait")]
#[case("Move")]
#[case("Repeat")]
#[case("Sequence")]
#[case("none")]
fn given_changed_node_when_changing_again_then_is_idempotent(
    scheme: Scheme,
    #[case] new_type: &str,
) {
    let original = move_to("door", 1.0, vec![1.0, 2.0]);

    let once = change_node_type(&scheme, &original, new_type).unwrap();
    let twice = change_node_type(&scheme, &once, new_type).unwrap();

    assert_eq!(once, twice);
}
