use rstest::rstest;
use syster_integrity::model::{DefinitionKind, Model, UsageKind};
use syster_integrity::validate::{Category, ValidationOptions, validate_element, validate_model};
use syster_integrity::{ElementId, NewElement};

use crate::helpers::diagnostic_helpers::{assert_category, assert_no_errors};
use crate::helpers::model_builders::{part, part_def};

fn connection_def_with_ends(model: &mut Model, ends: usize) -> ElementId {
    let engine = part_def(model, "Engine");
    let mut new = NewElement::definition(DefinitionKind::connection()).with_name("Mount");
    for i in 0..ends {
        new = new.with_end(part(model, &format!("end{i}"), engine));
    }
    model.add(new)
}

#[rstest]
#[case(0)]
#[case(1)]
fn test_connection_definition_needs_two_ends(#[case] ends: usize) {
    let mut model = Model::new();
    let mount = connection_def_with_ends(&mut model, ends);
    assert_category(
        validate_element(model.get(mount).unwrap(), Some(&model)),
        Category::MultiplicityViolation,
    );
}

#[test]
fn test_connection_definition_with_two_ends() {
    let mut model = Model::new();
    let mount = connection_def_with_ends(&mut model, 2);
    assert!(validate_element(model.get(mount).unwrap(), Some(&model)).is_ok());
    assert_no_errors(&validate_model(&model, ValidationOptions::default()).unwrap());
}

#[test]
fn test_connection_end_bound_follows_edits() {
    let mut model = Model::new();
    let mount = connection_def_with_ends(&mut model, 1);
    let engine = model.find_by_name("Engine").unwrap().id;
    assert!(validate_element(model.get(mount).unwrap(), Some(&model)).is_err());

    let second = part(&mut model, "end1", engine);
    model.add_end(mount, second).unwrap();
    assert!(validate_element(model.get(mount).unwrap(), Some(&model)).is_ok());
}

#[test]
fn test_removed_end_is_dangling() {
    let mut model = Model::new();
    let mount = connection_def_with_ends(&mut model, 2);
    let end = model.find_by_name("end1").unwrap().id;
    model.remove(end).unwrap();

    let err = validate_element(model.get(mount).unwrap(), Some(&model)).unwrap_err();
    assert_eq!(err.category(), Category::DanglingReference);
    assert_eq!(err.elements(), vec![mount, end]);
}

#[test]
fn test_interface_usage_needs_one_end() {
    let mut model = Model::new();
    let port = model.add(NewElement::definition(DefinitionKind::Port).with_name("Plug"));
    let bus = model.add(NewElement::definition(DefinitionKind::interface()).with_name("Bus"));
    let socket = model.add(
        NewElement::usage(UsageKind::Port)
            .with_name("socket")
            .typed_by(port),
    );
    let usage = model.add(
        NewElement::usage(UsageKind::interface([socket]))
            .with_name("link")
            .typed_by(bus),
    );

    assert!(validate_element(model.get(usage).unwrap(), Some(&model)).is_ok());
    assert_category(
        validate_element(model.get(bus).unwrap(), Some(&model)),
        Category::MultiplicityViolation,
    );
}
