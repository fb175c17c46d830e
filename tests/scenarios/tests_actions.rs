use syster_integrity::model::{ActionData, Branch, Model};
use syster_integrity::validate::{
    ActionHierarchyValidator, Category, ValidationOptions, validate_action_hierarchy,
    validate_model,
};

use crate::helpers::diagnostic_helpers::{assert_category, assert_no_errors};
use crate::helpers::model_builders::{action, step};

// ============================================================================
// SUCCESSION CYCLES
// ============================================================================

#[test]
fn test_succession_cycle_visits_each_action_once() {
    let mut model = Model::new();
    let a = step(&mut model, "A");
    let b = action(&mut model, "B", ActionData::default().with_succession(a));
    model.get_mut(a).unwrap().action_mut().unwrap().successions.insert(b);

    let mut validator = ActionHierarchyValidator::new(&model);
    validator.validate(&[a]).unwrap();
    assert_eq!(validator.visited(), &[a, b]);

    assert_no_errors(&validate_model(&model, ValidationOptions::default()).unwrap());
}

#[test]
fn test_body_cycle_terminates() {
    let mut model = Model::new();
    let outer = step(&mut model, "outer");
    let inner = action(&mut model, "inner", ActionData::default().with_body(outer));
    model.get_mut(outer).unwrap().action_mut().unwrap().body.insert(inner);

    assert!(validate_action_hierarchy(&[outer, inner], &model).is_ok());
}

// ============================================================================
// CONDITIONAL BRANCHES
// ============================================================================

#[test]
fn test_two_else_branches_fail() {
    let mut model = Model::new();
    let left = step(&mut model, "left");
    let right = step(&mut model, "right");
    let decide = action(
        &mut model,
        "decide",
        ActionData::conditional([Branch::otherwise([left]), Branch::otherwise([right])]),
    );

    let err = validate_action_hierarchy(&[decide], &model).unwrap_err();
    assert_eq!(err.category(), Category::MultipleElseBranches);
    assert!(err.to_string().contains("at most one else branch"));
}

#[test]
fn test_else_and_conditioned_branch_pass() {
    let mut model = Model::new();
    let left = step(&mut model, "left");
    let right = step(&mut model, "right");
    let decide = action(
        &mut model,
        "decide",
        ActionData::conditional([Branch::when("speed > 0", [left]), Branch::otherwise([right])]),
    );

    assert!(validate_action_hierarchy(&[decide], &model).is_ok());
    assert_no_errors(&validate_model(&model, ValidationOptions::default()).unwrap());
}

#[test]
fn test_nested_conditional_reported_through_model_pass() {
    let mut model = Model::new();
    let empty = action(&mut model, "empty", ActionData::conditional(Vec::new()));
    let parent = action(&mut model, "parent", ActionData::default().with_body(empty));
    model.set_owner(empty, Some(parent)).unwrap();

    assert_category(
        validate_model(&model, ValidationOptions::default()),
        Category::MissingBranches,
    );
}
