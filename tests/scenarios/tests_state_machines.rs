use syster_integrity::NewElement;
use syster_integrity::model::{Model, TransitionData, UsageKind};
use syster_integrity::validate::{
    Category, ConflictKind, StateMachine, ValidationError, ValidationOptions, validate_model,
};

use crate::helpers::diagnostic_helpers::{assert_category, assert_no_errors, names};
use crate::helpers::model_builders::{machine_def, state, transition};

// ============================================================================
// REACHABILITY
// ============================================================================

#[test]
fn test_three_state_machine_passes() {
    let mut model = Model::new();
    let m = machine_def(&mut model, "Engine");
    let initial = state(&mut model, m, "Initial", true);
    let running = state(&mut model, m, "Running", false);
    let fin = state(&mut model, m, "Final", false);
    transition(&mut model, m, "start", TransitionData::between(initial, running));
    transition(&mut model, m, "stop", TransitionData::between(running, fin));

    let machine = StateMachine::from_model(&model, m).unwrap();
    assert!(machine.validate().is_ok());
    assert!(machine.find_unreachable_states().is_empty());

    let report = validate_model(&model, ValidationOptions::default()).unwrap();
    assert_no_errors(&report);
}

#[test]
fn test_removing_last_transition_strands_final() {
    let mut model = Model::new();
    let m = machine_def(&mut model, "Engine");
    let initial = state(&mut model, m, "Initial", true);
    let running = state(&mut model, m, "Running", false);
    let fin = state(&mut model, m, "Final", false);
    transition(&mut model, m, "start", TransitionData::between(initial, running));
    let stop = transition(&mut model, m, "stop", TransitionData::between(running, fin));

    model
        .get_mut(m)
        .unwrap()
        .as_definition_mut()
        .unwrap()
        .owned_features
        .remove(stop);
    model.remove(stop).unwrap();

    let machine = StateMachine::from_model(&model, m).unwrap();
    let unreachable = machine.find_unreachable_states();
    assert_eq!(names(&model, &unreachable), vec!["Final"]);
    assert_category(machine.validate(), Category::UnreachableStates);
    assert_category(
        validate_model(&model, ValidationOptions::default()),
        Category::UnreachableStates,
    );
}

#[test]
fn test_machine_nested_in_state_usage() {
    let mut model = Model::new();
    let outer = model.add(
        NewElement::usage(UsageKind::state())
            .with_name("Operating")
            .with_abstract(),
    );
    let idle = model.add(
        NewElement::usage(UsageKind::initial_state())
            .with_name("Idle")
            .with_abstract(),
    );
    let busy = model.add(
        NewElement::usage(UsageKind::state())
            .with_name("Busy")
            .with_abstract(),
    );
    model.add_nested_usage(outer, idle).unwrap();
    model.add_nested_usage(outer, busy).unwrap();

    let machine = StateMachine::from_model(&model, outer).unwrap();
    assert_eq!(machine.find_unreachable_states(), vec![busy]);
}

// ============================================================================
// GUARD CONFLICTS
// ============================================================================

fn running_to_final(first: TransitionData, second: TransitionData) -> Model {
    let mut model = Model::new();
    let m = machine_def(&mut model, "Engine");
    let initial = state(&mut model, m, "Initial", true);
    let running = state(&mut model, m, "Running", false);
    let fin = state(&mut model, m, "Final", false);
    transition(&mut model, m, "start", TransitionData::between(initial, running));

    let mut first = first;
    first.source = Some(running);
    first.target = Some(fin);
    let mut second = second;
    second.source = Some(running);
    second.target = Some(fin);
    transition(&mut model, m, "first", first);
    transition(&mut model, m, "second", second);
    model
}

fn validate_engine(model: &Model) -> Result<(), ValidationError> {
    let owner = model.find_by_name("Engine").unwrap().id;
    StateMachine::from_model(model, owner).unwrap().validate()
}

#[test]
fn test_two_default_transitions_conflict() {
    let model = running_to_final(TransitionData::default(), TransitionData::default());
    assert_category(validate_engine(&model), Category::DuplicateDefaultTransition);

    let owner = model.find_by_name("Engine").unwrap().id;
    let conflicts = StateMachine::from_model(&model, owner)
        .unwrap()
        .find_guard_conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::DuplicateDefault);
}

#[test]
fn test_one_else_resolves_conflict() {
    let model = running_to_final(TransitionData::default(), TransitionData::default().as_else());
    assert!(validate_engine(&model).is_ok());
}

#[test]
fn test_two_else_transitions_conflict() {
    let model = running_to_final(
        TransitionData::default().as_else(),
        TransitionData::default().as_else(),
    );
    assert_category(validate_engine(&model), Category::DuplicateElseTransition);
}
