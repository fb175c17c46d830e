use syster_integrity::model::{DefinitionKind, Model, TransitionData, UsageKind};
use syster_integrity::validate::{Category, ValidationOptions, validate_model};
use syster_integrity::{ChangeTracker, ModelError, NewElement};

use crate::helpers::diagnostic_helpers::{assert_category, assert_no_errors, categories};
use crate::helpers::model_builders::{machine_def, part, part_def, state};

// ── Helpers ─────────────────────────────────────────────────────────

fn vehicle() -> (Model, ChangeTracker) {
    let mut model = Model::new();
    let mut t = ChangeTracker::new();
    let engine = t.add(
        &mut model,
        NewElement::definition(DefinitionKind::Part).with_name("Engine"),
    );
    let car = t.add(
        &mut model,
        NewElement::definition(DefinitionKind::Part).with_name("Car"),
    );
    let motor = t.add(&mut model, NewElement::usage(UsageKind::Part).with_name("motor"));
    t.set_definition(&mut model, motor, Some(engine)).unwrap();
    t.add_owned_feature(&mut model, car, motor).unwrap();
    (model, t)
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn edit_build_then_validate_dirty() {
    let (model, t) = vehicle();
    assert_eq!(t.created_elements().len(), 3);
    let report = t.validate_dirty(&model, ValidationOptions::default()).unwrap();
    assert_no_errors(&report);
}

#[test]
fn edit_clear_definition_is_rejected() {
    let (mut model, mut t) = vehicle();
    t.clear();
    let motor = model.find_by_name("motor").unwrap().id;
    let engine = model.find_by_name("Engine").unwrap().id;

    assert_eq!(t.set_definition(&mut model, motor, None).unwrap(), Some(engine));
    assert!(t.is_dirty(engine));
    assert!(model.usage_references(engine).is_empty());
    assert_category(
        t.validate_dirty(&model, ValidationOptions::default()),
        Category::UnresolvedDefinition,
    );
}

#[test]
fn edit_rejects_malformed_text() {
    let (mut model, mut t) = vehicle();
    t.clear();
    let motor = model.find_by_name("motor").unwrap().id;

    assert!(matches!(
        t.set_direction(&mut model, motor, "sideways"),
        Err(ModelError::InvalidDirection(_))
    ));
    assert!(matches!(
        t.set_multiplicity(&mut model, motor, "3..1"),
        Err(ModelError::Multiplicity(_))
    ));
    assert!(!t.has_changes());

    assert_eq!(t.set_multiplicity(&mut model, motor, "0..*").unwrap().to_string(), "*");
    assert_eq!(t.dirty_elements(), vec![motor]);
}

#[test]
fn edit_collect_all_reports_each_dirty_element() {
    let (mut model, mut t) = vehicle();
    t.clear();
    let car = model.find_by_name("Car").unwrap().id;
    let motor = model.find_by_name("motor").unwrap().id;

    t.rename(&mut model, car, None).unwrap();
    t.set_abstract(&mut model, motor, true).unwrap();
    t.set_final(&mut model, motor, true).unwrap();

    let report = t
        .validate_dirty(&model, ValidationOptions::collect_all())
        .unwrap();
    assert_eq!(
        categories(&report),
        vec![Category::MissingName, Category::AbstractFinalConflict]
    );
}

#[test]
fn edit_remove_and_forget() {
    let (mut model, mut t) = vehicle();
    let engine = model.find_by_name("Engine").unwrap().id;
    let motor = model.find_by_name("motor").unwrap().id;
    t.clear();

    let removed = t.remove(&mut model, engine).unwrap();
    assert_eq!(removed.name(), Some("Engine"));
    assert!(t.is_removed(engine));
    assert!(!t.is_dirty(engine));
    assert!(t.is_dirty(motor));
    assert!(matches!(
        t.remove(&mut model, engine),
        Err(ModelError::UnknownElement(_))
    ));
}

#[test]
fn edit_state_machine_touches_owner() {
    let mut model = Model::new();
    let m = machine_def(&mut model, "Door");
    let closed = state(&mut model, m, "Closed", true);
    let open = state(&mut model, m, "Open", false);
    let mut t = ChangeTracker::new();

    let swing = t.add(
        &mut model,
        NewElement::usage(UsageKind::Transition(TransitionData::between(closed, open)))
            .with_name("swing")
            .with_abstract(),
    );
    // Not yet part of the machine: only the transition itself is checked.
    assert!(t.validate_dirty(&model, ValidationOptions::default()).unwrap().is_clean());

    t.add_owned_feature(&mut model, m, swing).unwrap();
    assert_no_errors(&t.validate_dirty(&model, ValidationOptions::default()).unwrap());

    t.set_initial(&mut model, open, true).unwrap();
    assert_category(
        t.validate_dirty(&model, ValidationOptions::default()),
        Category::AmbiguousInitialState,
    );
}

#[test]
fn edit_untracked_change_needs_mark() {
    let mut model = Model::new();
    let engine = part_def(&mut model, "Engine");
    let mut t = ChangeTracker::new();
    model.rename(engine, Some("  ")).unwrap();

    assert!(t.validate_dirty(&model, ValidationOptions::default()).unwrap().is_clean());
    t.mark_dirty(engine);
    assert_category(
        t.validate_dirty(&model, ValidationOptions::default()),
        Category::MissingName,
    );
}

#[test]
fn edit_remove_end_rechecks_connection() {
    let mut model = Model::new();
    let engine = part_def(&mut model, "Engine");
    let left = part(&mut model, "left", engine);
    let right = part(&mut model, "right", engine);
    let mount = model.add(
        NewElement::definition(DefinitionKind::connection())
            .with_name("Mount")
            .with_end(left)
            .with_end(right),
    );
    assert_no_errors(&validate_model(&model, ValidationOptions::default()).unwrap());

    let mut t = ChangeTracker::new();
    t.remove(&mut model, right).unwrap();
    assert_eq!(t.dirty_elements(), vec![mount]);

    let dirty = t.validate_dirty(&model, ValidationOptions::default());
    let full = validate_model(&model, ValidationOptions::default());
    assert_category(dirty, Category::DanglingReference);
    assert_category(full, Category::DanglingReference);
}
