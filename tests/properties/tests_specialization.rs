use syster_integrity::model::{DefinitionKind, Model};
use syster_integrity::validate::{Category, validate_element};
use syster_integrity::{ElementId, NewElement};

fn chain(model: &mut Model, len: usize) -> Vec<ElementId> {
    let ids: Vec<ElementId> = (0..len)
        .map(|i| {
            model.add(NewElement::definition(DefinitionKind::Part).with_name(format!("C{i}")))
        })
        .collect();
    for pair in ids.windows(2) {
        model.add_specialization(pair[0], pair[1]).unwrap();
    }
    ids
}

fn is_cyclic(model: &Model, id: ElementId) -> bool {
    validate_element(model.get(id).unwrap(), Some(model))
        .is_err_and(|e| e.category() == Category::CyclicSpecialization)
}

#[test]
fn test_acyclic_chains_never_report_cycles() {
    for len in 1..8 {
        let mut model = Model::new();
        let ids = chain(&mut model, len);
        assert!(ids.iter().all(|id| !is_cyclic(&model, *id)), "chain of {len}");
    }
}

#[test]
fn test_closing_a_chain_reports_every_member() {
    for len in 1..8 {
        let mut model = Model::new();
        let ids = chain(&mut model, len);
        model.add_specialization(ids[len - 1], ids[0]).unwrap();
        assert!(ids.iter().all(|id| is_cyclic(&model, *id)), "cycle of {len}");
    }
}

#[test]
fn test_cycle_reported_from_outside_the_cycle() {
    let mut model = Model::new();
    let ids = chain(&mut model, 4);
    model.add_specialization(ids[3], ids[1]).unwrap();
    assert!(is_cyclic(&model, ids[0]));
    assert!(is_cyclic(&model, ids[1]));
}

#[test]
fn test_self_specialization_without_resolver() {
    let mut model = Model::new();
    let ids = chain(&mut model, 1);
    model.add_specialization(ids[0], ids[0]).unwrap();
    let err = validate_element(model.get(ids[0]).unwrap(), None).unwrap_err();
    assert_eq!(err.category(), Category::CyclicSpecialization);
}
