use syster_integrity::model::{Model, TransitionData};
use syster_integrity::validate::{Category, StateMachine};
use syster_integrity::ElementId;

use crate::helpers::diagnostic_helpers::assert_category;
use crate::helpers::model_builders::{machine_def, state, transition};

/// A machine with `n` states where state `i` has an edge to every
/// `edges[i]`. State 0 is initial.
fn build(n: usize, edges: &[(usize, usize)]) -> (Model, ElementId, Vec<ElementId>, Vec<ElementId>) {
    let mut model = Model::new();
    let m = machine_def(&mut model, "M");
    let states: Vec<ElementId> = (0..n)
        .map(|i| state(&mut model, m, &format!("S{i}"), i == 0))
        .collect();
    let transitions = edges
        .iter()
        .enumerate()
        .map(|(k, &(from, to))| {
            transition(
                &mut model,
                m,
                &format!("t{k}"),
                TransitionData::between(states[from], states[to]).with_trigger(format!("e{k}")),
            )
        })
        .collect();
    (model, m, states, transitions)
}

fn shapes() -> Vec<(usize, Vec<(usize, usize)>)> {
    vec![
        (1, vec![]),
        (2, vec![(0, 1)]),
        (4, vec![(0, 1), (1, 2), (2, 3)]),
        (4, vec![(2, 3), (1, 2), (0, 1)]),
        (4, vec![(0, 1), (0, 2), (0, 3)]),
        (5, vec![(3, 4), (0, 1), (1, 0), (1, 2), (2, 3), (4, 0)]),
    ]
}

#[test]
fn test_connected_machines_pass() {
    for (n, edges) in shapes() {
        let (model, m, _, _) = build(n, &edges);
        let machine = StateMachine::from_model(&model, m).unwrap();
        assert!(machine.validate().is_ok(), "{n} states, edges {edges:?}");
    }
}

#[test]
fn test_removing_sole_incoming_edge_strands_target() {
    for (n, edges) in shapes() {
        for (k, &(_, to)) in edges.iter().enumerate() {
            let incoming = edges.iter().filter(|(_, t)| *t == to).count();
            if to == 0 || incoming != 1 {
                continue;
            }
            let (mut model, m, states, transitions) = build(n, &edges);
            model
                .get_mut(m)
                .unwrap()
                .as_definition_mut()
                .unwrap()
                .owned_features
                .remove(transitions[k]);

            let machine = StateMachine::from_model(&model, m).unwrap();
            assert!(
                machine.find_unreachable_states().contains(&states[to]),
                "{n} states, edges {edges:?}, removed t{k}"
            );
            assert_category(machine.validate(), Category::UnreachableStates);
        }
    }
}
