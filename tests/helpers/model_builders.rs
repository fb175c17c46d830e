//! Element constructors used across the integration tests.
//!
//! Every usage built here is either typed by a definition or abstract, and
//! every definition and usage is named, so a graph assembled from these
//! helpers passes the structural rules unless a test breaks one on purpose.

use syster_integrity::model::{
    ActionData, DefinitionKind, Model, NewElement, TransitionData, UsageKind,
};
use syster_integrity::ElementId;

pub fn part_def(model: &mut Model, name: &str) -> ElementId {
    model.add(NewElement::definition(DefinitionKind::Part).with_name(name))
}

pub fn part(model: &mut Model, name: &str, definition: ElementId) -> ElementId {
    model.add(
        NewElement::usage(UsageKind::Part)
            .with_name(name)
            .typed_by(definition),
    )
}

/// A state definition that will own a machine's states and transitions.
pub fn machine_def(model: &mut Model, name: &str) -> ElementId {
    model.add(NewElement::definition(DefinitionKind::State).with_name(name))
}

/// A state owned by `machine`.
pub fn state(model: &mut Model, machine: ElementId, name: &str, initial: bool) -> ElementId {
    let kind = if initial {
        UsageKind::initial_state()
    } else {
        UsageKind::state()
    };
    let id = model.add(NewElement::usage(kind).with_name(name).with_abstract());
    model.add_owned_feature(machine, id).unwrap();
    id
}

/// An abstract transition owned by `machine`.
pub fn transition(
    model: &mut Model,
    machine: ElementId,
    name: &str,
    data: TransitionData,
) -> ElementId {
    let id = model.add(
        NewElement::usage(UsageKind::Transition(data))
            .with_name(name)
            .with_abstract(),
    );
    model.add_owned_feature(machine, id).unwrap();
    id
}

/// An abstract action usage, so it needs no definition.
pub fn action(model: &mut Model, name: &str, data: ActionData) -> ElementId {
    model.add(
        NewElement::usage(UsageKind::Action(data))
            .with_name(name)
            .with_abstract(),
    )
}

pub fn step(model: &mut Model, name: &str) -> ElementId {
    action(model, name, ActionData::default())
}
