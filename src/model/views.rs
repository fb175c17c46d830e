//! Typed views over state, transition and action elements.
//!
//! Zero-copy borrowed views. Each is constructed from an [`Element`] and
//! exists only when the element carries the matching payload, so code
//! holding a `TransitionView` never has to re-check the variant.

use super::action::{ActionBehavior, ActionData};
use super::element::{Element, ElementData};
use super::usage::{StateData, TransitionData, UsageKind};
use crate::base::{ElementId, IdList};

// ============================================================================
// STATE
// ============================================================================

/// A borrowed view over a state usage.
#[derive(Clone, Copy, Debug)]
pub struct StateView<'m> {
    pub element: &'m Element,
    data: &'m StateData,
}

impl<'m> StateView<'m> {
    /// View an element as a state. None unless it is a state usage.
    pub fn new(element: &'m Element) -> Option<Self> {
        match &element.data {
            ElementData::Usage(u) => match &u.kind {
                UsageKind::State(data) => Some(Self { element, data }),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn id(&self) -> ElementId {
        self.element.id
    }

    pub fn name(&self) -> Option<&'m str> {
        self.element.name()
    }

    pub fn label(&self) -> String {
        self.element.label()
    }

    pub fn is_initial(&self) -> bool {
        self.data.is_initial
    }

    pub fn is_parallel(&self) -> bool {
        self.data.is_parallel
    }

    pub fn data(&self) -> &'m StateData {
        self.data
    }
}

// ============================================================================
// TRANSITION
// ============================================================================

/// A borrowed view over a transition usage.
#[derive(Clone, Copy, Debug)]
pub struct TransitionView<'m> {
    pub element: &'m Element,
    data: &'m TransitionData,
}

impl<'m> TransitionView<'m> {
    /// View an element as a transition. None unless it is a transition usage.
    pub fn new(element: &'m Element) -> Option<Self> {
        match &element.data {
            ElementData::Usage(u) => match &u.kind {
                UsageKind::Transition(data) => Some(Self { element, data }),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn id(&self) -> ElementId {
        self.element.id
    }

    pub fn label(&self) -> String {
        self.element.label()
    }

    pub fn source(&self) -> Option<ElementId> {
        self.data.source
    }

    pub fn target(&self) -> Option<ElementId> {
        self.data.target
    }

    pub fn guard(&self) -> Option<&'m str> {
        self.data.guard.as_deref()
    }

    pub fn trigger(&self) -> Option<&'m str> {
        self.data.trigger.as_deref()
    }

    pub fn effect(&self) -> Option<&'m str> {
        self.data.effect.as_deref()
    }

    pub fn is_else(&self) -> bool {
        self.data.is_else
    }

    /// Taken unconditionally: no guard, no trigger, not else.
    pub fn is_default(&self) -> bool {
        self.data.is_default()
    }

    pub fn priority(&self) -> i32 {
        self.data.priority
    }

    pub fn data(&self) -> &'m TransitionData {
        self.data
    }
}

// ============================================================================
// ACTION
// ============================================================================

/// A borrowed view over an action definition or action usage.
#[derive(Clone, Copy, Debug)]
pub struct ActionView<'m> {
    pub element: &'m Element,
    data: &'m ActionData,
}

impl<'m> ActionView<'m> {
    pub fn new(element: &'m Element) -> Option<Self> {
        element.action().map(|data| Self { element, data })
    }

    pub fn id(&self) -> ElementId {
        self.element.id
    }

    pub fn label(&self) -> String {
        self.element.label()
    }

    pub fn parameters(&self) -> &'m IdList {
        &self.data.parameters
    }

    pub fn body(&self) -> &'m IdList {
        &self.data.body
    }

    pub fn preconditions(&self) -> &'m IdList {
        &self.data.preconditions
    }

    pub fn postconditions(&self) -> &'m IdList {
        &self.data.postconditions
    }

    pub fn successions(&self) -> &'m IdList {
        &self.data.successions
    }

    pub fn behavior(&self) -> &'m ActionBehavior {
        &self.data.behavior
    }

    pub fn data(&self) -> &'m ActionData {
        self.data
    }
}
