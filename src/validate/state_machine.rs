//! State machine validation.
//!
//! A machine is a set of states and a list of transitions between them.
//! [`StateMachine::validate`] composes four checks and stops at the first
//! failure:
//!
//! ```text
//! check_initial_state         exactly one initial state
//! check_transition_integrity  every endpoint present and known
//! check_guard_conflicts       ≤1 else and ≤1 default transition per source
//! reachability                every state reachable from the initial one
//! ```
//!
//! The `find_*` operations return complete lists instead of failing.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use super::error::{Endpoint, LabeledIds, Result, ValidationError};
use crate::base::{ElementId, IdList};
use crate::model::{
    DefinitionKind, ElementData, Model, ModelError, StateView, TransitionView, UsageKind,
};

/// Which guard rule a group of transitions breaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConflictKind {
    /// More than one else transition
    DuplicateElse,
    /// More than one transition with no guard, trigger or else
    DuplicateDefault,
}

/// Transitions from one source state that break a guard rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardConflict {
    pub state: ElementId,
    pub kind: ConflictKind,
    /// The conflicting transitions, in input order.
    pub transitions: Vec<ElementId>,
}

/// States and transitions of one machine, with a label for messages.
#[derive(Clone, Debug)]
pub struct StateMachine<'m> {
    pub label: Arc<str>,
    pub states: Vec<StateView<'m>>,
    pub transitions: Vec<TransitionView<'m>>,
}

impl<'m> StateMachine<'m> {
    pub fn new(
        label: impl Into<Arc<str>>,
        states: Vec<StateView<'m>>,
        transitions: Vec<TransitionView<'m>>,
    ) -> Self {
        Self {
            label: label.into(),
            states,
            transitions,
        }
    }

    /// Gather the machine owned by a state definition (its owned features)
    /// or a state usage (its nested usages).
    ///
    /// Children that are neither states nor transitions, or that no longer
    /// exist, are skipped.
    pub fn from_model(model: &'m Model, owner: ElementId) -> std::result::Result<Self, ModelError> {
        let element = model.get(owner).ok_or(ModelError::UnknownElement(owner))?;
        let children: &IdList = match &element.data {
            ElementData::Definition(d) if matches!(d.kind, DefinitionKind::State) => {
                &d.owned_features
            }
            ElementData::Usage(u) if matches!(u.kind, UsageKind::State(_)) => {
                &u.nested
            }
            _ => {
                return Err(ModelError::KindMismatch {
                    element: owner,
                    expected: "state definition or state usage",
                    found: element.kind(),
                });
            }
        };

        let mut states = Vec::new();
        let mut transitions = Vec::new();
        for child in children.iter().filter_map(|id| model.get(id)) {
            if let Some(state) = StateView::new(child) {
                states.push(state);
            } else if let Some(transition) = TransitionView::new(child) {
                transitions.push(transition);
            }
        }
        Ok(Self::new(element.label(), states, transitions))
    }

    fn state_label(&self, id: ElementId) -> String {
        self.states
            .iter()
            .find(|s| s.id() == id)
            .map(StateView::label)
            .unwrap_or_else(|| format!("<unresolved {id}>"))
    }

    fn transition_labels<'t>(&self, ids: impl IntoIterator<Item = &'t ElementId>) -> LabeledIds {
        ids.into_iter()
            .filter_map(|id| self.transitions.iter().find(|t| t.id() == *id))
            .map(|t| (t.id(), t.label()))
            .collect()
    }

    // ── Initial state ───────────────────────────────────────────────

    /// The sole initial state.
    pub fn initial_state(&self) -> Result<StateView<'m>> {
        let initial: Vec<&StateView<'m>> = self.states.iter().filter(|s| s.is_initial()).collect();
        match initial.as_slice() {
            [only] => Ok(**only),
            [] => Err(ValidationError::MissingInitialState {
                machine: self.label.clone(),
            }),
            many => Err(ValidationError::AmbiguousInitialState {
                machine: self.label.clone(),
                states: many.iter().map(|s| (s.id(), s.label())).collect(),
            }),
        }
    }

    pub fn check_initial_state(&self) -> Result<()> {
        self.initial_state().map(|_| ())
    }

    // ── Transition integrity ────────────────────────────────────────

    pub fn check_transition_integrity(&self) -> Result<()> {
        let known: FxHashSet<ElementId> = self.states.iter().map(StateView::id).collect();
        for transition in &self.transitions {
            for (endpoint, state) in [
                (Endpoint::Source, transition.source()),
                (Endpoint::Target, transition.target()),
            ] {
                match state {
                    None => {
                        return Err(ValidationError::MissingTransitionEndpoint {
                            transition: transition.id(),
                            label: transition.label(),
                            endpoint,
                        });
                    }
                    Some(state) if !known.contains(&state) => {
                        return Err(ValidationError::DanglingTransitionEndpoint {
                            machine: self.label.clone(),
                            transition: transition.id(),
                            label: transition.label(),
                            endpoint,
                            state,
                        });
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    // ── Guard conflicts ─────────────────────────────────────────────

    /// Every guard conflict, grouped by source state in order of first
    /// appearance. Within a group the else conflict comes first.
    pub fn find_guard_conflicts(&self) -> Vec<GuardConflict> {
        let mut by_source: IndexMap<ElementId, Vec<&TransitionView<'m>>> = IndexMap::new();
        for transition in &self.transitions {
            if let Some(source) = transition.source() {
                by_source.entry(source).or_default().push(transition);
            }
        }

        let mut conflicts = Vec::new();
        for (state, group) in by_source {
            let elses: Vec<ElementId> = group.iter().filter(|t| t.is_else()).map(|t| t.id()).collect();
            if elses.len() > 1 {
                conflicts.push(GuardConflict {
                    state,
                    kind: ConflictKind::DuplicateElse,
                    transitions: elses,
                });
            }
            let defaults: Vec<ElementId> =
                group.iter().filter(|t| t.is_default()).map(|t| t.id()).collect();
            if defaults.len() > 1 {
                conflicts.push(GuardConflict {
                    state,
                    kind: ConflictKind::DuplicateDefault,
                    transitions: defaults,
                });
            }
        }
        conflicts
    }

    pub fn check_guard_conflicts(&self) -> Result<()> {
        let Some(conflict) = self.find_guard_conflicts().into_iter().next() else {
            return Ok(());
        };
        let machine = self.label.clone();
        let state_label = self.state_label(conflict.state);
        let transitions = self.transition_labels(&conflict.transitions);
        Err(match conflict.kind {
            ConflictKind::DuplicateElse => ValidationError::DuplicateElseTransition {
                machine,
                state: conflict.state,
                state_label,
                transitions,
            },
            ConflictKind::DuplicateDefault => ValidationError::DuplicateDefaultTransition {
                machine,
                state: conflict.state,
                state_label,
                transitions,
            },
        })
    }

    // ── Reachability ────────────────────────────────────────────────

    /// States reachable from the initial states, in state order.
    ///
    /// Transitions are an unordered list, so edges are rescanned until a
    /// pass adds nothing. Every state flagged initial seeds the search.
    pub fn reachable_states(&self) -> Vec<ElementId> {
        let known: FxHashSet<ElementId> = self.states.iter().map(StateView::id).collect();
        let mut reached: FxHashSet<ElementId> = self
            .states
            .iter()
            .filter(|s| s.is_initial())
            .map(StateView::id)
            .collect();

        let mut passes = 0usize;
        loop {
            passes += 1;
            let mut grew = false;
            for transition in &self.transitions {
                let (Some(source), Some(target)) = (transition.source(), transition.target())
                else {
                    continue;
                };
                if reached.contains(&source) && known.contains(&target) && reached.insert(target) {
                    trace!(state = %target, via = %transition.id(), "reached");
                    grew = true;
                }
            }
            if !grew {
                break;
            }
        }
        debug!(machine = %self.label, passes, reached = reached.len(), "reachability fixpoint");

        self.states
            .iter()
            .map(StateView::id)
            .filter(|id| reached.contains(id))
            .collect()
    }

    /// States not reachable from the initial state, in state order.
    /// With no initial state every state is unreachable.
    pub fn find_unreachable_states(&self) -> Vec<ElementId> {
        let reached: FxHashSet<ElementId> = self.reachable_states().into_iter().collect();
        self.states
            .iter()
            .map(StateView::id)
            .filter(|id| !reached.contains(id))
            .collect()
    }

    // ── Entry point ─────────────────────────────────────────────────

    pub fn validate(&self) -> Result<()> {
        debug!(
            machine = %self.label,
            states = self.states.len(),
            transitions = self.transitions.len(),
            "validating state machine"
        );
        self.check_initial_state()?;
        self.check_transition_integrity()?;
        self.check_guard_conflicts()?;

        let unreachable = self.find_unreachable_states();
        if !unreachable.is_empty() {
            let labels: FxHashMap<ElementId, String> =
                self.states.iter().map(|s| (s.id(), s.label())).collect();
            return Err(ValidationError::UnreachableStates {
                machine: self.label.clone(),
                states: unreachable
                    .into_iter()
                    .map(|id| (id, labels.get(&id).cloned().unwrap_or_default()))
                    .collect(),
            });
        }
        Ok(())
    }
}

/// Validate a machine given as separate state and transition lists.
pub fn validate_state_machine<'m>(
    label: &str,
    states: Vec<StateView<'m>>,
    transitions: Vec<TransitionView<'m>>,
) -> Result<()> {
    StateMachine::new(label, states, transitions).validate()
}
