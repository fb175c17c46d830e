//! The validation failure type.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::codes::Category;
use crate::base::ElementId;
use crate::model::{ElementKind, LoopKind};
use crate::multiplicity::MultiplicityError;

/// Result type for validation.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Ids paired with their display labels, in report order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabeledIds(Vec<(ElementId, String)>);

impl LabeledIds {
    pub fn new(entries: Vec<(ElementId, String)>) -> Self {
        Self(entries)
    }

    pub fn ids(&self) -> Vec<ElementId> {
        self.0.iter().map(|(id, _)| *id).collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.0.iter().map(|(_, label)| label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn joined(&self, separator: &str) -> String {
        self.labels().join(separator)
    }
}

impl FromIterator<(ElementId, String)> for LabeledIds {
    fn from_iter<I: IntoIterator<Item = (ElementId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for LabeledIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined(", "))
    }
}

/// Which end of a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Source,
    Target,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Endpoint::Source => "source",
            Endpoint::Target => "target",
        })
    }
}

/// How an action refers to a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParameterRole {
    Parameter,
    Iterator,
    MappingSource,
    MappingTarget,
}

impl fmt::Display for ParameterRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParameterRole::Parameter => "parameter",
            ParameterRole::Iterator => "loop iterator",
            ParameterRole::MappingSource => "mapping source",
            ParameterRole::MappingTarget => "mapping target",
        })
    }
}

/// A well-formedness rule violation.
///
/// Each variant names the offending element(s) by id and carries the labels
/// its message interpolates.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    // ── Multiplicity ────────────────────────────────────────────────
    #[error("{source}")]
    Multiplicity {
        element: Option<ElementId>,
        #[source]
        source: MultiplicityError,
    },

    // ── Structural ──────────────────────────────────────────────────
    #[error("{kind} {element} has no name")]
    MissingName { element: ElementId, kind: ElementKind },

    #[error("'{label}' cannot be both abstract and final")]
    AbstractFinalConflict { element: ElementId, label: String },

    #[error("portion feature '{label}' must also be composite")]
    PortionNotComposite { element: ElementId, label: String },

    #[error("cyclic specialization: {}", .path.joined(" -> "))]
    CyclicSpecialization { path: LabeledIds },

    #[error("usage '{label}' has no definition and is not abstract")]
    UnresolvedDefinition { element: ElementId, label: String },

    #[error("'{label}' references unknown {role} {target}")]
    DanglingReference {
        element: ElementId,
        label: String,
        role: &'static str,
        target: ElementId,
    },

    #[error("nested usage cycle: {}", .path.joined(" -> "))]
    NestedUsageCycle { path: LabeledIds },

    // ── State machine ───────────────────────────────────────────────
    #[error("transition '{label}' has no {endpoint} state")]
    MissingTransitionEndpoint {
        transition: ElementId,
        label: String,
        endpoint: Endpoint,
    },

    #[error("else transition '{label}' must not have a guard")]
    GuardedElseTransition { transition: ElementId, label: String },

    #[error("self-transition '{label}' needs a trigger or a guard")]
    UntriggeredSelfTransition { transition: ElementId, label: String },

    #[error("state machine '{machine}' has no initial state")]
    MissingInitialState { machine: Arc<str> },

    #[error("state machine '{machine}' has more than one initial state: {states}")]
    AmbiguousInitialState { machine: Arc<str>, states: LabeledIds },

    #[error("transition '{label}' in '{machine}' has unknown {endpoint} state {state}")]
    DanglingTransitionEndpoint {
        machine: Arc<str>,
        transition: ElementId,
        label: String,
        endpoint: Endpoint,
        state: ElementId,
    },

    #[error("state '{state_label}' in '{machine}' has more than one else transition: {transitions}")]
    DuplicateElseTransition {
        machine: Arc<str>,
        state: ElementId,
        state_label: String,
        transitions: LabeledIds,
    },

    #[error(
        "state '{state_label}' in '{machine}' has more than one unguarded, untriggered transition: {transitions}"
    )]
    DuplicateDefaultTransition {
        machine: Arc<str>,
        state: ElementId,
        state_label: String,
        transitions: LabeledIds,
    },

    #[error("state machine '{machine}' has unreachable states: {states}")]
    UnreachableStates { machine: Arc<str>, states: LabeledIds },

    // ── Action hierarchy ────────────────────────────────────────────
    #[error("action '{label}' references unknown {role} {parameter}")]
    DanglingParameter {
        action: ElementId,
        label: String,
        role: ParameterRole,
        parameter: ElementId,
    },

    #[error("action '{label}' has unknown successor {successor}")]
    DanglingSuccessor {
        action: ElementId,
        label: String,
        successor: ElementId,
    },

    #[error("action '{label}' references unknown {role} action {target}")]
    DanglingActionReference {
        action: ElementId,
        label: String,
        role: &'static str,
        target: ElementId,
    },

    #[error("conditional action '{label}' has no branches")]
    MissingBranches { action: ElementId, label: String },

    #[error("conditional action '{label}' has {count} else branches, at most one else branch is allowed")]
    MultipleElseBranches {
        action: ElementId,
        label: String,
        count: usize,
    },

    #[error("branch {branch} of '{label}' has no condition")]
    BranchWithoutCondition {
        action: ElementId,
        label: String,
        branch: usize,
    },

    #[error("branch {branch} of '{label}' has no actions")]
    EmptyBranch {
        action: ElementId,
        label: String,
        branch: usize,
    },

    #[error("{kind} loop '{label}' has no condition")]
    MissingLoopCondition {
        action: ElementId,
        label: String,
        kind: LoopKind,
    },

    #[error("for-count loop '{label}' has no init action")]
    MissingLoopInit { action: ElementId, label: String },

    #[error("for-count loop '{label}' has no update action")]
    MissingLoopUpdate { action: ElementId, label: String },

    #[error("for-each loop '{label}' has no collection")]
    MissingLoopCollection { action: ElementId, label: String },

    #[error("for-each loop '{label}' has no iterator parameter")]
    MissingLoopIterator { action: ElementId, label: String },

    #[error("{kind} loop '{label}' has an empty body")]
    EmptyLoopBody {
        action: ElementId,
        label: String,
        kind: LoopKind,
    },

    #[error("invocation '{label}' has no target action")]
    MissingInvocationTarget { action: ElementId, label: String },
}

impl From<MultiplicityError> for ValidationError {
    fn from(source: MultiplicityError) -> Self {
        Self::Multiplicity {
            element: None,
            source,
        }
    }
}

impl ValidationError {
    /// The stable category of this failure.
    pub fn category(&self) -> Category {
        match self {
            Self::Multiplicity { source, .. } => match source {
                MultiplicityError::Malformed { .. } => Category::MalformedMultiplicity,
                MultiplicityError::Violation { .. } => Category::MultiplicityViolation,
            },
            Self::MissingName { .. } => Category::MissingName,
            Self::AbstractFinalConflict { .. } => Category::AbstractFinalConflict,
            Self::PortionNotComposite { .. } => Category::PortionNotComposite,
            Self::CyclicSpecialization { .. } => Category::CyclicSpecialization,
            Self::UnresolvedDefinition { .. } => Category::UnresolvedDefinition,
            Self::DanglingReference { .. } => Category::DanglingReference,
            Self::NestedUsageCycle { .. } => Category::NestedUsageCycle,
            Self::MissingTransitionEndpoint { .. } => Category::MissingTransitionEndpoint,
            Self::GuardedElseTransition { .. } => Category::GuardedElseTransition,
            Self::UntriggeredSelfTransition { .. } => Category::UntriggeredSelfTransition,
            Self::MissingInitialState { .. } => Category::MissingInitialState,
            Self::AmbiguousInitialState { .. } => Category::AmbiguousInitialState,
            Self::DanglingTransitionEndpoint { .. } => Category::DanglingTransitionEndpoint,
            Self::DuplicateElseTransition { .. } => Category::DuplicateElseTransition,
            Self::DuplicateDefaultTransition { .. } => Category::DuplicateDefaultTransition,
            Self::UnreachableStates { .. } => Category::UnreachableStates,
            Self::DanglingParameter { .. } => Category::DanglingParameter,
            Self::DanglingSuccessor { .. } => Category::DanglingSuccessor,
            Self::DanglingActionReference { .. } => Category::DanglingActionReference,
            Self::MissingBranches { .. } => Category::MissingBranches,
            Self::MultipleElseBranches { .. } => Category::MultipleElseBranches,
            Self::BranchWithoutCondition { .. } => Category::BranchWithoutCondition,
            Self::EmptyBranch { .. } => Category::EmptyBranch,
            Self::MissingLoopCondition { .. } => Category::MissingLoopCondition,
            Self::MissingLoopInit { .. } => Category::MissingLoopInit,
            Self::MissingLoopUpdate { .. } => Category::MissingLoopUpdate,
            Self::MissingLoopCollection { .. } => Category::MissingLoopCollection,
            Self::MissingLoopIterator { .. } => Category::MissingLoopIterator,
            Self::EmptyLoopBody { .. } => Category::EmptyLoopBody,
            Self::MissingInvocationTarget { .. } => Category::MissingInvocationTarget,
        }
    }

    /// The offending element ids, most specific first.
    pub fn elements(&self) -> Vec<ElementId> {
        match self {
            Self::Multiplicity { element, .. } => element.iter().copied().collect(),
            Self::MissingName { element, .. }
            | Self::AbstractFinalConflict { element, .. }
            | Self::PortionNotComposite { element, .. }
            | Self::UnresolvedDefinition { element, .. } => vec![*element],
            Self::DanglingReference {
                element, target, ..
            } => vec![*element, *target],
            Self::CyclicSpecialization { path } | Self::NestedUsageCycle { path } => path.ids(),
            Self::MissingTransitionEndpoint { transition, .. }
            | Self::GuardedElseTransition { transition, .. }
            | Self::UntriggeredSelfTransition { transition, .. } => vec![*transition],
            Self::MissingInitialState { .. } => Vec::new(),
            Self::AmbiguousInitialState { states, .. } | Self::UnreachableStates { states, .. } => {
                states.ids()
            }
            Self::DanglingTransitionEndpoint {
                transition, state, ..
            } => vec![*transition, *state],
            Self::DuplicateElseTransition {
                state, transitions, ..
            }
            | Self::DuplicateDefaultTransition {
                state, transitions, ..
            } => {
                let mut ids = vec![*state];
                ids.extend(transitions.ids());
                ids
            }
            Self::DanglingParameter {
                action, parameter, ..
            } => vec![*action, *parameter],
            Self::DanglingSuccessor {
                action, successor, ..
            } => vec![*action, *successor],
            Self::DanglingActionReference { action, target, .. } => vec![*action, *target],
            Self::MissingBranches { action, .. }
            | Self::MultipleElseBranches { action, .. }
            | Self::BranchWithoutCondition { action, .. }
            | Self::EmptyBranch { action, .. }
            | Self::MissingLoopCondition { action, .. }
            | Self::MissingLoopInit { action, .. }
            | Self::MissingLoopUpdate { action, .. }
            | Self::MissingLoopCollection { action, .. }
            | Self::MissingLoopIterator { action, .. }
            | Self::EmptyLoopBody { action, .. }
            | Self::MissingInvocationTarget { action, .. } => vec![*action],
        }
    }
}
