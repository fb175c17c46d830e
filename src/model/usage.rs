//! Usages: occurrences of definitions within a containing context.

use std::sync::Arc;

use super::action::ActionData;
use super::definition::CaseKind;
use super::element::{ElementKind, FeatureHeader};
use crate::base::{ElementId, IdList};

/// A usage element.
///
/// `definition` is the authoritative Usage → Definition link. It can only be
/// changed through [`Model`](super::Model) so the inverse index of
/// referencing usages stays in step with it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Usage {
    pub feature: FeatureHeader,
    pub(crate) definition: Option<ElementId>,
    pub is_variation: bool,
    /// Usages nested inside this one, in declaration order.
    pub nested: IdList,
    pub kind: UsageKind,
}

impl Usage {
    pub fn new(kind: UsageKind) -> Self {
        Self {
            feature: FeatureHeader::default(),
            definition: None,
            is_variation: false,
            nested: IdList::new(),
            kind,
        }
    }

    /// The definition this usage is typed by.
    pub fn definition(&self) -> Option<ElementId> {
        self.definition
    }
}

/// State payload of a state usage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateData {
    pub is_initial: bool,
    pub is_parallel: bool,
    pub entry: IdList,
    pub do_actions: IdList,
    pub exit: IdList,
}

/// Transition payload of a transition usage.
///
/// Guard, trigger and effect are opaque expression text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionData {
    pub source: Option<ElementId>,
    pub target: Option<ElementId>,
    pub guard: Option<Arc<str>>,
    pub trigger: Option<Arc<str>>,
    pub effect: Option<Arc<str>>,
    pub is_else: bool,
    pub priority: i32,
}

impl TransitionData {
    /// A transition from `source` to `target` with no guard or trigger.
    pub fn between(source: ElementId, target: ElementId) -> Self {
        Self {
            source: Some(source),
            target: Some(target),
            ..Self::default()
        }
    }

    pub fn with_guard(mut self, guard: impl Into<Arc<str>>) -> Self {
        self.guard = Some(guard.into());
        self
    }

    pub fn with_trigger(mut self, trigger: impl Into<Arc<str>>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    pub fn with_effect(mut self, effect: impl Into<Arc<str>>) -> Self {
        self.effect = Some(effect.into());
        self
    }

    pub fn as_else(mut self) -> Self {
        self.is_else = true;
        self
    }

    pub fn has_guard(&self) -> bool {
        has_text(&self.guard)
    }

    pub fn has_trigger(&self) -> bool {
        has_text(&self.trigger)
    }

    /// Neither guarded, triggered nor else: taken unconditionally.
    pub fn is_default(&self) -> bool {
        !self.is_else && !self.has_guard() && !self.has_trigger()
    }

    pub fn is_self_transition(&self) -> bool {
        self.source.is_some() && self.source == self.target
    }
}

pub(crate) fn has_text(text: &Option<Arc<str>>) -> bool {
    text.as_deref().is_some_and(|t| !t.trim().is_empty())
}

/// Metaclass-specific payload of a usage.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UsageKind {
    Part,
    Item,
    Attribute,
    Reference,
    Port,
    Interface {
        ends: IdList,
    },
    Connection {
        ends: IdList,
    },
    Allocation {
        ends: IdList,
    },
    Flow {
        source: Option<ElementId>,
        target: Option<ElementId>,
        item: Option<ElementId>,
    },
    State(StateData),
    Transition(TransitionData),
    Action(ActionData),
    Constraint {
        expression: Option<Arc<str>>,
    },
    Requirement {
        req_id: Option<Arc<str>>,
        text: Option<Arc<str>>,
    },
    Calculation,
    Case(CaseKind),
    View,
    Viewpoint,
    Metadata,
    Rendering,
}

impl UsageKind {
    /// A connection usage over the given ends.
    pub fn connection(ends: impl Into<IdList>) -> Self {
        Self::Connection { ends: ends.into() }
    }

    /// An interface usage over the given ends.
    pub fn interface(ends: impl Into<IdList>) -> Self {
        Self::Interface { ends: ends.into() }
    }

    /// A non-initial state.
    pub fn state() -> Self {
        Self::State(StateData::default())
    }

    /// The initial state of its machine.
    pub fn initial_state() -> Self {
        Self::State(StateData {
            is_initial: true,
            ..StateData::default()
        })
    }

    /// A basic action usage.
    pub fn action() -> Self {
        Self::Action(ActionData::default())
    }

    pub fn element_kind(&self) -> ElementKind {
        match self {
            Self::Part => ElementKind::PartUsage,
            Self::Item => ElementKind::ItemUsage,
            Self::Attribute => ElementKind::AttributeUsage,
            Self::Reference => ElementKind::ReferenceUsage,
            Self::Port => ElementKind::PortUsage,
            Self::Interface { .. } => ElementKind::InterfaceUsage,
            Self::Connection { .. } => ElementKind::ConnectionUsage,
            Self::Allocation { .. } => ElementKind::AllocationUsage,
            Self::Flow { .. } => ElementKind::FlowUsage,
            Self::State(_) => ElementKind::StateUsage,
            Self::Transition(_) => ElementKind::TransitionUsage,
            Self::Action(_) => ElementKind::ActionUsage,
            Self::Constraint { .. } => ElementKind::ConstraintUsage,
            Self::Requirement { .. } => ElementKind::RequirementUsage,
            Self::Calculation => ElementKind::CalculationUsage,
            Self::Case(CaseKind::Case) => ElementKind::CaseUsage,
            Self::Case(CaseKind::Analysis) => ElementKind::AnalysisCaseUsage,
            Self::Case(CaseKind::Verification) => ElementKind::VerificationCaseUsage,
            Self::Case(CaseKind::UseCase) => ElementKind::UseCaseUsage,
            Self::View => ElementKind::ViewUsage,
            Self::Viewpoint => ElementKind::ViewpointUsage,
            Self::Metadata => ElementKind::MetadataUsage,
            Self::Rendering => ElementKind::RenderingUsage,
        }
    }

    pub fn ends(&self) -> Option<&IdList> {
        match self {
            Self::Interface { ends } | Self::Connection { ends } | Self::Allocation { ends } => {
                Some(ends)
            }
            _ => None,
        }
    }

    pub(crate) fn ends_mut(&mut self) -> Option<&mut IdList> {
        match self {
            Self::Interface { ends } | Self::Connection { ends } | Self::Allocation { ends } => {
                Some(ends)
            }
            _ => None,
        }
    }

    pub fn as_state(&self) -> Option<&StateData> {
        match self {
            Self::State(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_transition(&self) -> Option<&TransitionData> {
        match self {
            Self::Transition(t) => Some(t),
            _ => None,
        }
    }
}
