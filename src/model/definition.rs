//! Definitions: reusable, type-level descriptions of system elements.

use std::sync::Arc;

use super::action::ActionData;
use super::element::{ClassifierHeader, ElementKind};
use crate::base::IdList;

/// Flavour of a case definition or usage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaseKind {
    Case,
    Analysis,
    Verification,
    UseCase,
}

/// A definition element.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Definition {
    pub classifier: ClassifierHeader,
    pub is_variation: bool,
    /// Features owned by this definition, in declaration order.
    pub owned_features: IdList,
    pub kind: DefinitionKind,
}

impl Definition {
    pub fn new(kind: DefinitionKind) -> Self {
        Self {
            classifier: ClassifierHeader::default(),
            is_variation: false,
            owned_features: IdList::new(),
            kind,
        }
    }
}

/// Metaclass-specific payload of a definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefinitionKind {
    Part,
    Item,
    Attribute,
    Enumeration,
    Port,
    Interface { ends: IdList },
    Connection { ends: IdList },
    Allocation { ends: IdList },
    Flow,
    State,
    Action(ActionData),
    Constraint { expression: Option<Arc<str>> },
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

impl DefinitionKind {
    /// An interface definition with no ends yet.
    pub fn interface() -> Self {
        Self::Interface {
            ends: IdList::new(),
        }
    }

    /// A connection definition with no ends yet.
    pub fn connection() -> Self {
        Self::Connection {
            ends: IdList::new(),
        }
    }

    /// An allocation definition with no ends yet.
    pub fn allocation() -> Self {
        Self::Allocation {
            ends: IdList::new(),
        }
    }

    /// A basic action definition.
    pub fn action() -> Self {
        Self::Action(ActionData::default())
    }

    pub fn element_kind(&self) -> ElementKind {
        match self {
            Self::Part => ElementKind::PartDefinition,
            Self::Item => ElementKind::ItemDefinition,
            Self::Attribute => ElementKind::AttributeDefinition,
            Self::Enumeration => ElementKind::EnumerationDefinition,
            Self::Port => ElementKind::PortDefinition,
            Self::Interface { .. } => ElementKind::InterfaceDefinition,
            Self::Connection { .. } => ElementKind::ConnectionDefinition,
            Self::Allocation { .. } => ElementKind::AllocationDefinition,
            Self::Flow => ElementKind::FlowDefinition,
            Self::State => ElementKind::StateDefinition,
            Self::Action(_) => ElementKind::ActionDefinition,
            Self::Constraint { .. } => ElementKind::ConstraintDefinition,
            Self::Requirement { .. } => ElementKind::RequirementDefinition,
            Self::Calculation => ElementKind::CalculationDefinition,
            Self::Case(CaseKind::Case) => ElementKind::CaseDefinition,
            Self::Case(CaseKind::Analysis) => ElementKind::AnalysisCaseDefinition,
            Self::Case(CaseKind::Verification) => ElementKind::VerificationCaseDefinition,
            Self::Case(CaseKind::UseCase) => ElementKind::UseCaseDefinition,
            Self::View => ElementKind::ViewDefinition,
            Self::Viewpoint => ElementKind::ViewpointDefinition,
            Self::Metadata => ElementKind::MetadataDefinition,
            Self::Rendering => ElementKind::RenderingDefinition,
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
}
