//! Element headers and the closed set of element variants.
//!
//! The KerML/SysML hierarchy (Element → Classifier → Feature → Definition /
//! Usage → dozens of metaclasses) is flattened into one tagged variant per
//! hierarchy level. Shared fields live in embedded headers:
//!
//! ```text
//! Element
//! ├── id, uuid, name, owner, documentation
//! └── data: ElementData
//!     ├── Package     { members }
//!     ├── Classifier  (ClassifierHeader)
//!     ├── Feature     (FeatureHeader ⊃ ClassifierHeader)
//!     ├── Definition  { ClassifierHeader, owned_features, kind }
//!     └── Usage       { FeatureHeader, definition, nested, kind }
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use uuid::Uuid;

use super::action::ActionData;
use super::definition::{Definition, DefinitionKind};
use super::error::InvalidDirection;
use super::usage::{Usage, UsageKind};
use crate::base::{ElementId, IdList};
use crate::multiplicity::{Multiplicity, bounds};

// ============================================================================
// HEADERS
// ============================================================================

/// Fields shared by every classifier-like element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassifierHeader {
    /// General classifiers this one specializes.
    pub specializations: IdList,
    pub is_abstract: bool,
    pub is_final: bool,
}

/// Flow direction of a feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    In,
    Out,
    InOut,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::InOut => "inout",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = InvalidDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            "inout" => Ok(Direction::InOut),
            other => Err(InvalidDirection(other.to_string())),
        }
    }
}

/// Fields shared by every feature-like element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureHeader {
    pub classifier: ClassifierHeader,
    pub direction: Option<Direction>,
    pub is_composite: bool,
    /// A portion is a time slice or snapshot; it must also be composite.
    pub is_portion: bool,
    pub multiplicity: Option<Multiplicity>,
}

/// A namespace grouping other elements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Package {
    pub members: IdList,
}

// ============================================================================
// ELEMENT DATA
// ============================================================================

/// Kind-specific payload of an element.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementData {
    Package(Package),
    Classifier(ClassifierHeader),
    Feature(FeatureHeader),
    Definition(Definition),
    Usage(Usage),
}

impl From<Package> for ElementData {
    fn from(p: Package) -> Self {
        Self::Package(p)
    }
}

impl From<Definition> for ElementData {
    fn from(d: Definition) -> Self {
        Self::Definition(d)
    }
}

impl From<Usage> for ElementData {
    fn from(u: Usage) -> Self {
        Self::Usage(u)
    }
}

/// A relationship list with a declared cardinality bound.
#[derive(Clone, Copy, Debug)]
pub struct BoundedList<'e> {
    /// What the list holds, for diagnostics ("end features").
    pub role: &'static str,
    pub ids: &'e IdList,
    /// Bound notation, see [`crate::multiplicity`].
    pub bound: &'static str,
}

// ============================================================================
// ELEMENT
// ============================================================================

/// A model element.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    /// Arena handle.
    pub id: ElementId,
    /// Globally unique identifier, stable across sessions.
    pub uuid: Uuid,
    /// The declared name (None for anonymous elements).
    pub name: Option<Arc<str>>,
    /// The owning element. A lookup-only back-reference; owning an element
    /// does not keep it alive and removing the owner does not cascade.
    pub owner: Option<ElementId>,
    pub documentation: Option<Arc<str>>,
    pub data: ElementData,
}

impl Element {
    /// The metaclass of this element.
    pub fn kind(&self) -> ElementKind {
        match &self.data {
            ElementData::Package(_) => ElementKind::Package,
            ElementData::Classifier(_) => ElementKind::Classifier,
            ElementData::Feature(_) => ElementKind::Feature,
            ElementData::Definition(d) => d.kind.element_kind(),
            ElementData::Usage(u) => u.kind.element_kind(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The name for messages: the declared name, or `<anonymous #id>`.
    pub fn label(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => format!("<anonymous {}>", self.id),
        }
    }

    pub fn is_definition(&self) -> bool {
        matches!(self.data, ElementData::Definition(_))
    }

    pub fn is_usage(&self) -> bool {
        matches!(self.data, ElementData::Usage(_))
    }

    pub fn as_definition(&self) -> Option<&Definition> {
        match &self.data {
            ElementData::Definition(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_definition_mut(&mut self) -> Option<&mut Definition> {
        match &mut self.data {
            ElementData::Definition(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_usage(&self) -> Option<&Usage> {
        match &self.data {
            ElementData::Usage(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_usage_mut(&mut self) -> Option<&mut Usage> {
        match &mut self.data {
            ElementData::Usage(u) => Some(u),
            _ => None,
        }
    }

    /// The classifier header, for every element below `Element` itself.
    pub fn classifier(&self) -> Option<&ClassifierHeader> {
        match &self.data {
            ElementData::Package(_) => None,
            ElementData::Classifier(c) => Some(c),
            ElementData::Feature(f) => Some(&f.classifier),
            ElementData::Definition(d) => Some(&d.classifier),
            ElementData::Usage(u) => Some(&u.feature.classifier),
        }
    }

    pub fn classifier_mut(&mut self) -> Option<&mut ClassifierHeader> {
        match &mut self.data {
            ElementData::Package(_) => None,
            ElementData::Classifier(c) => Some(c),
            ElementData::Feature(f) => Some(&mut f.classifier),
            ElementData::Definition(d) => Some(&mut d.classifier),
            ElementData::Usage(u) => Some(&mut u.feature.classifier),
        }
    }

    /// The feature header, for plain features and usages.
    pub fn feature(&self) -> Option<&FeatureHeader> {
        match &self.data {
            ElementData::Feature(f) => Some(f),
            ElementData::Usage(u) => Some(&u.feature),
            _ => None,
        }
    }

    pub fn feature_mut(&mut self) -> Option<&mut FeatureHeader> {
        match &mut self.data {
            ElementData::Feature(f) => Some(f),
            ElementData::Usage(u) => Some(&mut u.feature),
            _ => None,
        }
    }

    /// Whether the element is abstract (false for packages).
    pub fn is_abstract(&self) -> bool {
        self.classifier().is_some_and(|c| c.is_abstract)
    }

    /// Action payload of an action definition or action usage.
    pub fn action(&self) -> Option<&ActionData> {
        match &self.data {
            ElementData::Definition(d) => match &d.kind {
                DefinitionKind::Action(a) => Some(a),
                _ => None,
            },
            ElementData::Usage(u) => match &u.kind {
                UsageKind::Action(a) => Some(a),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn action_mut(&mut self) -> Option<&mut ActionData> {
        match &mut self.data {
            ElementData::Definition(d) => match &mut d.kind {
                DefinitionKind::Action(a) => Some(a),
                _ => None,
            },
            ElementData::Usage(u) => match &mut u.kind {
                UsageKind::Action(a) => Some(a),
                _ => None,
            },
            _ => None,
        }
    }

    /// End features of connection-like elements.
    pub fn ends(&self) -> Option<&IdList> {
        match &self.data {
            ElementData::Definition(d) => d.kind.ends(),
            ElementData::Usage(u) => u.kind.ends(),
            _ => None,
        }
    }

    pub(crate) fn ends_mut(&mut self) -> Option<&mut IdList> {
        match &mut self.data {
            ElementData::Definition(d) => d.kind.ends_mut(),
            ElementData::Usage(u) => u.kind.ends_mut(),
            _ => None,
        }
    }

    /// Relationship lists carrying a cardinality bound.
    pub fn bounded_lists(&self) -> Vec<BoundedList<'_>> {
        let bound = match self.kind() {
            ElementKind::ConnectionDefinition | ElementKind::ConnectionUsage => {
                bounds::CONNECTION_ENDS
            }
            ElementKind::InterfaceDefinition | ElementKind::InterfaceUsage => {
                bounds::INTERFACE_ENDS
            }
            ElementKind::AllocationDefinition | ElementKind::AllocationUsage => {
                bounds::ALLOCATION_ENDS
            }
            _ => return Vec::new(),
        };
        self.ends()
            .map(|ids| {
                vec![BoundedList {
                    role: "end features",
                    ids,
                    bound,
                }]
            })
            .unwrap_or_default()
    }

    /// Whether any relationship of this element points at `target`:
    /// specializations, the usage definition, [`Element::references`],
    /// transition endpoints and action references.
    pub fn refers_to(&self, target: ElementId) -> bool {
        if self
            .classifier()
            .is_some_and(|c| c.specializations.contains(target))
        {
            return true;
        }
        if let Some(usage) = self.as_usage() {
            if usage.definition() == Some(target) {
                return true;
            }
            if let Some(t) = usage.kind.as_transition() {
                if t.source == Some(target) || t.target == Some(target) {
                    return true;
                }
            }
        }
        if self.action().is_some_and(|a| a.referenced_ids().contains(&target)) {
            return true;
        }
        self.references().iter().any(|(_, id)| *id == target)
    }

    /// Outgoing id references that must resolve, tagged with their role.
    ///
    /// Covers containment and connection lists. Specializations, the usage
    /// definition, transition endpoints and action references are checked by
    /// their dedicated rules.
    pub fn references(&self) -> Vec<(&'static str, ElementId)> {
        let mut refs = Vec::new();
        match &self.data {
            ElementData::Package(p) => {
                refs.extend(p.members.iter().map(|id| ("member", id)));
            }
            ElementData::Classifier(_) | ElementData::Feature(_) => {}
            ElementData::Definition(d) => {
                refs.extend(d.owned_features.iter().map(|id| ("owned feature", id)));
                if let Some(ends) = d.kind.ends() {
                    refs.extend(ends.iter().map(|id| ("end feature", id)));
                }
            }
            ElementData::Usage(u) => {
                refs.extend(u.nested.iter().map(|id| ("nested usage", id)));
                if let Some(ends) = u.kind.ends() {
                    refs.extend(ends.iter().map(|id| ("end feature", id)));
                }
                match &u.kind {
                    UsageKind::Flow {
                        source,
                        target,
                        item,
                    } => {
                        refs.extend(source.map(|id| ("flow source", id)));
                        refs.extend(target.map(|id| ("flow target", id)));
                        refs.extend(item.map(|id| ("flow item", id)));
                    }
                    UsageKind::State(s) => {
                        refs.extend(s.entry.iter().map(|id| ("entry action", id)));
                        refs.extend(s.do_actions.iter().map(|id| ("do action", id)));
                        refs.extend(s.exit.iter().map(|id| ("exit action", id)));
                    }
                    _ => {}
                }
            }
        }
        refs
    }
}

// ============================================================================
// ELEMENT KINDS
// ============================================================================

/// The metatype of a model element.
///
/// Derived from [`ElementData`]; maps to SysML v2 / KerML metaclasses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementKind {
    Package,
    Classifier,
    Feature,

    // SysML Definitions
    PartDefinition,
    ItemDefinition,
    AttributeDefinition,
    EnumerationDefinition,
    PortDefinition,
    InterfaceDefinition,
    ConnectionDefinition,
    AllocationDefinition,
    FlowDefinition,
    StateDefinition,
    ActionDefinition,
    ConstraintDefinition,
    RequirementDefinition,
    CalculationDefinition,
    CaseDefinition,
    AnalysisCaseDefinition,
    VerificationCaseDefinition,
    UseCaseDefinition,
    ViewDefinition,
    ViewpointDefinition,
    MetadataDefinition,
    RenderingDefinition,

    // SysML Usages
    PartUsage,
    ItemUsage,
    AttributeUsage,
    ReferenceUsage,
    PortUsage,
    InterfaceUsage,
    ConnectionUsage,
    AllocationUsage,
    FlowUsage,
    StateUsage,
    TransitionUsage,
    ActionUsage,
    ConstraintUsage,
    RequirementUsage,
    CalculationUsage,
    CaseUsage,
    AnalysisCaseUsage,
    VerificationCaseUsage,
    UseCaseUsage,
    ViewUsage,
    ViewpointUsage,
    MetadataUsage,
    RenderingUsage,
}

impl ElementKind {
    /// Metaclass name, e.g. `PartDefinition`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Package => "Package",
            Self::Classifier => "Classifier",
            Self::Feature => "Feature",
            Self::PartDefinition => "PartDefinition",
            Self::ItemDefinition => "ItemDefinition",
            Self::AttributeDefinition => "AttributeDefinition",
            Self::EnumerationDefinition => "EnumerationDefinition",
            Self::PortDefinition => "PortDefinition",
            Self::InterfaceDefinition => "InterfaceDefinition",
            Self::ConnectionDefinition => "ConnectionDefinition",
            Self::AllocationDefinition => "AllocationDefinition",
            Self::FlowDefinition => "FlowDefinition",
            Self::StateDefinition => "StateDefinition",
            Self::ActionDefinition => "ActionDefinition",
            Self::ConstraintDefinition => "ConstraintDefinition",
            Self::RequirementDefinition => "RequirementDefinition",
            Self::CalculationDefinition => "CalculationDefinition",
            Self::CaseDefinition => "CaseDefinition",
            Self::AnalysisCaseDefinition => "AnalysisCaseDefinition",
            Self::VerificationCaseDefinition => "VerificationCaseDefinition",
            Self::UseCaseDefinition => "UseCaseDefinition",
            Self::ViewDefinition => "ViewDefinition",
            Self::ViewpointDefinition => "ViewpointDefinition",
            Self::MetadataDefinition => "MetadataDefinition",
            Self::RenderingDefinition => "RenderingDefinition",
            Self::PartUsage => "PartUsage",
            Self::ItemUsage => "ItemUsage",
            Self::AttributeUsage => "AttributeUsage",
            Self::ReferenceUsage => "ReferenceUsage",
            Self::PortUsage => "PortUsage",
            Self::InterfaceUsage => "InterfaceUsage",
            Self::ConnectionUsage => "ConnectionUsage",
            Self::AllocationUsage => "AllocationUsage",
            Self::FlowUsage => "FlowUsage",
            Self::StateUsage => "StateUsage",
            Self::TransitionUsage => "TransitionUsage",
            Self::ActionUsage => "ActionUsage",
            Self::ConstraintUsage => "ConstraintUsage",
            Self::RequirementUsage => "RequirementUsage",
            Self::CalculationUsage => "CalculationUsage",
            Self::CaseUsage => "CaseUsage",
            Self::AnalysisCaseUsage => "AnalysisCaseUsage",
            Self::VerificationCaseUsage => "VerificationCaseUsage",
            Self::UseCaseUsage => "UseCaseUsage",
            Self::ViewUsage => "ViewUsage",
            Self::ViewpointUsage => "ViewpointUsage",
            Self::MetadataUsage => "MetadataUsage",
            Self::RenderingUsage => "RenderingUsage",
        }
    }

    /// XMI type name, e.g. `sysml:PartDefinition`.
    pub fn metaclass_name(&self) -> String {
        let prefix = match self {
            Self::Classifier | Self::Feature => "kerml",
            _ => "sysml",
        };
        format!("{prefix}:{}", self.as_str())
    }

    pub fn is_definition(&self) -> bool {
        self.as_str().ends_with("Definition")
    }

    pub fn is_usage(&self) -> bool {
        self.as_str().ends_with("Usage")
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
