//! Stable category tags and codes for validation failures.
//!
//! Codes follow `V{layer}{number}`:
//! - V01xx: multiplicity
//! - V02xx: structural and referential
//! - V03xx: state machine
//! - V04xx: action hierarchy
//!
//! Advisories use `W00xx`.

use std::fmt;

/// The kind of a validation failure.
///
/// `as_str` is the tag surfaced to callers; it never changes once published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    // =========================================================================
    // V01xx: Multiplicity
    // =========================================================================
    /// Bound text could not be parsed
    MalformedMultiplicity,
    /// Collection size outside its bound
    MultiplicityViolation,

    // =========================================================================
    // V02xx: Structural and referential
    // =========================================================================
    MissingName,
    /// Classifier both abstract and final
    AbstractFinalConflict,
    /// Portion feature that is not composite
    PortionNotComposite,
    CyclicSpecialization,
    /// Non-abstract usage without a definition
    UnresolvedDefinition,
    /// Id that does not resolve
    DanglingReference,
    NestedUsageCycle,

    // =========================================================================
    // V03xx: State machine
    // =========================================================================
    MissingTransitionEndpoint,
    /// Else transition carrying a guard
    GuardedElseTransition,
    /// Self-transition without trigger or guard
    UntriggeredSelfTransition,
    MissingInitialState,
    AmbiguousInitialState,
    DanglingTransitionEndpoint,
    DuplicateElseTransition,
    DuplicateDefaultTransition,
    UnreachableStates,

    // =========================================================================
    // V04xx: Action hierarchy
    // =========================================================================
    DanglingParameter,
    DanglingSuccessor,
    /// Body, branch, loop or invocation action that does not resolve
    DanglingActionReference,
    MissingBranches,
    MultipleElseBranches,
    BranchWithoutCondition,
    EmptyBranch,
    MissingLoopCondition,
    MissingLoopInit,
    MissingLoopUpdate,
    MissingLoopCollection,
    MissingLoopIterator,
    EmptyLoopBody,
    MissingInvocationTarget,
}

impl Category {
    /// Every category, in code order.
    pub const ALL: [Category; 32] = [
        Self::MalformedMultiplicity,
        Self::MultiplicityViolation,
        Self::MissingName,
        Self::AbstractFinalConflict,
        Self::PortionNotComposite,
        Self::CyclicSpecialization,
        Self::UnresolvedDefinition,
        Self::DanglingReference,
        Self::NestedUsageCycle,
        Self::MissingTransitionEndpoint,
        Self::GuardedElseTransition,
        Self::UntriggeredSelfTransition,
        Self::MissingInitialState,
        Self::AmbiguousInitialState,
        Self::DanglingTransitionEndpoint,
        Self::DuplicateElseTransition,
        Self::DuplicateDefaultTransition,
        Self::UnreachableStates,
        Self::DanglingParameter,
        Self::DanglingSuccessor,
        Self::DanglingActionReference,
        Self::MissingBranches,
        Self::MultipleElseBranches,
        Self::BranchWithoutCondition,
        Self::EmptyBranch,
        Self::MissingLoopCondition,
        Self::MissingLoopInit,
        Self::MissingLoopUpdate,
        Self::MissingLoopCollection,
        Self::MissingLoopIterator,
        Self::EmptyLoopBody,
        Self::MissingInvocationTarget,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedMultiplicity => "MalformedMultiplicity",
            Self::MultiplicityViolation => "MultiplicityViolation",
            Self::MissingName => "MissingName",
            Self::AbstractFinalConflict => "AbstractFinalConflict",
            Self::PortionNotComposite => "PortionNotComposite",
            Self::CyclicSpecialization => "CyclicSpecialization",
            Self::UnresolvedDefinition => "UnresolvedDefinition",
            Self::DanglingReference => "DanglingReference",
            Self::NestedUsageCycle => "NestedUsageCycle",
            Self::MissingTransitionEndpoint => "MissingTransitionEndpoint",
            Self::GuardedElseTransition => "GuardedElseTransition",
            Self::UntriggeredSelfTransition => "UntriggeredSelfTransition",
            Self::MissingInitialState => "MissingInitialState",
            Self::AmbiguousInitialState => "AmbiguousInitialState",
            Self::DanglingTransitionEndpoint => "DanglingTransitionEndpoint",
            Self::DuplicateElseTransition => "DuplicateElseTransition",
            Self::DuplicateDefaultTransition => "DuplicateDefaultTransition",
            Self::UnreachableStates => "UnreachableStates",
            Self::DanglingParameter => "DanglingParameter",
            Self::DanglingSuccessor => "DanglingSuccessor",
            Self::DanglingActionReference => "DanglingActionReference",
            Self::MissingBranches => "MissingBranches",
            Self::MultipleElseBranches => "MultipleElseBranches",
            Self::BranchWithoutCondition => "BranchWithoutCondition",
            Self::EmptyBranch => "EmptyBranch",
            Self::MissingLoopCondition => "MissingLoopCondition",
            Self::MissingLoopInit => "MissingLoopInit",
            Self::MissingLoopUpdate => "MissingLoopUpdate",
            Self::MissingLoopCollection => "MissingLoopCollection",
            Self::MissingLoopIterator => "MissingLoopIterator",
            Self::EmptyLoopBody => "EmptyLoopBody",
            Self::MissingInvocationTarget => "MissingInvocationTarget",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            // Multiplicity
            Self::MalformedMultiplicity => "V0101",
            Self::MultiplicityViolation => "V0102",
            // Structural
            Self::MissingName => "V0201",
            Self::AbstractFinalConflict => "V0202",
            Self::PortionNotComposite => "V0203",
            Self::CyclicSpecialization => "V0204",
            Self::UnresolvedDefinition => "V0205",
            Self::DanglingReference => "V0206",
            Self::NestedUsageCycle => "V0207",
            // State machine
            Self::MissingTransitionEndpoint => "V0301",
            Self::GuardedElseTransition => "V0302",
            Self::UntriggeredSelfTransition => "V0303",
            Self::MissingInitialState => "V0304",
            Self::AmbiguousInitialState => "V0305",
            Self::DanglingTransitionEndpoint => "V0306",
            Self::DuplicateElseTransition => "V0307",
            Self::DuplicateDefaultTransition => "V0308",
            Self::UnreachableStates => "V0309",
            // Action hierarchy
            Self::DanglingParameter => "V0401",
            Self::DanglingSuccessor => "V0402",
            Self::DanglingActionReference => "V0403",
            Self::MissingBranches => "V0404",
            Self::MultipleElseBranches => "V0405",
            Self::BranchWithoutCondition => "V0406",
            Self::EmptyBranch => "V0407",
            Self::MissingLoopCondition => "V0408",
            Self::MissingLoopInit => "V0409",
            Self::MissingLoopUpdate => "V0410",
            Self::MissingLoopCollection => "V0411",
            Self::MissingLoopIterator => "V0412",
            Self::EmptyLoopBody => "V0413",
            Self::MissingInvocationTarget => "V0414",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::MalformedMultiplicity | Self::MultiplicityViolation => "multiplicity error",
            Self::MissingName
            | Self::AbstractFinalConflict
            | Self::PortionNotComposite
            | Self::CyclicSpecialization
            | Self::UnresolvedDefinition
            | Self::DanglingReference
            | Self::NestedUsageCycle => "structural error",
            Self::MissingTransitionEndpoint
            | Self::GuardedElseTransition
            | Self::UntriggeredSelfTransition
            | Self::MissingInitialState
            | Self::AmbiguousInitialState
            | Self::DanglingTransitionEndpoint
            | Self::DuplicateElseTransition
            | Self::DuplicateDefaultTransition
            | Self::UnreachableStates => "state machine error",
            Self::DanglingParameter
            | Self::DanglingSuccessor
            | Self::DanglingActionReference
            | Self::MissingBranches
            | Self::MultipleElseBranches
            | Self::BranchWithoutCondition
            | Self::EmptyBranch
            | Self::MissingLoopCondition
            | Self::MissingLoopInit
            | Self::MissingLoopUpdate
            | Self::MissingLoopCollection
            | Self::MissingLoopIterator
            | Self::EmptyLoopBody
            | Self::MissingInvocationTarget => "action error",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-fatal conditions, reported beside errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AdvisoryKind {
    /// Abstract definition that usages still refer to
    AbstractDefinitionInUse,
    /// Connection or flow whose two ends are the same element
    SelfReferentialConnection,
    /// Connection whose first and last ends share a definition
    SameTypeConnection,
}

impl AdvisoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AbstractDefinitionInUse => "AbstractDefinitionInUse",
            Self::SelfReferentialConnection => "SelfReferentialConnection",
            Self::SameTypeConnection => "SameTypeConnection",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::AbstractDefinitionInUse => "W0001",
            Self::SelfReferentialConnection => "W0002",
            Self::SameTypeConnection => "W0003",
        }
    }
}

impl fmt::Display for AdvisoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<_> = Category::ALL.iter().map(Category::code).collect();
        assert_eq!(codes.len(), Category::ALL.len());
    }

    #[test]
    fn test_tags_are_unique() {
        let tags: HashSet<_> = Category::ALL.iter().map(Category::as_str).collect();
        assert_eq!(tags.len(), Category::ALL.len());
    }

    #[test]
    fn test_code_prefix_matches_description() {
        for category in Category::ALL {
            let expected = match &category.code()[..3] {
                "V01" => "multiplicity error",
                "V02" => "structural error",
                "V03" => "state machine error",
                "V04" => "action error",
                other => panic!("unexpected code prefix {other}"),
            };
            assert_eq!(category.description(), expected, "{category}");
        }
    }

    #[test]
    fn test_display_is_tag() {
        assert_eq!(Category::UnreachableStates.to_string(), "UnreachableStates");
        assert_eq!(
            AdvisoryKind::SelfReferentialConnection.to_string(),
            "SelfReferentialConnection"
        );
    }
}
