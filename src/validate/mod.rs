//! Validation of element graphs.
//!
//! Validators only read the graph. Each raises at most one
//! [`ValidationError`] per unit it checks (an element, a state machine, an
//! action root) and fails fast by default:
//!
//! ```text
//! ModelValidator
//! ├── StructuralValidator      per element
//! ├── StateMachine::validate   per state definition/usage owning states
//! └── ActionHierarchyValidator one walk over the action forest
//! ```
//!
//! Advisories are the second, non-fatal tier. They are logged at `warn`
//! and returned in the [`Report`].

mod action;
mod codes;
mod diagnostics;
mod error;
mod pass;
mod state_machine;
mod structural;


pub use action::{ActionHierarchyValidator, validate_action_hierarchy};
pub use codes::{AdvisoryKind, Category};
pub use diagnostics::{Advisory, Diagnostic, DiagnosticCollector, Report, Severity};
pub use error::{Endpoint, LabeledIds, ParameterRole, Result, ValidationError};
pub use pass::{ModelValidator, validate_model};
pub(crate) use pass::owns_states;
pub use state_machine::{ConflictKind, GuardConflict, StateMachine, validate_state_machine};
pub use structural::{StructuralValidator, validate_element};

/// How a pass reacts to a failure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ValidationMode {
    /// Stop at the first error and return it.
    #[default]
    FailFast,
    /// Keep going and return every unit's first error in the report.
    CollectAll,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidationOptions {
    pub mode: ValidationMode,
    /// Gather advisories alongside errors.
    pub report_advisories: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            mode: ValidationMode::FailFast,
            report_advisories: true,
        }
    }
}

impl ValidationOptions {
    pub fn collect_all() -> Self {
        Self {
            mode: ValidationMode::CollectAll,
            ..Self::default()
        }
    }

    pub fn with_advisories(mut self, report: bool) -> Self {
        self.report_advisories = report;
        self
    }
}
