//! Diagnostics for surfacing validation results to a UI layer.
//!
//! Errors are fatal for the edit or import that produced them; advisories
//! are the second, non-fatal tier.

use tracing::warn;

use super::codes::AdvisoryKind;
use super::error::ValidationError;
use crate::base::ElementId;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Error,
    Warning,
}

/// A non-fatal condition found during validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub element: ElementId,
    pub message: String,
}

impl Advisory {
    /// Create an advisory and log it.
    pub fn new(kind: AdvisoryKind, element: ElementId, message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(code = kind.code(), %element, "{message}");
        Self {
            kind,
            element,
            message,
        }
    }
}

/// A validation result in the shape a UI consumes: a stable tag, a code,
/// the offending ids and the rendered message.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category tag, e.g. `UnreachableStates`.
    pub category: &'static str,
    /// Stable code, e.g. `V0309`.
    pub code: &'static str,
    pub elements: Vec<ElementId>,
    pub message: String,
}

impl Diagnostic {
    pub fn from_error(error: &ValidationError) -> Self {
        let category = error.category();
        Self {
            severity: Severity::Error,
            category: category.as_str(),
            code: category.code(),
            elements: error.elements(),
            message: error.to_string(),
        }
    }

    pub fn from_advisory(advisory: &Advisory) -> Self {
        Self {
            severity: Severity::Warning,
            category: advisory.kind.as_str(),
            code: advisory.kind.code(),
            elements: vec![advisory.element],
            message: advisory.message.clone(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics across validation runs.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn add_error(&mut self, error: &ValidationError) {
        self.add(Diagnostic::from_error(error));
    }

    pub fn add_advisory(&mut self, advisory: &Advisory) {
        self.add(Diagnostic::from_advisory(advisory));
    }

    /// Add every error, then every advisory, of a report.
    pub fn add_report(&mut self, report: &Report) {
        self.diagnostics.extend(report.diagnostics());
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics naming a given element.
    pub fn diagnostics_for_element(&self, id: ElementId) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.elements.contains(&id))
            .collect()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

// ============================================================================
// REPORT
// ============================================================================

/// Outcome of a validation pass.
///
/// In fail-fast mode a failing pass returns its error directly, so a report
/// only ever carries errors when collecting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub errors: Vec<ValidationError>,
    pub advisories: Vec<Advisory>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// No errors and no advisories.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.advisories.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors first, then advisories, each in the order found.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors
            .iter()
            .map(Diagnostic::from_error)
            .chain(self.advisories.iter().map(Diagnostic::from_advisory))
            .collect()
    }

    pub fn merge(&mut self, other: Report) {
        self.errors.extend(other.errors);
        self.advisories.extend(other.advisories);
    }
}
