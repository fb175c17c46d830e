//! Assertions over validation results.

use syster_integrity::model::Model;
use syster_integrity::validate::{Category, Report, ValidationError};
use syster_integrity::ElementId;

/// Categories of the errors in a report, in report order.
pub fn categories(report: &Report) -> Vec<Category> {
    report.errors.iter().map(ValidationError::category).collect()
}

/// Assert a result failed with the given category.
pub fn assert_category<T: std::fmt::Debug>(result: Result<T, ValidationError>, expected: Category) {
    match result {
        Ok(value) => panic!("expected {expected}, got Ok({value:?})"),
        Err(err) => assert_eq!(
            err.category(),
            expected,
            "expected {expected}, got {}: {err}",
            err.category()
        ),
    }
}

/// Assert a report carries no errors.
pub fn assert_no_errors(report: &Report) {
    assert!(
        !report.has_errors(),
        "Expected no errors, got {} error(s):\n{}",
        report.errors.len(),
        report
            .errors
            .iter()
            .map(|e| format!("  [{}] {e}", e.category().code()))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Names of the given elements, for comparing against expected lists.
pub fn names(model: &Model, ids: &[ElementId]) -> Vec<String> {
    ids.iter()
        .map(|id| model.get(*id).map(|e| e.label()).unwrap_or_default())
        .collect()
}
