//! Editing layer tests
//!
//! - Change tracking and dirty-only re-validation
//! - Shared model access under the writer lock
//! - Diagnostic serialization (feature `serde`)

pub mod tests_change_tracking;
#[cfg(feature = "serde")]
pub mod tests_serde;
pub mod tests_shared_model;
