//! Shared test helpers
//!
//! - `model_builders`: short constructors for common element shapes
//! - `diagnostic_helpers`: assertions over validation results

pub mod diagnostic_helpers;
pub mod model_builders;
