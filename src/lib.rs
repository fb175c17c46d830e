//! # syster-integrity
//!
//! Structural integrity and validation engine for SysML v2 and KerML element
//! graphs.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! editing / session → change tracking, single-writer shared model
//!   ↓
//! validate          → structural, state machine and action hierarchy rules
//!   ↓
//! model             → element arena, typed variants, views, resolvers
//!   ↓
//! multiplicity      → bound parsing and size checks
//!   ↓
//! base              → primitives (ElementId, IdList)
//! ```
//!
//! Validation is synchronous and never mutates the graph. Every failure is a
//! [`ValidationError`] with a stable [`Category`], the offending element ids
//! and a message; passes fail fast unless asked to collect.

// ============================================================================
// MODULES (dependency order: base → multiplicity → model → validate → editing)
// ============================================================================

/// Foundation types: ElementId, IdList
pub mod base;

/// Multiplicity bounds: parsing, canonical rendering, size checks
pub mod multiplicity;

/// Element graph: arena, element variants, views and resolvers
pub mod model;

/// Validators and the whole-model pass
pub mod validate;

/// Change tracking with dirty-only re-validation
pub mod editing;

/// Model shared between threads under one writer lock
pub mod session;

// Re-export foundation types
pub use base::{ElementId, IdList};

// Re-export commonly needed items
pub use editing::ChangeTracker;
pub use model::{Element, ElementKind, Model, ModelError, NewElement};
pub use multiplicity::{Multiplicity, MultiplicityError, UpperBound};
pub use session::SharedModel;
pub use validate::{
    Category, Report, ValidationError, ValidationMode, ValidationOptions, validate_model,
};
