//! Foundation types for the integrity engine.
//!
//! This module provides the primitives every other layer builds on:
//! - [`ElementId`] - Opaque arena handle for a model element
//! - [`IdList`] - Ordered, duplicate-free list of element handles
//!
//! This module has NO dependencies on other syster modules.

mod id;
mod id_list;

pub use id::ElementId;
pub use id_list::IdList;
