//! Properties that hold for every input in a small exhaustive domain
//!
//! - Multiplicity: canonical round trip, size check boundaries
//! - Specialization: cycles detected iff present
//! - Reachability: connected machines pass, cutting an edge strands a state

pub mod tests_multiplicity;
pub mod tests_reachability;
pub mod tests_specialization;
