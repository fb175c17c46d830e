//! End-to-end scenarios over whole models
//!
//! - State machines: reachability and guard conflicts
//! - Connections: end-feature bounds
//! - Actions: succession cycles and conditional branches

pub mod tests_actions;
pub mod tests_connections;
pub mod tests_state_machines;
