//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod compare;
mod script;

pub use compare::run_compare;
pub use script::run_script;

// Re-export config types used by handlers
pub use crate::config::{CompareRunConfig, ScriptRunConfig};
