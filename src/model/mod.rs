//! Core data structures for hierarchical document state.
//!
//! This module defines the element tree compared by the engine, the path
//! type used to address locations inside it, and the schema catalog that
//! supplies mapset enumerations for value materialization.

mod element;
mod path;
mod schema;

pub use element::*;
pub use path::*;
pub use schema::*;
