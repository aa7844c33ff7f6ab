//! Comparison engine for document element trees.
//!
//! Orchestrates one comparison end to end: optional mapset materialization
//! of both inputs, tree alignment, annotation in the configured display
//! style, and summary derivation. The engine is stateless once built and
//! never mutates its inputs.
//!
//! # Example
//!
//! ```ignore
//! use docdiff_tools::annotate::DisplayStyle;
//! use docdiff_tools::compare::{CompareEngine, RequestContext};
//!
//! let engine = CompareEngine::new(DisplayStyle::Legacy);
//! let ctx = RequestContext::new("compare");
//! let result = engine.compare_elements(&ctx, &old, &new, "v2", None, false)?;
//! if result.has_changes() {
//!     println!("{} changed", result.summary.changed);
//! }
//! ```

mod engine;
mod result;

pub use engine::{CompareEngine, RequestContext};
pub use result::{ChangeSummary, DiffResult};
