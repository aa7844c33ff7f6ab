//! **A structural comparison engine for hierarchical document state.**
//!
//! `docdiff-tools` compares two versions of a document tree and produces an
//! annotated result tree used to render change history to an end user. It
//! provides a deterministic tree-alignment algorithm, value resolution
//! against schema-defined enumerations (mapsets), and two output encodings
//! consumed by different downstream renderers, all side-effect-free on the
//! inputs and resilient to partial lookup failures.
//!
//! ## Key Features
//!
//! - **Deterministic alignment**: nodes are matched tag-by-tag, by identity
//!   attribute where present and by document position otherwise. Ambiguous
//!   groupings fail loudly with the offending path instead of guessing.
//! - **Mapset materialization**: coded values are resolved to display labels
//!   through a schema module before comparing, so equivalent codes compare
//!   equal. An unresolvable code is a per-node caveat, never a failure.
//! - **Two output encodings**: a backward-compatible merged tree (`legacy`)
//!   and a shape-preserving tree with per-node change metadata (`hint`).
//! - **Command host**: a markup-driven `<compare>` command that resolves its
//!   inputs by path, runs the engine, and replaces a destination element's
//!   content with the result.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the [`Element`] tree the engine compares, plus the
//!   [`SchemaCatalog`] supplying mapset enumerations.
//! - **[`align`]**: the [`TreeAligner`], which pairs up nodes of the old and
//!   new trees and classifies each pair with a [`ChangeKind`].
//! - **[`annotate`]**: the two [`DiffAnnotator`] strategies rendering an
//!   aligned tree into output, selected by [`DisplayStyle`].
//! - **[`compare`]**: the [`CompareEngine`] orchestrating materialize →
//!   align → annotate into a [`DiffResult`].
//! - **[`registry`]**: the command host mapping markup element names to
//!   runnable commands at load time.
//!
//! ## Getting Started: Comparing Two Documents
//!
//! ```no_run
//! use docdiff_tools::annotate::DisplayStyle;
//! use docdiff_tools::compare::{CompareEngine, RequestContext};
//! use docdiff_tools::parsers::parse_document_str;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let old = parse_document_str("<order><status>2</status></order>")?;
//!     let new = parse_document_str("<order><status>5</status></order>")?;
//!
//!     let engine = CompareEngine::new(DisplayStyle::Hint);
//!     let ctx = RequestContext::new("compare");
//!     let result = engine.compare_elements(&ctx, &old, &new, "v2", None, false)?;
//!
//!     println!(
//!         "{} changed, {} added, {} removed",
//!         result.summary.changed, result.summary.added, result.summary.removed
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Resolving Labels Through a Schema Module
//!
//! ```no_run
//! use docdiff_tools::annotate::DisplayStyle;
//! use docdiff_tools::compare::{CompareEngine, RequestContext};
//! use docdiff_tools::model::SchemaCatalog;
//! use docdiff_tools::parsers::parse_document_str;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let yaml = r#"
//! modules:
//!   - name: orders
//!     bindings:
//!       status: status-type
//!     mapsets:
//!       status-type:
//!         "2": Active
//! "#;
//!     let catalog = SchemaCatalog::from_yaml_str(yaml)?;
//!     let module = catalog.get("orders")?;
//!
//!     let old = parse_document_str("<order><status>2</status></order>")?;
//!     let new = parse_document_str("<order><status>2</status></order>")?;
//!
//!     let engine = CompareEngine::new(DisplayStyle::Legacy);
//!     let ctx = RequestContext::new("compare");
//!     let result = engine.compare_elements(&ctx, &old, &new, "v2", Some(module), true)?;
//!     assert!(!result.has_changes());
//!     Ok(())
//! }
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! This documentation is for the `docdiff-tools` library crate. The binary
//! of the same name wraps it with `compare` and `script` subcommands; see
//! the project README.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Doc completeness: # Errors / # Panics sections are aspirational
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Variable names like `old`/`new` are clear in context
    clippy::similar_names
)]

pub mod align;
pub mod annotate;
pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod materialize;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod registry;
pub mod select;

// Re-export main types for convenience
pub use align::{AlignedPair, ChangeKind, TreeAligner};
pub use annotate::{create_annotator, DiffAnnotator, DisplayStyle, HintAnnotator, LegacyAnnotator};
pub use compare::{ChangeSummary, CompareEngine, DiffResult, RequestContext};
pub use config::{
    AppConfig, AppConfigBuilder, BehaviorConfig, CompareOptions, CompareRunConfig, OutputConfig,
    SchemaConfig, ScriptRunConfig,
};
pub use config::{ConfigError, Validatable};
pub use error::{DocDiffError, ErrorContext, OptionContext, Result};
pub use materialize::{MapsetLookup, Materializer, ModuleLookup, NoOpLookup};
pub use model::{Element, Mapset, NodePath, SchemaCatalog, SchemaModule};
pub use parsers::{parse_document, parse_document_str, serialize_document, serialize_element};
pub use registry::{Command, CommandFactory, CommandRegistry, ScriptContext};
pub use select::{select_all, select_one};
