//! Mapset materialization: coded values to human-readable labels.
//!
//! This module provides the `MapsetLookup` trait for resolving a type
//! descriptor plus raw code to a display label, along with implementations.
//! A lookup miss never fails an operation; the affected node is marked
//! unresolved and keeps its raw value.

use tracing::debug;

use crate::model::{Element, SchemaModule};

/// Trait for mapset label sources.
///
/// Implement this trait to resolve labels from a new kind of schema store.
///
/// # Example
///
/// ```ignore
/// use docdiff_tools::materialize::{MapsetLookup, ModuleLookup, NoOpLookup};
///
/// // Use NoOpLookup when no schema module is in scope
/// let lookup: Box<dyn MapsetLookup> = match module {
///     Some(module) => Box::new(ModuleLookup::new(module)),
///     None => Box::new(NoOpLookup),
/// };
/// ```
pub trait MapsetLookup: Send + Sync {
    /// Whether this lookup carries a mapset for the descriptor at all.
    ///
    /// Elements whose descriptor is not covered pass through materialization
    /// untouched, with no caveat.
    fn covers(&self, descriptor: &str) -> bool;

    /// The label a covered descriptor's mapset assigns to a code.
    fn label_for(&self, descriptor: &str, code: &str) -> Option<String>;

    /// Name of this lookup source, for logs.
    fn name(&self) -> &str;
}

/// A no-operation lookup that covers nothing.
///
/// Use this when materialization is disabled or no schema module is in
/// scope. It implements the Null Object pattern, allowing code to use the
/// `MapsetLookup` trait without option checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLookup;

impl NoOpLookup {
    /// Create a new no-op lookup.
    pub fn new() -> Self {
        Self
    }
}

impl MapsetLookup for NoOpLookup {
    fn covers(&self, _descriptor: &str) -> bool {
        false
    }

    fn label_for(&self, _descriptor: &str, _code: &str) -> Option<String> {
        None
    }

    fn name(&self) -> &str {
        "noop"
    }
}

/// Lookup backed by one schema module's mapsets.
#[derive(Debug, Clone, Copy)]
pub struct ModuleLookup<'a> {
    module: &'a SchemaModule,
}

impl<'a> ModuleLookup<'a> {
    pub fn new(module: &'a SchemaModule) -> Self {
        Self { module }
    }
}

impl MapsetLookup for ModuleLookup<'_> {
    fn covers(&self, descriptor: &str) -> bool {
        self.module.mapset_for(descriptor).is_some()
    }

    fn label_for(&self, descriptor: &str, code: &str) -> Option<String> {
        self.module
            .mapset_for(descriptor)?
            .label_for(code)
            .map(str::to_string)
    }

    fn name(&self) -> &str {
        self.module.name.as_str()
    }
}

/// Counters from one materialization pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MaterializeStats {
    /// Nodes walked.
    pub nodes_visited: usize,
    /// Codes replaced by a label.
    pub codes_resolved: usize,
    /// Codes with a covering mapset but no label; marked unresolved.
    pub codes_unresolved: usize,
}

impl MaterializeStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_misses(&self) -> bool {
        self.codes_unresolved > 0
    }

    /// Fold counters from a second pass (the other side of a comparison).
    pub fn merge(&mut self, other: &Self) {
        self.nodes_visited += other.nodes_visited;
        self.codes_resolved += other.codes_resolved;
        self.codes_unresolved += other.codes_unresolved;
    }
}

/// Walks a tree replacing covered codes with labels.
pub struct Materializer<'l> {
    lookup: &'l dyn MapsetLookup,
}

impl<'l> Materializer<'l> {
    pub fn new(lookup: &'l dyn MapsetLookup) -> Self {
        Self { lookup }
    }

    /// Materialize in place, returning counters.
    ///
    /// Only nodes whose descriptor is covered by the lookup are candidates;
    /// a covered node with a non-empty text value either gets the label or
    /// is flagged unresolved. Everything else is left as-is.
    pub fn materialize(&self, root: &mut Element) -> MaterializeStats {
        let mut stats = MaterializeStats::new();
        self.materialize_node(root, &mut stats);
        debug!(
            source = self.lookup.name(),
            nodes = stats.nodes_visited,
            resolved = stats.codes_resolved,
            unresolved = stats.codes_unresolved,
            "materialized mapset labels"
        );
        stats
    }

    fn materialize_node(&self, el: &mut Element, stats: &mut MaterializeStats) {
        stats.nodes_visited += 1;
        if let Some(descriptor) = el.descriptor.clone() {
            if self.lookup.covers(&descriptor) {
                let code = el.text.clone().unwrap_or_default();
                if !code.is_empty() {
                    match self.lookup.label_for(&descriptor, &code) {
                        Some(label) => {
                            el.text = Some(label);
                            stats.codes_resolved += 1;
                        }
                        None => {
                            el.unresolved = true;
                            stats.codes_unresolved += 1;
                        }
                    }
                }
            }
        }
        for child in &mut el.children {
            self.materialize_node(child, stats);
        }
    }
}

/// Bind a module's descriptors onto a copy of `element` and materialize it.
///
/// The input tree is never modified; the returned copy carries the labels
/// and any unresolved flags.
pub fn materialize_tree(element: &Element, module: &SchemaModule) -> (Element, MaterializeStats) {
    let mut copy = element.clone();
    module.bind(&mut copy);
    let lookup = ModuleLookup::new(module);
    let stats = Materializer::new(&lookup).materialize(&mut copy);
    (copy, stats)
}
