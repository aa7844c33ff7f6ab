//! Comparison engine implementation.

use std::borrow::Cow;

use tracing::debug;

use super::result::{ChangeSummary, DiffResult};
use crate::align::{TreeAligner, DEFAULT_IDENTITY_ATTRIBUTE};
use crate::annotate::{create_annotator, DisplayStyle, COMPARE_VERSION_ATTR};
use crate::error::Result;
use crate::materialize::{materialize_tree, MaterializeStats};
use crate::model::{Element, SchemaModule};

/// Caller-provided context for one engine invocation, used in logs.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Name of the operation invoking the engine
    pub operation: String,
}

impl RequestContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}

/// Engine comparing two versions of an element tree.
///
/// Built once with a display style and identity attribute, then reused
/// across invocations; all state lives in the call.
pub struct CompareEngine {
    style: DisplayStyle,
    identity_attr: String,
}

impl CompareEngine {
    /// Create an engine rendering the given display style.
    pub fn new(style: DisplayStyle) -> Self {
        Self {
            style,
            identity_attr: DEFAULT_IDENTITY_ATTRIBUTE.to_string(),
        }
    }

    /// Use a different attribute for identity matching.
    pub fn with_identity_attribute(mut self, name: impl Into<String>) -> Self {
        self.identity_attr = name.into();
        self
    }

    /// Get the configured display style.
    pub fn style(&self) -> DisplayStyle {
        self.style
    }

    /// Get the configured identity attribute name.
    pub fn identity_attribute(&self) -> &str {
        &self.identity_attr
    }

    /// Compare two resolved elements and build the annotated result.
    ///
    /// `element_one` is the old version, `element_two` the new. Both inputs
    /// are only read. `version_label` is attached to the result root even
    /// when empty. Materialization runs only when requested and a schema
    /// module is in scope; an unresolved code never fails the call. Either
    /// a complete result is returned or an error, never a partial tree.
    pub fn compare_elements(
        &self,
        ctx: &RequestContext,
        element_one: &Element,
        element_two: &Element,
        version_label: &str,
        schema_module: Option<&SchemaModule>,
        materialise_mapsets: bool,
    ) -> Result<DiffResult> {
        let (old, old_stats) = prepare(element_one, schema_module, materialise_mapsets);
        let (new, new_stats) = prepare(element_two, schema_module, materialise_mapsets);
        let mut materialize_stats = old_stats;
        materialize_stats.merge(&new_stats);

        let aligner = TreeAligner::new().with_identity_attribute(&self.identity_attr);
        let aligned = aligner.align(old.as_ref(), new.as_ref())?;
        let summary = ChangeSummary::from_aligned(&aligned);

        let annotator = create_annotator(self.style);
        let mut root = annotator.annotate(&aligned);
        root.set_attr(COMPARE_VERSION_ATTR, version_label);

        debug!(
            operation = ctx.operation.as_str(),
            style = %self.style,
            added = summary.added,
            removed = summary.removed,
            changed = summary.changed,
            unchanged = summary.unchanged,
            unresolved = materialize_stats.codes_unresolved,
            "compared element trees"
        );

        Ok(DiffResult {
            root,
            version_label: version_label.to_string(),
            style: self.style,
            summary,
        })
    }
}

/// Materialize a side into an owned copy, or borrow it untouched.
fn prepare<'a>(
    element: &'a Element,
    module: Option<&SchemaModule>,
    materialise_mapsets: bool,
) -> (Cow<'a, Element>, MaterializeStats) {
    match module {
        Some(module) if materialise_mapsets => {
            let (copy, stats) = materialize_tree(element, module);
            (Cow::Owned(copy), stats)
        }
        _ => (Cow::Borrowed(element), MaterializeStats::new()),
    }
}
