//! Comparison result structures.

use serde::{Deserialize, Serialize};

use crate::align::{AlignedPair, ChangeKind};
use crate::annotate::DisplayStyle;
use crate::model::Element;

/// Counts of aligned node pairs by classification.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    /// Pairs present only in the new version
    pub added: usize,
    /// Pairs present only in the old version
    pub removed: usize,
    /// Matched pairs differing in text, attributes, or descendants
    pub changed: usize,
    /// Matched pairs with no difference
    pub unchanged: usize,
    /// Pairs carrying a mapset code that could not be resolved
    pub unresolved: usize,
}

impl ChangeSummary {
    /// Tally every pair of an aligned tree.
    #[must_use]
    pub fn from_aligned(root: &AlignedPair<'_>) -> Self {
        let mut summary = Self::default();
        summary.tally(root);
        summary
    }

    fn tally(&mut self, pair: &AlignedPair<'_>) {
        match pair.kind {
            ChangeKind::Added => self.added += 1,
            ChangeKind::Removed => self.removed += 1,
            ChangeKind::Changed => self.changed += 1,
            ChangeKind::Unchanged => self.unchanged += 1,
        }
        if pair.is_unresolved() {
            self.unresolved += 1;
        }
        for child in &pair.children {
            self.tally(child);
        }
    }

    /// Total number of pairs tallied.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.added + self.removed + self.changed + self.unchanged
    }

    /// Whether any pair differs between the two versions.
    ///
    /// Unresolved mapset codes are caveats, not changes.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.added + self.removed + self.changed > 0
    }
}

/// Complete result of one comparison.
#[derive(Debug, Clone)]
#[must_use]
pub struct DiffResult {
    /// Annotated output tree, disconnected from both inputs
    pub root: Element,
    /// Version label attached to the result root
    pub version_label: String,
    /// Style the output was rendered with
    pub style: DisplayStyle,
    /// Counts by classification
    pub summary: ChangeSummary,
}

impl DiffResult {
    /// Whether the two versions differ at all.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.summary.has_changes()
    }
}
