//! Annotation of aligned trees into renderable output.
//!
//! This module provides the output strategies for comparison results:
//! - Legacy: one merged tree in document order, backward compatible with
//!   renderers that expect the original single-tree shape
//! - Hint: the new tree's shape with non-intrusive per-node metadata,
//!   letting a renderer style nodes without altering their structure
//!
//! Both strategies sit behind the `DiffAnnotator` trait and share one
//! attribute vocabulary, defined here as constants.

mod hint;
mod legacy;

pub use hint::HintAnnotator;
pub use legacy::LegacyAnnotator;

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::align::AlignedPair;
use crate::model::Element;

/// Attribute marking a node as added, removed, or changed in legacy output.
pub const CHANGE_ATTR: &str = "change";
/// Attribute carrying every node's classification in hint output.
pub const CHANGE_HINT_ATTR: &str = "change-hint";
/// Attribute carrying the prior text of a changed node in hint output.
pub const PREVIOUS_VALUE_ATTR: &str = "previous-value";
/// Prefix for attributes carrying the prior value of a changed attribute in
/// hint output, e.g. `previous-qty="4"` next to the current `qty="6"`.
pub const PREVIOUS_ATTR_PREFIX: &str = "previous-";
/// Attribute flagging a mapset code that could not be resolved.
pub const UNRESOLVED_ATTR: &str = "unresolved-mapset";
/// Attribute attached to the result root carrying the version label.
pub const COMPARE_VERSION_ATTR: &str = "compare-version";
/// Wrapper tag holding the prior text of a changed value in legacy output.
pub const OLD_VALUE_TAG: &str = "old-value";
/// Wrapper tag holding the current text of a changed value in legacy output.
pub const NEW_VALUE_TAG: &str = "new-value";

/// Output strategy for comparison results
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayStyle {
    /// Merged single-tree output, backward compatible
    #[default]
    Legacy,
    /// New-shape output with per-node change metadata
    Hint,
}

impl DisplayStyle {
    /// Parse a style from string. Returns None for unrecognized values.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "legacy" => Some(Self::Legacy),
            "hint" => Some(Self::Hint),
            _ => None,
        }
    }
}

impl std::fmt::Display for DisplayStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayStyle::Legacy => write!(f, "legacy"),
            DisplayStyle::Hint => write!(f, "hint"),
        }
    }
}

/// Trait for annotators that render an aligned tree into output.
pub trait DiffAnnotator: Send + Sync {
    /// Build the annotated output tree for an aligned pair tree.
    ///
    /// The output is always a fresh tree; the aligned inputs are only read.
    fn annotate(&self, aligned: &AlignedPair<'_>) -> Element;

    /// Get the style this annotator renders.
    fn style(&self) -> DisplayStyle;
}

/// Create an annotator for the given style
#[must_use]
pub fn create_annotator(style: DisplayStyle) -> Box<dyn DiffAnnotator> {
    match style {
        DisplayStyle::Legacy => Box::new(LegacyAnnotator::new()),
        DisplayStyle::Hint => Box::new(HintAnnotator::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_style_default_is_legacy() {
        assert_eq!(DisplayStyle::default(), DisplayStyle::Legacy);
    }

    #[test]
    fn test_display_style_parse() {
        assert_eq!(DisplayStyle::parse("legacy"), Some(DisplayStyle::Legacy));
        assert_eq!(DisplayStyle::parse("hint"), Some(DisplayStyle::Hint));
        assert_eq!(DisplayStyle::parse("HINT"), Some(DisplayStyle::Hint));
        assert_eq!(DisplayStyle::parse("merged"), None);
    }

    #[test]
    fn test_display_style_round_trips_through_display() {
        for style in [DisplayStyle::Legacy, DisplayStyle::Hint] {
            assert_eq!(DisplayStyle::parse(&style.to_string()), Some(style));
        }
    }

    #[test]
    fn test_factory_returns_matching_style() {
        assert_eq!(
            create_annotator(DisplayStyle::Legacy).style(),
            DisplayStyle::Legacy
        );
        assert_eq!(
            create_annotator(DisplayStyle::Hint).style(),
            DisplayStyle::Hint
        );
    }
}
