//! Merged single-tree output, the backward-compatible shape.

use crate::align::{AlignedPair, ChangeKind};
use crate::annotate::{
    DiffAnnotator, DisplayStyle, CHANGE_ATTR, NEW_VALUE_TAG, OLD_VALUE_TAG, UNRESOLVED_ATTR,
};
use crate::model::Element;

/// Renders one merged tree in document order.
///
/// Removed nodes are woven back in at the position they held in the old
/// tree; added and removed subtrees carry the `change` attribute on every
/// node. A matched node is tagged `changed` only when its own text or
/// attributes differ; a changed text value is replaced by `old-value` and
/// `new-value` wrapper children so both versions are present in the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyAnnotator;

impl LegacyAnnotator {
    /// Create a new legacy annotator.
    pub fn new() -> Self {
        Self
    }
}

impl DiffAnnotator for LegacyAnnotator {
    fn annotate(&self, aligned: &AlignedPair<'_>) -> Element {
        render(aligned).unwrap_or_else(|| Element::new(""))
    }

    fn style(&self) -> DisplayStyle {
        DisplayStyle::Legacy
    }
}

fn render(pair: &AlignedPair<'_>) -> Option<Element> {
    match pair.kind {
        ChangeKind::Removed => pair.old.map(|el| marked_subtree(el, ChangeKind::Removed)),
        ChangeKind::Added => pair.new.map(|el| marked_subtree(el, ChangeKind::Added)),
        ChangeKind::Changed | ChangeKind::Unchanged => {
            let new = pair.new?;
            let mut out = Element::new(&new.tag);
            out.attrs = new.attrs.clone();
            if pair.own_values_differ() {
                out.set_attr(CHANGE_ATTR, ChangeKind::Changed.as_str());
            }
            if pair.is_unresolved() {
                out.set_attr(UNRESOLVED_ATTR, "true");
            }
            match pair.previous_text() {
                Some(prior) => {
                    out.add_child(value_wrapper(OLD_VALUE_TAG, prior));
                    out.add_child(value_wrapper(
                        NEW_VALUE_TAG,
                        new.text.as_deref().unwrap_or(""),
                    ));
                }
                None => out.text = new.text.clone(),
            }
            for child in &pair.children {
                if let Some(rendered) = render(child) {
                    out.add_child(rendered);
                }
            }
            Some(out)
        }
    }
}

fn value_wrapper(tag: &str, text: &str) -> Element {
    let mut wrapper = Element::new(tag);
    if !text.is_empty() {
        wrapper.text = Some(text.to_string());
    }
    wrapper
}

/// Copy a one-sided subtree, tagging every node with the same mark.
fn marked_subtree(el: &Element, kind: ChangeKind) -> Element {
    let mut out = Element::new(&el.tag);
    out.attrs = el.attrs.clone();
    out.text = el.text.clone();
    out.set_attr(CHANGE_ATTR, kind.as_str());
    if el.unresolved {
        out.set_attr(UNRESOLVED_ATTR, "true");
    }
    for child in &el.children {
        out.add_child(marked_subtree(child, kind));
    }
    out
}
