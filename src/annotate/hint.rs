//! New-shape output with per-node change metadata.

use crate::align::AlignedPair;
use crate::annotate::{
    DiffAnnotator, DisplayStyle, CHANGE_HINT_ATTR, PREVIOUS_ATTR_PREFIX, PREVIOUS_VALUE_ATTR,
    UNRESOLVED_ATTR,
};
use crate::model::Element;

/// Renders the new tree's shape with a `change-hint` on every node.
///
/// Structure is left untouched so a renderer can style nodes in place: no
/// wrapper children, no reshuffling beyond the placement of removed nodes,
/// which keep the old tree's shape since no new-side shape exists for them.
/// A node whose own text changed additionally carries the prior text in a
/// `previous-value` attribute; a changed or dropped attribute carries its
/// prior value in a `previous-`-prefixed attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct HintAnnotator;

impl HintAnnotator {
    /// Create a new hint annotator.
    pub fn new() -> Self {
        Self
    }
}

impl DiffAnnotator for HintAnnotator {
    fn annotate(&self, aligned: &AlignedPair<'_>) -> Element {
        render(aligned).unwrap_or_else(|| Element::new(""))
    }

    fn style(&self) -> DisplayStyle {
        DisplayStyle::Hint
    }
}

fn render(pair: &AlignedPair<'_>) -> Option<Element> {
    let source = pair.new.or(pair.old)?;
    let mut out = Element::new(&source.tag);
    out.attrs = source.attrs.clone();
    out.text = source.text.clone();
    out.set_attr(CHANGE_HINT_ATTR, pair.kind.as_str());
    if let Some(prior) = pair.previous_text() {
        out.set_attr(PREVIOUS_VALUE_ATTR, prior);
    }
    if let (Some(old), Some(new)) = (pair.old, pair.new) {
        for (name, old_value) in &old.attrs {
            if new.attrs.get(name) != Some(old_value) {
                out.set_attr(format!("{PREVIOUS_ATTR_PREFIX}{name}"), old_value);
            }
        }
    }
    if pair.is_unresolved() {
        out.set_attr(UNRESOLVED_ATTR, "true");
    }
    for child in &pair.children {
        if let Some(rendered) = render(child) {
            out.add_child(rendered);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::TreeAligner;

    fn annotate(old: &Element, new: &Element) -> Element {
        let aligned = TreeAligner::new().align(old, new).expect("trees align");
        HintAnnotator::new().annotate(&aligned)
    }

    #[test]
    fn test_every_node_carries_a_hint() {
        let doc = Element::new("order")
            .with_child(Element::with_text("status", "2"))
            .with_child(Element::new("items").with_child(Element::with_text("item", "first")));
        let out = annotate(&doc, &doc.clone());

        assert_eq!(out.attr(CHANGE_HINT_ATTR), Some("unchanged"));
        assert_eq!(out.children[0].attr(CHANGE_HINT_ATTR), Some("unchanged"));
        assert_eq!(
            out.children[1].children[0].attr(CHANGE_HINT_ATTR),
            Some("unchanged")
        );
    }

    #[test]
    fn test_text_change_keeps_shape_and_records_prior_value() {
        let old = Element::new("order").with_child(Element::with_text("status", "2"));
        let new = Element::new("order").with_child(Element::with_text("status", "5"));
        let out = annotate(&old, &new);

        assert_eq!(out.attr(CHANGE_HINT_ATTR), Some("changed"));
        assert_eq!(
            out.attr(PREVIOUS_VALUE_ATTR),
            None,
            "only the node whose own text changed records a prior value"
        );

        let status = &out.children[0];
        assert_eq!(status.attr(CHANGE_HINT_ATTR), Some("changed"));
        assert_eq!(status.text.as_deref(), Some("5"), "text shows the current value");
        assert_eq!(status.attr(PREVIOUS_VALUE_ATTR), Some("2"));
        assert!(status.children.is_empty(), "no wrapper children in hint output");
    }

    #[test]
    fn test_attribute_change_records_the_prior_value() {
        let mut old_status = Element::new("status");
        old_status.set_attr("code", "2");
        let mut new_status = Element::new("status");
        new_status.set_attr("code", "5");
        let old = Element::new("order").with_child(old_status);
        let new = Element::new("order").with_child(new_status);
        let out = annotate(&old, &new);

        let status = &out.children[0];
        assert_eq!(status.attr(CHANGE_HINT_ATTR), Some("changed"));
        assert_eq!(status.attr("code"), Some("5"), "current value stays in place");
        assert_eq!(status.attr("previous-code"), Some("2"));
        assert_eq!(
            status.attr(PREVIOUS_VALUE_ATTR),
            None,
            "previous-value is reserved for text changes"
        );
    }

    #[test]
    fn test_dropped_attribute_records_the_prior_value() {
        let mut old_item = Element::new("item");
        old_item.set_attr("qty", "4");
        let old = Element::new("order").with_child(old_item);
        let new = Element::new("order").with_child(Element::new("item"));
        let out = annotate(&old, &new);

        let item = &out.children[0];
        assert_eq!(item.attr(CHANGE_HINT_ATTR), Some("changed"));
        assert_eq!(item.attr("qty"), None);
        assert_eq!(item.attr("previous-qty"), Some("4"));
    }

    #[test]
    fn test_removed_node_falls_back_to_old_shape() {
        let old = Element::new("order")
            .with_child(Element::with_text("first", "1"))
            .with_child(
                Element::new("gone").with_child(Element::with_text("detail", "x")),
            )
            .with_child(Element::with_text("last", "3"));
        let new = Element::new("order")
            .with_child(Element::with_text("first", "1"))
            .with_child(Element::with_text("last", "3"));
        let out = annotate(&old, &new);

        let tags: Vec<&str> = out.children.iter().map(|el| el.tag.as_str()).collect();
        assert_eq!(tags, vec!["first", "gone", "last"]);

        let gone = &out.children[1];
        assert_eq!(gone.attr(CHANGE_HINT_ATTR), Some("removed"));
        assert_eq!(gone.children[0].attr(CHANGE_HINT_ATTR), Some("removed"));
        assert_eq!(gone.children[0].text.as_deref(), Some("x"));
    }

    #[test]
    fn test_added_subtree_is_hinted_throughout() {
        let old = Element::new("order");
        let new = Element::new("order").with_child(
            Element::new("items").with_child(Element::with_text("item", "first")),
        );
        let out = annotate(&old, &new);

        let items = &out.children[0];
        assert_eq!(items.attr(CHANGE_HINT_ATTR), Some("added"));
        assert_eq!(items.children[0].attr(CHANGE_HINT_ATTR), Some("added"));
    }

    #[test]
    fn test_unresolved_caveat_is_carried() {
        let mut status = Element::with_text("status", "99");
        status.unresolved = true;
        let old = Element::new("order").with_child(Element::with_text("status", "99"));
        let new = Element::new("order").with_child(status);
        let out = annotate(&old, &new);

        let status = &out.children[0];
        assert_eq!(status.attr(UNRESOLVED_ATTR), Some("true"));
        assert_eq!(status.attr(CHANGE_HINT_ATTR), Some("unchanged"));
    }
}
