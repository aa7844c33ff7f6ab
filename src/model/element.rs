//! Element tree representation of document state.

use indexmap::IndexMap;
use xxhash_rust::xxh3::xxh3_64;

/// One element of hierarchical document state.
///
/// Attributes keep document order for display, but equality between two
/// attribute maps ignores order (an `IndexMap` guarantee). The `descriptor`
/// and `unresolved` fields are never populated by the parser: a schema
/// module binds descriptors onto a loaded tree, and the materializer marks
/// `unresolved` on its own owned copies only.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name
    pub tag: String,
    /// Attribute name → value, unique keys, document order preserved
    pub attrs: IndexMap<String, String>,
    /// Child elements in document order
    pub children: Vec<Element>,
    /// Direct text content, trimmed; `None` when absent or whitespace-only
    pub text: Option<String>,
    /// Schema type descriptor this element is bound to
    pub descriptor: Option<String>,
    /// Set when a mapset lookup failed for this element's value
    pub unresolved: bool,
}

impl Element {
    /// Create an empty element with the given tag
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: IndexMap::new(),
            children: Vec::new(),
            text: None,
            descriptor: None,
            unresolved: false,
        }
    }

    /// Create an element carrying a text value
    #[must_use]
    pub fn with_text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        let mut el = Self::new(tag);
        el.text = Some(text.into());
        el
    }

    /// Builder-style attribute insertion
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Builder-style child insertion
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Look up an attribute value
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Insert or replace an attribute
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// Append a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// First child with the given tag
    #[must_use]
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Total number of elements in this subtree, including self
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Element::node_count).sum::<usize>()
    }

    /// Content hash over tag, attributes, text and descendants.
    ///
    /// Attribute order does not affect the hash, matching map equality.
    /// Used for log-line identity and test assertions, never to short-cut
    /// a comparison.
    #[must_use]
    pub fn content_hash(&self) -> u64 {
        let mut buf = Vec::new();
        self.hash_into(&mut buf);
        xxh3_64(&buf)
    }

    fn hash_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.tag.as_bytes());
        buf.push(0);

        let mut attrs: Vec<_> = self.attrs.iter().collect();
        attrs.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in attrs {
            buf.extend_from_slice(name.as_bytes());
            buf.push(b'=');
            buf.extend_from_slice(value.as_bytes());
            buf.push(0);
        }
        buf.push(0);

        if let Some(text) = &self.text {
            buf.extend_from_slice(text.as_bytes());
        }
        buf.push(0);

        for child in &self.children {
            child.hash_into(buf);
        }
        buf.push(1);
    }
}
