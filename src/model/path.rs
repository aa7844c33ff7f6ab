//! Paths addressing elements inside a document tree.

use std::fmt;

/// One step in a [`NodePath`]: a tag name plus the 1-based position among
/// same-tag siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    pub tag: String,
    pub ordinal: usize,
}

/// Location of an element within a document tree.
///
/// Displays as `/order/items/item[2]`; the ordinal is omitted when it is 1.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

impl NodePath {
    /// Path consisting of just the root element
    #[must_use]
    pub fn root(tag: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment {
                tag: tag.into(),
                ordinal: 1,
            }],
        }
    }

    /// Extended copy with one more segment
    #[must_use]
    pub fn with_segment(&self, tag: impl Into<String>, ordinal: usize) -> Self {
        let mut next = self.clone();
        next.segments.push(PathSegment {
            tag: tag.into(),
            ordinal,
        });
        next
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for seg in &self.segments {
            if seg.ordinal > 1 {
                write!(f, "/{}[{}]", seg.tag, seg.ordinal)?;
            } else {
                write!(f, "/{}", seg.tag)?;
            }
        }
        Ok(())
    }
}
