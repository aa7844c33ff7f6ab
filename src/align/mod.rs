//! Tree alignment between two document versions.
//!
//! Pairs up nodes of the old and new trees tag-by-tag, preferring the
//! configured identity attribute over positional order, and classifies every
//! pair as added, removed, changed, or unchanged. Alignment never mutates its
//! inputs; the result borrows both trees.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;

use crate::error::{DocDiffError, Result};
use crate::model::{Element, NodePath};

/// Attribute consulted for identity matching unless overridden.
pub const DEFAULT_IDENTITY_ATTRIBUTE: &str = "key";

/// Classification of one aligned node pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Present in both versions with identical text, attributes, and
    /// descendants.
    Unchanged,
    /// Present in both versions but differing in text, attributes, or any
    /// descendant.
    Changed,
    /// Present only in the new version.
    Added,
    /// Present only in the old version.
    Removed,
}

impl ChangeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Changed => "changed",
            Self::Added => "added",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One matched node pair in the aligned tree.
///
/// At least one side is always present: matched pairs carry both, added
/// pairs only `new`, removed pairs only `old`. Children are ordered by
/// new-side document position, with removed pairs re-inserted at the
/// position their node held in the old child list.
#[derive(Debug)]
pub struct AlignedPair<'a> {
    pub old: Option<&'a Element>,
    pub new: Option<&'a Element>,
    pub kind: ChangeKind,
    pub children: Vec<AlignedPair<'a>>,
}

impl<'a> AlignedPair<'a> {
    /// Tag name of the pair, taken from whichever side is present.
    #[must_use]
    pub fn tag(&self) -> &'a str {
        match (self.new, self.old) {
            (Some(el), _) | (None, Some(el)) => el.tag.as_str(),
            (None, None) => "",
        }
    }

    /// Whether the node's own text or attribute mapping differs between the
    /// two sides. False for added and removed pairs.
    #[must_use]
    pub fn own_values_differ(&self) -> bool {
        match (self.old, self.new) {
            (Some(old), Some(new)) => values_differ(old, new),
            _ => false,
        }
    }

    /// The old-side text when this pair's own text changed.
    #[must_use]
    pub fn previous_text(&self) -> Option<&'a str> {
        match (self.old, self.new) {
            (Some(old), Some(new)) if text_of(old) != text_of(new) => Some(text_of(old)),
            _ => None,
        }
    }

    /// Whether either side carries an unresolved mapset code.
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        self.old.is_some_and(|el| el.unresolved) || self.new.is_some_and(|el| el.unresolved)
    }

    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.kind != ChangeKind::Unchanged
    }
}

fn text_of(el: &Element) -> &str {
    el.text.as_deref().unwrap_or("")
}

fn values_differ(old: &Element, new: &Element) -> bool {
    text_of(old) != text_of(new) || old.attrs != new.attrs
}

/// Children of one parent, grouped by tag with their document positions.
#[derive(Default)]
struct TagGroup<'a> {
    old: Vec<(usize, &'a Element)>,
    new: Vec<(usize, &'a Element)>,
}

/// Aligns two element trees into a tree of classified pairs.
pub struct TreeAligner {
    identity_attr: String,
}

impl TreeAligner {
    /// Create an aligner using the default identity attribute.
    pub fn new() -> Self {
        Self {
            identity_attr: DEFAULT_IDENTITY_ATTRIBUTE.to_string(),
        }
    }

    /// Use a different attribute for identity matching.
    pub fn with_identity_attribute(mut self, name: impl Into<String>) -> Self {
        self.identity_attr = name.into();
        self
    }

    /// Get the configured identity attribute name.
    pub fn identity_attribute(&self) -> &str {
        &self.identity_attr
    }

    /// Align two trees rooted at the same tag.
    ///
    /// Fails if the root tags differ, or if a same-tag sibling group uses the
    /// identity attribute ambiguously (duplicate values, or present on some
    /// members and missing on others).
    pub fn align<'a>(&self, old_root: &'a Element, new_root: &'a Element) -> Result<AlignedPair<'a>> {
        if old_root.tag != new_root.tag {
            return Err(DocDiffError::align(
                "aligning document roots",
                crate::error::AlignErrorKind::TagMismatch {
                    old: old_root.tag.clone(),
                    new: new_root.tag.clone(),
                },
            ));
        }
        let path = NodePath::root(&new_root.tag);
        self.align_matched(old_root, new_root, &path)
    }

    fn align_matched<'a>(
        &self,
        old: &'a Element,
        new: &'a Element,
        path: &NodePath,
    ) -> Result<AlignedPair<'a>> {
        let children = self.align_children(old, new, path)?;
        let kind = if values_differ(old, new) || children.iter().any(AlignedPair::has_changes) {
            ChangeKind::Changed
        } else {
            ChangeKind::Unchanged
        };
        Ok(AlignedPair {
            old: Some(old),
            new: Some(new),
            kind,
            children,
        })
    }

    fn align_children<'a>(
        &self,
        old: &'a Element,
        new: &'a Element,
        path: &NodePath,
    ) -> Result<Vec<AlignedPair<'a>>> {
        let mut groups: IndexMap<&str, TagGroup<'a>> = IndexMap::new();
        for (idx, child) in old.children.iter().enumerate() {
            groups.entry(child.tag.as_str()).or_default().old.push((idx, child));
        }
        for (idx, child) in new.children.iter().enumerate() {
            groups.entry(child.tag.as_str()).or_default().new.push((idx, child));
        }

        // Pairs with a new-side node keep that node's document position;
        // removed pairs remember where their node sat in the old child list.
        let mut present: Vec<(usize, AlignedPair<'a>)> = Vec::new();
        let mut removed: Vec<(usize, AlignedPair<'a>)> = Vec::new();

        for (tag, group) in &groups {
            self.align_group(tag, group, path, &mut present, &mut removed)?;
        }

        present.sort_by_key(|(new_idx, _)| *new_idx);
        let mut children: Vec<AlignedPair<'a>> = present.into_iter().map(|(_, pair)| pair).collect();
        removed.sort_by_key(|(old_idx, _)| *old_idx);
        for (old_idx, pair) in removed {
            let at = old_idx.min(children.len());
            children.insert(at, pair);
        }
        Ok(children)
    }

    fn align_group<'a>(
        &self,
        tag: &str,
        group: &TagGroup<'a>,
        parent: &NodePath,
        present: &mut Vec<(usize, AlignedPair<'a>)>,
        removed: &mut Vec<(usize, AlignedPair<'a>)>,
    ) -> Result<()> {
        let any_identity = group
            .old
            .iter()
            .chain(group.new.iter())
            .any(|(_, el)| el.attr(&self.identity_attr).is_some());

        if any_identity {
            self.check_identity_integrity(tag, group, parent)?;
            self.align_group_by_identity(tag, group, parent, present, removed)
        } else {
            self.align_group_by_position(tag, group, parent, present, removed)
        }
    }

    /// Match group members sharing an identity value; the rest are surplus.
    fn align_group_by_identity<'a>(
        &self,
        tag: &str,
        group: &TagGroup<'a>,
        parent: &NodePath,
        present: &mut Vec<(usize, AlignedPair<'a>)>,
        removed: &mut Vec<(usize, AlignedPair<'a>)>,
    ) -> Result<()> {
        let old_by_key: IndexMap<&str, &'a Element> = group
            .old
            .iter()
            .map(|(_, el)| (el.attr(&self.identity_attr).unwrap_or(""), *el))
            .collect();

        let mut matched_keys: HashSet<&str> = HashSet::new();
        for (ordinal, (new_idx, new_el)) in group.new.iter().enumerate() {
            let key = new_el.attr(&self.identity_attr).unwrap_or("");
            match old_by_key.get(key) {
                Some(old_el) => {
                    matched_keys.insert(key);
                    let child_path = parent.with_segment(tag, ordinal + 1);
                    present.push((*new_idx, self.align_matched(old_el, new_el, &child_path)?));
                }
                None => present.push((*new_idx, added_subtree(new_el))),
            }
        }
        for (old_idx, old_el) in &group.old {
            let key = old_el.attr(&self.identity_attr).unwrap_or("");
            if !matched_keys.contains(key) {
                removed.push((*old_idx, removed_subtree(old_el)));
            }
        }
        Ok(())
    }

    /// Zip group members in document order; the longer side's tail is surplus.
    fn align_group_by_position<'a>(
        &self,
        tag: &str,
        group: &TagGroup<'a>,
        parent: &NodePath,
        present: &mut Vec<(usize, AlignedPair<'a>)>,
        removed: &mut Vec<(usize, AlignedPair<'a>)>,
    ) -> Result<()> {
        let matched = group.old.len().min(group.new.len());
        for position in 0..matched {
            let (_, old_el) = group.old[position];
            let (new_idx, new_el) = group.new[position];
            let child_path = parent.with_segment(tag, position + 1);
            present.push((new_idx, self.align_matched(old_el, new_el, &child_path)?));
        }
        for (old_idx, old_el) in group.old.iter().skip(matched) {
            removed.push((*old_idx, removed_subtree(old_el)));
        }
        for (new_idx, new_el) in group.new.iter().skip(matched) {
            present.push((*new_idx, added_subtree(new_el)));
        }
        Ok(())
    }

    /// A group that uses the identity attribute must use it coherently:
    /// every member keyed, every key unique within its side.
    fn check_identity_integrity(
        &self,
        tag: &str,
        group: &TagGroup<'_>,
        parent: &NodePath,
    ) -> Result<()> {
        for (side, members) in [("old", &group.old), ("new", &group.new)] {
            let mut seen: HashSet<&str> = HashSet::new();
            for (position, (_, el)) in members.iter().enumerate() {
                match el.attr(&self.identity_attr) {
                    Some(value) => {
                        if !seen.insert(value) {
                            return Err(DocDiffError::structural_cardinality(
                                parent.to_string(),
                                format!(
                                    "duplicate identity value '{value}' among <{tag}> siblings \
                                     in the {side} version"
                                ),
                            ));
                        }
                    }
                    None => {
                        return Err(DocDiffError::structural_cardinality(
                            parent.to_string(),
                            format!(
                                "<{tag}> sibling {n} in the {side} version lacks the identity \
                                 attribute '{attr}' carried by other members of its group",
                                n = position + 1,
                                attr = self.identity_attr,
                            ),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for TreeAligner {
    fn default() -> Self {
        Self::new()
    }
}

fn added_subtree(el: &Element) -> AlignedPair<'_> {
    AlignedPair {
        old: None,
        new: Some(el),
        kind: ChangeKind::Added,
        children: el.children.iter().map(added_subtree).collect(),
    }
}

fn removed_subtree(el: &Element) -> AlignedPair<'_> {
    AlignedPair {
        old: Some(el),
        new: None,
        kind: ChangeKind::Removed,
        children: el.children.iter().map(removed_subtree).collect(),
    }
}
