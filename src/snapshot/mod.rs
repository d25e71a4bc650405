//! Immutable element snapshots captured once per export.
//!
//! A [`SnapshotTree`] is an arena of [`ElementSnapshot`] records built in one
//! upfront traversal of the captured DOM. Every later pass reads from it and
//! never mutates it; passes refer to elements by [`NodeIndex`].

pub mod capture;
#[cfg(feature = "html")]
pub mod html;
pub mod style;

use crate::geometry::Rect;
use crate::{Error, Result};
use std::collections::BTreeMap;

pub use style::{BorderSide, Side, Sides, StyleBundle, TextAlign};

/// Position of an element in its tree's arena.
pub type NodeIndex = usize;

/// Geometry, text and computed style of one element at export time.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSnapshot {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    /// Whitespace-collapsed text of the whole subtree.
    pub text: String,
    /// Whitespace-collapsed text of the element's direct text nodes.
    pub own_text: String,
    pub rect: Rect,
    pub style: StyleBundle,
    /// Inside (or itself) a region marked as excluded from export.
    pub excluded: bool,
    /// Raster replacement installed by the preview path.
    pub image: Option<String>,
    pub parent: Option<NodeIndex>,
    pub children: Vec<NodeIndex>,
}

impl ElementSnapshot {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Arena of element snapshots; index 0 is the capture root.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotTree {
    nodes: Vec<ElementSnapshot>,
}

impl SnapshotTree {
    pub const ROOT: NodeIndex = 0;

    pub fn root(&self) -> &ElementSnapshot {
        &self.nodes[Self::ROOT]
    }

    pub fn get(&self, idx: NodeIndex) -> &ElementSnapshot {
        &self.nodes[idx]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &ElementSnapshot)> {
        self.nodes.iter().enumerate()
    }

    /// Ancestors of `idx`, nearest first.
    pub fn ancestors(&self, idx: NodeIndex) -> Ancestors<'_> {
        Ancestors { tree: self, next: self.nodes[idx].parent }
    }

    /// Nesting depth below the root (root is 0).
    pub fn depth(&self, idx: NodeIndex) -> usize {
        self.ancestors(idx).count()
    }

    /// Copy of the tree with excluded subtrees removed. The returned vector
    /// maps each new index to the index it was copied from.
    pub fn detached_clone(&self) -> (SnapshotTree, Vec<NodeIndex>) {
        let mut nodes: Vec<ElementSnapshot> = Vec::with_capacity(self.nodes.len());
        let mut origin = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeIndex, Option<NodeIndex>)> = vec![(Self::ROOT, None)];
        while let Some((idx, parent)) = stack.pop() {
            let src = &self.nodes[idx];
            if src.excluded && parent.is_some() {
                continue;
            }
            let new_idx = nodes.len();
            let mut copy = src.clone();
            copy.parent = parent;
            copy.children = Vec::new();
            nodes.push(copy);
            origin.push(idx);
            if let Some(p) = parent {
                nodes[p].children.push(new_idx);
            }
            for &child in src.children.iter().rev() {
                stack.push((child, Some(new_idx)));
            }
        }
        (SnapshotTree { nodes }, origin)
    }

    /// Replace the subtree under `idx` with a raster image. Only meaningful
    /// on a detached clone.
    pub fn replace_with_image(&mut self, idx: NodeIndex, data_uri: String) {
        let node = &mut self.nodes[idx];
        node.children.clear();
        node.image = Some(data_uri);
    }
}

pub struct Ancestors<'a> {
    tree: &'a SnapshotTree,
    next: Option<NodeIndex>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        let cur = self.next?;
        self.next = self.tree.nodes[cur].parent;
        Some(cur)
    }
}

/// Attributes of an element as presented to [`TreeBuilder::open`].
#[derive(Debug, Clone, Default)]
pub struct NodeSpec {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub rect: Rect,
    pub style: StyleBundle,
}

/// Builds a [`SnapshotTree`] from a depth-first walk of some DOM source.
///
/// Callers `open` an element, feed its text runs with `text`, recurse into
/// children, then `close` it.
pub struct TreeBuilder {
    nodes: Vec<ElementSnapshot>,
    raw_text: Vec<String>,
    raw_own: Vec<String>,
    stack: Vec<NodeIndex>,
    excluded_class: String,
}

impl TreeBuilder {
    pub fn new(excluded_class: impl Into<String>) -> Self {
        Self {
            nodes: Vec::new(),
            raw_text: Vec::new(),
            raw_own: Vec::new(),
            stack: Vec::new(),
            excluded_class: excluded_class.into(),
        }
    }

    pub fn open(&mut self, spec: NodeSpec) -> Result<NodeIndex> {
        let parent = self.stack.last().copied();
        if parent.is_none() && !self.nodes.is_empty() {
            return Err(Error::CaptureError("capture has more than one root".into()));
        }
        let excluded = parent.is_some_and(|p| self.nodes[p].excluded)
            || spec.classes.iter().any(|c| *c == self.excluded_class);
        let idx = self.nodes.len();
        self.nodes.push(ElementSnapshot {
            tag: spec.tag,
            classes: spec.classes,
            attributes: spec.attributes,
            text: String::new(),
            own_text: String::new(),
            rect: spec.rect,
            style: spec.style,
            excluded,
            image: None,
            parent,
            children: Vec::new(),
        });
        self.raw_text.push(String::new());
        self.raw_own.push(String::new());
        if let Some(p) = parent {
            self.nodes[p].children.push(idx);
            // element boundaries separate words in the ancestors' text
            self.push_open_text(" ");
        }
        self.stack.push(idx);
        Ok(idx)
    }

    pub fn text(&mut self, run: &str) {
        if let Some(&top) = self.stack.last() {
            self.raw_own[top].push_str(run);
            self.push_open_text(run);
        }
    }

    pub fn close(&mut self) -> Result<()> {
        let idx = self
            .stack
            .pop()
            .ok_or_else(|| Error::CaptureError("unbalanced close".into()))?;
        self.nodes[idx].text = collapse_whitespace(&self.raw_text[idx]);
        self.nodes[idx].own_text = collapse_whitespace(&self.raw_own[idx]);
        self.push_open_text(" ");
        Ok(())
    }

    pub fn finish(self) -> Result<SnapshotTree> {
        if !self.stack.is_empty() {
            return Err(Error::CaptureError(format!("{} elements left open", self.stack.len())));
        }
        if self.nodes.is_empty() {
            return Err(Error::CaptureError("capture contains no elements".into()));
        }
        Ok(SnapshotTree { nodes: self.nodes })
    }

    // Text inside an excluded region never reaches exported ancestors.
    fn push_open_text(&mut self, run: &str) {
        let top_excluded = self.stack.last().is_some_and(|&t| self.nodes[t].excluded);
        for &idx in &self.stack {
            if !top_excluded || self.nodes[idx].excluded {
                self.raw_text[idx].push_str(run);
            }
        }
    }
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
