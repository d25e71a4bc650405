//! Traversal-order identifiers for one export run.
//!
//! Identifiers live in a side table keyed by [`NodeIndex`]; the snapshot tree
//! itself is never annotated. Each identifier also records the last
//! identifier of its subtree, so "is a descendant of" and "descendants in
//! document order" are constant-time range checks.

use crate::snapshot::{NodeIndex, SnapshotTree};
use serde::Serialize;
use std::fmt;

/// Document-order identifier, rendered as `el-<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el-{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct IdentityTable {
    ids: Vec<ElementId>,
    subtree_end: Vec<ElementId>,
    order: Vec<NodeIndex>,
}

impl IdentityTable {
    /// Assign identifiers to every element of `tree` in a single pre-order pass.
    pub fn tag(tree: &SnapshotTree) -> Self {
        let n = tree.len();
        let mut ids = vec![ElementId(0); n];
        let mut subtree_end = vec![ElementId(0); n];
        let mut order = Vec::with_capacity(n);

        // (node, children visited)
        let mut stack: Vec<(NodeIndex, bool)> = vec![(SnapshotTree::ROOT, false)];
        while let Some((idx, visited)) = stack.pop() {
            if visited {
                subtree_end[idx] = ElementId(order.len() as u32 - 1);
                continue;
            }
            ids[idx] = ElementId(order.len() as u32);
            order.push(idx);
            stack.push((idx, true));
            for &child in tree.get(idx).children.iter().rev() {
                stack.push((child, false));
            }
        }

        log::debug!("tagged {} elements", order.len());
        Self { ids, subtree_end, order }
    }

    pub fn id(&self, idx: NodeIndex) -> ElementId {
        self.ids[idx]
    }

    pub fn node(&self, id: ElementId) -> NodeIndex {
        self.order[id.0 as usize]
    }

    /// Elements in document order.
    pub fn order(&self) -> &[NodeIndex] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Strict descendant test.
    pub fn is_descendant(&self, ancestor: NodeIndex, node: NodeIndex) -> bool {
        let id = self.ids[node];
        id > self.ids[ancestor] && id <= self.subtree_end[ancestor]
    }

    /// Strict descendants of `idx` in document order.
    pub fn descendants(&self, idx: NodeIndex) -> &[NodeIndex] {
        let start = self.ids[idx].0 as usize + 1;
        let end = self.subtree_end[idx].0 as usize + 1;
        &self.order[start..end]
    }
}
