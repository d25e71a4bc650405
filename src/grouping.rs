//! Partition decorated containers into disjoint visual groups and assign
//! resolved text and chart elements to them.
//!
//! A container qualifies as a group anchor when it paints something: a fill,
//! a visible border or outline, or a shadow. Anchors are accepted in document
//! order and a later candidate whose rectangle touches an accepted anchor is
//! rejected, so nested decorated wrappers of one card yield one background.

use crate::geometry::Rect;
use crate::identity::{ElementId, IdentityTable};
use crate::snapshot::{NodeIndex, SnapshotTree};
use crate::text::TextClaims;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualGroup {
    pub anchor: NodeIndex,
    pub id: ElementId,
    /// Anchor rectangle in source pixels.
    pub rect: Rect,
    /// Indices into [`TextClaims::claims`].
    pub texts: Vec<usize>,
    pub charts: Vec<NodeIndex>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Grouping {
    pub groups: Vec<VisualGroup>,
    pub ungrouped_texts: Vec<usize>,
    pub ungrouped_charts: Vec<NodeIndex>,
}

impl Grouping {
    /// Group whose anchor fully contains `rect`.
    pub fn containing(&self, rect: &Rect) -> Option<usize> {
        self.groups.iter().position(|g| g.rect.contains(rect))
    }
}

/// Whether `idx` may anchor a group: not the capture root, not excluded,
/// has area, and paints something.
pub fn is_background_candidate(tree: &SnapshotTree, idx: NodeIndex) -> bool {
    let el = tree.get(idx);
    idx != SnapshotTree::ROOT && !el.excluded && !el.rect.is_empty() && el.style.is_decorated()
}

/// Build groups from background candidates, then distribute `claims` and
/// `charts` by full containment. Unassigned content is legal.
pub fn group(
    tree: &SnapshotTree,
    ids: &IdentityTable,
    claims: &TextClaims,
    charts: &[NodeIndex],
) -> Grouping {
    let mut grouping = Grouping::default();

    for &idx in ids.order() {
        if !is_background_candidate(tree, idx) {
            continue;
        }
        let rect = tree.get(idx).rect;
        if let Some(prev) = grouping.groups.iter().find(|g| g.rect.overlaps(&rect)) {
            log::debug!("{} overlaps group {}; not a separate background", ids.id(idx), prev.id);
            continue;
        }
        grouping.groups.push(VisualGroup {
            anchor: idx,
            id: ids.id(idx),
            rect,
            texts: Vec::new(),
            charts: Vec::new(),
        });
    }

    for (i, claim) in claims.claims().iter().enumerate() {
        match grouping.containing(&tree.get(claim.owner).rect) {
            Some(g) => grouping.groups[g].texts.push(i),
            None => grouping.ungrouped_texts.push(i),
        }
    }

    for &chart in charts {
        match grouping.containing(&tree.get(chart).rect) {
            Some(g) => grouping.groups[g].charts.push(chart),
            None => grouping.ungrouped_charts.push(chart),
        }
    }

    log::debug!(
        "{} groups, {} ungrouped texts, {} ungrouped charts",
        grouping.groups.len(),
        grouping.ungrouped_texts.len(),
        grouping.ungrouped_charts.len()
    );
    grouping
}
