//! Resolve each distinct visible text string to the single deepest element
//! that should carry it on the slide.
//!
//! Wrapper elements repeat the text of their children, so naively emitting
//! every element's text duplicates it once per nesting level. The pass walks
//! elements in document order and, for each unclaimed string, searches for
//! the first element at or after the current one whose text contains the
//! string while none of its descendants do. That element owns the string.
//!
//! Invariants: a string has at most one owner and an element owns at most one
//! string. Strings with no qualifying owner are dropped.

use crate::identity::{ElementId, IdentityTable};
use crate::snapshot::{NodeIndex, SnapshotTree};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A text string and the element that owns it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextClaim {
    pub text: String,
    pub owner: NodeIndex,
    pub id: ElementId,
}

#[derive(Debug, Clone, Default)]
pub struct TextClaims {
    claims: Vec<TextClaim>,
    by_owner: HashMap<NodeIndex, usize>,
}

impl TextClaims {
    pub fn claims(&self) -> &[TextClaim] {
        &self.claims
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn for_owner(&self, owner: NodeIndex) -> Option<&TextClaim> {
        self.by_owner.get(&owner).map(|&i| &self.claims[i])
    }

    pub fn owner_of(&self, text: &str) -> Option<NodeIndex> {
        self.claims.iter().find(|c| c.text == text).map(|c| c.owner)
    }

    fn is_owner(&self, idx: NodeIndex) -> bool {
        self.by_owner.contains_key(&idx)
    }

    fn push(&mut self, claim: TextClaim) {
        self.by_owner.insert(claim.owner, self.claims.len());
        self.claims.push(claim);
    }
}

/// Run the pass over `tree`. `ids` must come from [`IdentityTable::tag`] on
/// the same tree.
pub fn resolve(tree: &SnapshotTree, ids: &IdentityTable) -> TextClaims {
    let mut claims = TextClaims::default();
    let mut seen: HashSet<String> = HashSet::new();

    for &idx in ids.order() {
        let el = tree.get(idx);
        if el.excluded {
            continue;
        }
        let text = el.text.trim();
        if text.is_empty() || seen.contains(text) {
            continue;
        }
        // already emitted as part of an ancestor's claim
        if tree.ancestors(idx).any(|a| claims.is_owner(a)) {
            continue;
        }
        // layout containers split their text across children, each of
        // which is resolved on its own
        if is_layout_container(tree, idx) {
            continue;
        }

        match find_owner(tree, ids, idx, text, &claims) {
            // a wrapper around a container: the children claim the parts
            Some(owner) if is_layout_container(tree, owner) => {}
            Some(owner) => {
                seen.insert(text.to_string());
                claims.push(TextClaim {
                    text: text.to_string(),
                    owner,
                    id: ids.id(owner),
                });
            }
            None => {
                seen.insert(text.to_string());
                log::debug!("dropping text {:?} from {}: no unique owner", text, ids.id(idx));
            }
        }
    }
    claims
}

fn find_owner(
    tree: &SnapshotTree,
    ids: &IdentityTable,
    origin: NodeIndex,
    text: &str,
    claims: &TextClaims,
) -> Option<NodeIndex> {
    let origin_id = ids.id(origin);
    ids.order().iter().copied().find(|&cand| {
        let el = tree.get(cand);
        if el.excluded || ids.id(cand) < origin_id || claims.is_owner(cand) {
            return false;
        }
        if !el.text.contains(text) {
            return false;
        }
        // the text must terminate here: no descendant could take it instead
        !ids
            .descendants(cand)
            .iter()
            .any(|&d| !tree.get(d).excluded && tree.get(d).text.contains(text))
    })
}

/// No direct text and more than one child carrying text.
fn is_layout_container(tree: &SnapshotTree, idx: NodeIndex) -> bool {
    let el = tree.get(idx);
    el.own_text.is_empty()
        && el
            .children
            .iter()
            .filter(|&&c| {
                let child = tree.get(c);
                !child.excluded && !child.text.is_empty()
            })
            .count()
            > 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::snapshot::tests::node_spec;
    use crate::snapshot::TreeBuilder;

    fn resolve_tree(tree: &SnapshotTree) -> TextClaims {
        resolve(tree, &IdentityTable::tag(tree))
    }

    fn el(b: &mut TreeBuilder, tag: &str, text: Option<&str>) {
        b.open(node_spec(tag, &[], Rect::default())).unwrap();
        if let Some(t) = text {
            b.text(t);
        }
    }

    #[test]
    fn wrapper_text_moves_to_deepest_element() {
        // root > card > wrapper > p "Info1"
        let mut b = TreeBuilder::new("no-print");
        el(&mut b, "root", None);
        el(&mut b, "card", None);
        el(&mut b, "wrapper", None);
        el(&mut b, "p", Some("Info1"));
        for _ in 0..4 {
            b.close().unwrap();
        }
        let tree = b.finish().unwrap();
        let claims = resolve_tree(&tree);
        assert_eq!(claims.len(), 1);
        assert_eq!(claims.claims()[0].text, "Info1");
        assert_eq!(tree.get(claims.claims()[0].owner).tag, "p");
        assert_eq!(claims.claims()[0].id, ElementId(3));
    }

    #[test]
    fn containers_resolve_each_child() {
        // root > card > (h2 "Title", div "Body one", div "Body two")
        let mut b = TreeBuilder::new("no-print");
        el(&mut b, "root", None);
        el(&mut b, "card", None);
        for (tag, t) in [("h2", "Title"), ("div", "Body one"), ("div", "Body two")] {
            el(&mut b, tag, Some(t));
            b.close().unwrap();
        }
        b.close().unwrap();
        b.close().unwrap();
        let tree = b.finish().unwrap();
        let claims = resolve_tree(&tree);
        let texts: Vec<&str> = claims.claims().iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Title", "Body one", "Body two"]);
    }

    #[test]
    fn inline_children_stay_with_their_paragraph() {
        // p "Hello " > b "world"
        let mut b = TreeBuilder::new("no-print");
        el(&mut b, "p", Some("Hello "));
        el(&mut b, "b", Some("world"));
        b.close().unwrap();
        b.close().unwrap();
        let tree = b.finish().unwrap();
        let claims = resolve_tree(&tree);
        assert_eq!(claims.len(), 1);
        assert_eq!(claims.claims()[0].text, "Hello world");
        assert_eq!(claims.claims()[0].owner, SnapshotTree::ROOT);
    }

    #[test]
    fn duplicate_strings_have_one_owner() {
        let mut b = TreeBuilder::new("no-print");
        el(&mut b, "root", None);
        el(&mut b, "a", Some("Total"));
        b.close().unwrap();
        el(&mut b, "b", Some("Total"));
        b.close().unwrap();
        b.close().unwrap();
        let tree = b.finish().unwrap();
        let claims = resolve_tree(&tree);
        assert_eq!(claims.len(), 1);
        assert_eq!(tree.get(claims.owner_of("Total").unwrap()).tag, "a");
    }

    #[test]
    fn excluded_text_is_never_claimed() {
        let mut b = TreeBuilder::new("no-print");
        el(&mut b, "root", None);
        b.open(node_spec("button", &["no-print"], Rect::default())).unwrap();
        b.text("Download");
        b.close().unwrap();
        el(&mut b, "p", Some("Kept"));
        b.close().unwrap();
        b.close().unwrap();
        let tree = b.finish().unwrap();
        let claims = resolve_tree(&tree);
        assert_eq!(claims.len(), 1);
        assert_eq!(claims.claims()[0].text, "Kept");
        assert!(claims.owner_of("Download").is_none());
    }

    #[test]
    fn owners_are_unique() {
        let mut b = TreeBuilder::new("no-print");
        el(&mut b, "root", None);
        for t in ["A", "B", "A", "C", "B"] {
            el(&mut b, "div", None);
            el(&mut b, "span", Some(t));
            b.close().unwrap();
            b.close().unwrap();
        }
        b.close().unwrap();
        let tree = b.finish().unwrap();
        let claims = resolve_tree(&tree);
        let owners: HashSet<NodeIndex> = claims.claims().iter().map(|c| c.owner).collect();
        let texts: HashSet<&str> = claims.claims().iter().map(|c| c.text.as_str()).collect();
        assert_eq!(owners.len(), claims.len());
        assert_eq!(texts.len(), claims.len());
        assert_eq!(claims.len(), 3);
        for c in claims.claims() {
            assert_eq!(tree.get(c.owner).tag, "span");
        }
    }
}
