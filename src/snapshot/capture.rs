//! Build a [`SnapshotTree`] from a JSON DOM capture.
//!
//! The capture is produced in the browser by walking the exported subtree and
//! recording each element's bounding rectangle and computed style. Children
//! are an ordered mix of text runs and nested elements:
//!
//! ```json
//! { "tag": "div", "classes": ["card"],
//!   "rect": { "x": 0, "y": 0, "width": 320, "height": 120 },
//!   "style": { "background-color": "rgb(243, 244, 246)" },
//!   "children": ["Revenue ", { "tag": "b", "rect": { ... }, "children": ["42"] }] }
//! ```

use super::{NodeSpec, SnapshotTree, StyleBundle, TreeBuilder};
use crate::geometry::Rect;
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Raw element as serialized by the capture script.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    pub tag: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub rect: Rect,
    /// Computed style keyed by CSS property name.
    #[serde(default)]
    pub style: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<RawChild>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawChild {
    Text(String),
    Element(RawNode),
}

impl RawNode {
    fn to_node_spec(&self) -> NodeSpec {
        let mut classes = self.classes.clone();
        if classes.is_empty() {
            if let Some(class_attr) = self.attributes.get("class") {
                classes = class_attr.split_whitespace().map(str::to_string).collect();
            }
        }
        NodeSpec {
            tag: self.tag.to_ascii_lowercase(),
            classes,
            attributes: self.attributes.clone(),
            rect: self.rect,
            style: StyleBundle::from_declarations(
                self.style.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            ),
        }
    }
}

/// Parse a JSON capture whose top-level object is the capture root.
pub fn from_json(json: &str, excluded_class: &str) -> Result<SnapshotTree> {
    let root: RawNode = serde_json::from_str(json)
        .map_err(|e| Error::CaptureError(format!("invalid capture JSON: {}", e)))?;
    from_raw(&root, excluded_class)
}

/// Convert an already-deserialized capture.
pub fn from_raw(root: &RawNode, excluded_class: &str) -> Result<SnapshotTree> {
    let mut builder = TreeBuilder::new(excluded_class);
    // explicit stack instead of recursion; deep dashboards are common
    enum Step<'a> {
        Enter(&'a RawNode),
        Text(&'a str),
        Leave,
    }
    let mut stack = vec![Step::Enter(root)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(node) => {
                builder.open(node.to_node_spec())?;
                stack.push(Step::Leave);
                for child in node.children.iter().rev() {
                    stack.push(match child {
                        RawChild::Text(t) => Step::Text(t),
                        RawChild::Element(e) => Step::Enter(e),
                    });
                }
            }
            Step::Text(t) => builder.text(t),
            Step::Leave => builder.close()?,
        }
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    const CARD: &str = r##"{
        "tag": "DIV",
        "rect": { "x": 0, "y": 0, "width": 400, "height": 300 },
        "children": [
            { "tag": "div", "attributes": { "class": "card no-print" },
              "rect": { "x": 10, "y": 10, "width": 100, "height": 40 },
              "children": ["Hidden"] },
            { "tag": "div", "classes": ["card"],
              "rect": { "x": 10, "y": 60, "width": 200, "height": 80 },
              "style": { "background-color": "rgb(243, 244, 246)", "border-left-width": "4px",
                         "border-left-color": "#3b82f6" },
              "children": ["Info1 ", { "tag": "span", "rect": { "x": 20, "y": 70, "width": 30, "height": 10 },
                                       "children": ["x"] }] }
        ]
    }"##;

    #[test]
    fn capture_builds_tree() {
        let tree = from_json(CARD, "no-print").unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.root().tag, "div");
        assert!(tree.get(1).excluded);
        assert_eq!(tree.get(1).classes, vec!["card", "no-print"]);
        let card = tree.get(2);
        assert_eq!(card.text, "Info1 x");
        assert_eq!(card.own_text, "Info1");
        assert_eq!(card.style.background, Color::Rgb(243, 244, 246));
        assert_eq!(card.style.border.left.width, 4.0);
        assert_eq!(tree.get(3).parent, Some(2));
    }

    #[test]
    fn invalid_json_is_a_capture_error() {
        match from_json("{\"tag\": 3}", "no-print") {
            Err(Error::CaptureError(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
