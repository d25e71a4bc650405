//! Build a [`SnapshotTree`] from static HTML.
//!
//! There is no layout engine here: geometry comes from a `data-rect="x,y,w,h"`
//! attribute on each element (pixels), style from the inline `style`
//! attribute. This is how fixtures and server-rendered dashboards that carry
//! pre-measured boxes are fed to the converter.

use super::{NodeSpec, SnapshotTree, StyleBundle, TreeBuilder};
use crate::geometry::Rect;
use crate::{Error, Result};
use scraper::{ElementRef, Html, Node, Selector};

const SKIPPED_TAGS: [&str; 5] = ["script", "style", "head", "template", "noscript"];

/// Parse `html` and capture the subtree rooted at the first element matching
/// `root_selector` (default: `[data-capture-root]`, falling back to `body`).
pub fn from_html(html: &str, root_selector: Option<&str>, excluded_class: &str) -> Result<SnapshotTree> {
    let document = Html::parse_document(html);
    let root = find_root(&document, root_selector)?;
    capture_element(root, excluded_class)
}

fn find_root<'a>(document: &'a Html, root_selector: Option<&str>) -> Result<ElementRef<'a>> {
    let candidates: Vec<&str> = match root_selector {
        Some(sel) => vec![sel],
        None => vec!["[data-capture-root]", "body"],
    };
    for sel in candidates {
        let selector = Selector::parse(sel)
            .map_err(|_| Error::CaptureError(format!("invalid root selector '{}'", sel)))?;
        if let Some(el) = document.select(&selector).next() {
            return Ok(el);
        }
    }
    Err(Error::CaptureError("capture root not found".into()))
}

/// Capture `root` and its descendants.
pub fn capture_element(root: ElementRef<'_>, excluded_class: &str) -> Result<SnapshotTree> {
    enum Step<'a> {
        Enter(ElementRef<'a>),
        Text(&'a str),
        Leave,
    }

    let mut builder = TreeBuilder::new(excluded_class);
    // rects of the open elements; unmeasured elements inherit the nearest one
    let mut rects: Vec<Rect> = Vec::new();
    let mut stack = vec![Step::Enter(root)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(el) => {
                let spec = node_spec(el, rects.last().copied().unwrap_or_default());
                rects.push(spec.rect);
                builder.open(spec)?;
                stack.push(Step::Leave);
                for child in el.children().rev() {
                    match child.value() {
                        Node::Text(t) => stack.push(Step::Text(&**t)),
                        Node::Element(e) if SKIPPED_TAGS.contains(&e.name()) => {}
                        Node::Element(_) => {
                            if let Some(child_el) = ElementRef::wrap(child) {
                                stack.push(Step::Enter(child_el));
                            }
                        }
                        _ => {}
                    }
                }
            }
            Step::Text(t) => builder.text(t),
            Step::Leave => {
                rects.pop();
                builder.close()?;
            }
        }
    }
    builder.finish()
}

fn node_spec(el: ElementRef<'_>, inherited: Rect) -> NodeSpec {
    let value = el.value();
    let rect = value.attr("data-rect").and_then(parse_rect).unwrap_or(inherited);
    let style = value.attr("style").map(StyleBundle::from_inline).unwrap_or_default();
    NodeSpec {
        tag: value.name().to_string(),
        classes: value.classes().map(str::to_string).collect(),
        attributes: value.attrs().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        rect,
        style,
    }
}

/// `"x,y,w,h"` with optional whitespace.
pub fn parse_rect(raw: &str) -> Option<Rect> {
    let parts: Vec<f64> = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    match parts[..] {
        [x, y, w, h] => Some(Rect::new(x, y, w, h)),
        _ => None,
    }
}
