//! Turn the analysis of a snapshot tree into positioned slide items.
//!
//! Paint order: group backgrounds (outermost first), then each group's
//! charts and texts, then content outside every group, then border accents.

use crate::color::Color;
use crate::document::{SlideItem, Stroke};
use crate::geometry::{CoordinateTransform, Rect};
use crate::snapshot::{NodeIndex, Side, SnapshotTree};
use crate::text::TextClaim;
use crate::{Analysis, ExportConfig};
use std::collections::HashMap;

/// Points per slide inch.
const POINTS_PER_INCH: f64 = 72.0;

pub struct Emitter<'a> {
    tree: &'a SnapshotTree,
    analysis: &'a Analysis,
    config: &'a ExportConfig,
    chart_images: Option<&'a HashMap<NodeIndex, String>>,
}

impl<'a> Emitter<'a> {
    pub fn new(tree: &'a SnapshotTree, analysis: &'a Analysis, config: &'a ExportConfig) -> Self {
        Self { tree, analysis, config, chart_images: None }
    }

    /// Raster fallbacks for chart elements without usable metadata.
    pub fn with_chart_images(mut self, images: &'a HashMap<NodeIndex, String>) -> Self {
        self.chart_images = Some(images);
        self
    }

    pub fn emit(&self) -> Vec<SlideItem> {
        let grouping = &self.analysis.grouping;
        let claims = self.analysis.claims.claims();
        let mut items = Vec::new();

        let mut anchors: Vec<_> = grouping.groups.iter().collect();
        anchors.sort_by_key(|g| (self.tree.depth(g.anchor), g.id));
        items.extend(anchors.iter().filter_map(|g| self.background(g.anchor)));

        for g in &grouping.groups {
            items.extend(g.charts.iter().filter_map(|&c| self.chart(c)));
            items.extend(g.texts.iter().map(|&t| self.text(&claims[t])));
        }
        items.extend(grouping.ungrouped_charts.iter().filter_map(|&c| self.chart(c)));
        items.extend(grouping.ungrouped_texts.iter().map(|&t| self.text(&claims[t])));

        for &idx in self.analysis.ids.order() {
            if idx != SnapshotTree::ROOT {
                self.accents(idx, &mut items);
            }
        }

        log::debug!("emitted {} slide items", items.len());
        items
    }

    fn transform(&self) -> &CoordinateTransform {
        &self.analysis.transform
    }

    /// Source pixels to points at the slide's scale.
    fn points(&self, px: f64) -> f64 {
        let t = self.transform();
        round2(px * t.scale_x().min(t.scale_y()) * POINTS_PER_INCH)
    }

    fn background(&self, idx: NodeIndex) -> Option<SlideItem> {
        let el = self.tree.get(idx);
        let style = &el.style;

        let fill = (!style.background.is_transparent()).then_some(style.background);
        // asymmetric borders are drawn as accents instead
        let border_width = if style.has_visible_border() && !style.has_asymmetric_border() {
            style.border.top.width
        } else {
            0.0
        };
        let outline_width = if style.outline.is_visible() { style.outline.width } else { 0.0 };
        let line = (border_width.max(outline_width) > 0.0).then(|| Stroke {
            width: self.points(border_width.max(outline_width)),
            color: if border_width > 0.0 { style.border.top.color } else { style.outline.color },
        });

        if fill.is_none() && line.is_none() && !style.box_shadow {
            return None;
        }
        let rect = self.transform().map(&el.rect);
        let radius = self
            .transform()
            .width(style.border_radius)
            .min(rect.width.min(rect.height) / 2.0);
        Some(SlideItem::Shape { rect, fill, line, radius, shadow: style.box_shadow })
    }

    fn text(&self, claim: &TextClaim) -> SlideItem {
        let el = self.tree.get(claim.owner);
        let style = &el.style;
        SlideItem::Text {
            rect: self.transform().map(&el.rect),
            text: claim.text.clone(),
            font_size: self.points(style.font_size).max(1.0),
            bold: style.is_bold(),
            color: if style.color.is_transparent() { Color::BLACK } else { style.color },
            align: style.text_align,
            fill: (!style.background.is_transparent()).then_some(style.background),
        }
    }

    fn chart(&self, idx: NodeIndex) -> Option<SlideItem> {
        let el = self.tree.get(idx);
        let rect = self.transform().map(&el.rect);
        if let Some(chart) = self.analysis.descriptors.get(&idx) {
            return Some(SlideItem::Chart { rect, chart: chart.clone() });
        }
        let raster = el
            .image
            .as_ref()
            .or_else(|| self.chart_images.and_then(|m| m.get(&idx)));
        match raster {
            Some(uri) => Some(SlideItem::Image { rect, data_uri: uri.clone() }),
            None => {
                log::debug!("chart {} has no metadata or snapshot; skipped", self.analysis.ids.id(idx));
                None
            }
        }
    }

    fn accents(&self, idx: NodeIndex, out: &mut Vec<SlideItem>) {
        let el = self.tree.get(idx);
        if el.excluded || el.rect.is_empty() || !el.style.has_asymmetric_border() {
            return;
        }
        let r = self.transform().map(&el.rect);
        let shrink = self.config.accent_shrink;
        let min = self.config.accent_min_width;

        for (side, border) in el.style.border.iter() {
            if !border.is_visible() {
                continue;
            }
            let rect = match side {
                Side::Left | Side::Right => {
                    let w = self.transform().width(border.width).max(min);
                    let h = r.height * shrink;
                    let x = if side == Side::Left { r.x } else { r.right() - w };
                    Rect::new(x, r.y + (r.height - h) / 2.0, w, h)
                }
                Side::Top | Side::Bottom => {
                    let h = self.transform().height(border.width).max(min);
                    let w = r.width * shrink;
                    let y = if side == Side::Top { r.y } else { r.bottom() - h };
                    Rect::new(r.x + (r.width - w) / 2.0, y, w, h)
                }
            };
            out.push(SlideItem::Shape {
                rect,
                fill: Some(border.color),
                line: None,
                radius: 0.0,
                shadow: false,
            });
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
