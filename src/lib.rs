//! Dashdeck
//!
//! Reconstructs a rendered dashboard as an editable presentation slide:
//! decorated containers become background shapes, visible text becomes
//! positioned text boxes, charts become native charts (or raster
//! placeholders) and one-sided borders become thin accent bars.
//!
//! # Pipeline
//!
//! - **Snapshot**: the captured DOM is read once into an immutable
//!   [`SnapshotTree`] (from a JSON capture or pre-measured HTML)
//! - **Identity**: every element gets a document-order [`ElementId`]
//! - **Text**: each distinct string is assigned to its deepest owner
//! - **Grouping**: decorated containers are partitioned into disjoint groups
//! - **Emission**: groups, text, charts and accents become [`SlideItem`]s
//!
//! # Example
//!
//! ```no_run
//! use dashdeck::{ExportConfig, Exporter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExportConfig {
//!     title: "Q3 Dashboard".to_string(),
//!     ..Default::default()
//! };
//! let capture = std::fs::read_to_string("capture.json")?;
//! let tree = dashdeck::snapshot::capture::from_json(&capture, &config.excluded_class)?;
//!
//! let exporter = Exporter::new(config)?;
//! let deck = exporter.reconstruct(&tree)?;
//! deck.write_pptx(".")?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod error;
pub use error::{Error, Result};

pub mod chart;
pub mod color;
pub mod document;
pub mod emit;
pub mod geometry;
pub mod grouping;
pub mod identity;
pub mod preview;
pub mod snapshot;
pub mod snapshotter;
pub mod text;

#[cfg(feature = "pptx")]
pub mod pptx;

pub use color::Color;
pub use document::{Presentation, Slide, SlideItem, Stroke};
pub use geometry::{CoordinateTransform, Rect};
pub use identity::{ElementId, IdentityTable};
pub use preview::{ExportSession, OffscreenHost, PreviewState};
pub use snapshot::{ElementSnapshot, NodeIndex, SnapshotTree};
pub use snapshotter::{NoopSnapshotter, Snapshotter};

use grouping::Grouping;
use text::TextClaims;

/// Slide dimensions in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlideSize {
    pub width: f64,
    pub height: f64,
}

impl Default for SlideSize {
    fn default() -> Self {
        Self { width: 14.4, height: 14.58 }
    }
}

/// Options handed to the snapshot collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotOptions {
    /// Append a cache-busting query to image URLs while capturing.
    pub cache_bust: bool,
    pub background_color: String,
    pub pixel_ratio: f64,
    /// Encoder quality in `(0, 1]`.
    pub quality: f64,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            cache_bust: true,
            background_color: "#ffffff".to_string(),
            pixel_ratio: 2.0,
            quality: 1.0,
        }
    }
}

/// Configuration for an export
///
/// Loadable from JSON; missing fields take their defaults.
///
/// # Examples
///
/// ```
/// let cfg = dashdeck::ExportConfig::default();
/// assert_eq!(cfg.excluded_class, "no-print");
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Document title; also names the output file
    pub title: String,
    /// Slide dimensions in inches
    pub slide: SlideSize,
    /// Where the title text box is placed
    pub title_box: Rect,
    /// Title font size in points
    pub title_font_size: f64,
    /// Region the capture root is scaled onto
    pub content_box: Rect,
    /// Class marking regions left out of the export
    pub excluded_class: String,
    /// Class marking chart elements
    pub chart_class: String,
    /// Attribute carrying structured chart metadata
    pub chart_attribute: String,
    /// Fraction of an edge an accent bar spans
    pub accent_shrink: f64,
    /// Minimum accent thickness in inches
    pub accent_min_width: f64,
    pub snapshot: SnapshotOptions,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: "CX Dashboard Info".to_string(),
            slide: SlideSize::default(),
            title_box: Rect::new(0.5, 0.2, 13.4, 0.6),
            title_font_size: 18.0,
            content_box: Rect::new(0.0, 0.9, 14.4, 13.68),
            excluded_class: "no-print".to_string(),
            chart_class: "chart-snapshot".to_string(),
            chart_attribute: "data-chart".to_string(),
            accent_shrink: 0.98,
            accent_min_width: 0.01,
            snapshot: SnapshotOptions::default(),
        }
    }
}

impl ExportConfig {
    /// Read a JSON config file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let cfg: ExportConfig = serde_json::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.slide.width > 0.0 && self.slide.height > 0.0) {
            return Err(Error::ConfigError("slide size must be positive".into()));
        }
        if self.content_box.is_empty() {
            return Err(Error::ConfigError("content box must have an area".into()));
        }
        if !(self.accent_shrink > 0.0 && self.accent_shrink <= 1.0) {
            return Err(Error::ConfigError(format!(
                "accent_shrink {} outside (0, 1]",
                self.accent_shrink
            )));
        }
        if self.accent_min_width < 0.0 {
            return Err(Error::ConfigError("accent_min_width must not be negative".into()));
        }
        if self.snapshot.pixel_ratio <= 0.0 {
            return Err(Error::ConfigError("pixel_ratio must be positive".into()));
        }
        if !(self.snapshot.quality > 0.0 && self.snapshot.quality <= 1.0) {
            return Err(Error::ConfigError("quality outside (0, 1]".into()));
        }
        Ok(())
    }
}

/// Everything the passes derive from one snapshot tree.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub ids: IdentityTable,
    pub claims: TextClaims,
    /// Chart elements in document order.
    pub charts: Vec<NodeIndex>,
    /// Well-formed chart metadata, keyed by chart element.
    pub descriptors: HashMap<NodeIndex, chart::ChartDescriptor>,
    pub grouping: Grouping,
    pub transform: CoordinateTransform,
}

/// Runs the reconstruction passes with one configuration.
#[derive(Debug, Clone)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Tag, resolve text, find charts and group. Pure and deterministic.
    pub fn analyze(&self, tree: &SnapshotTree) -> Result<Analysis> {
        let content = &self.config.content_box;
        let transform = CoordinateTransform::new(
            &tree.root().rect,
            SlideSize { width: content.width, height: content.height },
            (content.x, content.y),
        )?;
        let ids = IdentityTable::tag(tree);
        let claims = text::resolve(tree, &ids);
        let charts = chart::find_chart_elements(
            tree,
            &self.config.chart_class,
            &self.config.chart_attribute,
        );
        let descriptors: HashMap<NodeIndex, chart::ChartDescriptor> = charts
            .iter()
            .filter_map(|&c| {
                chart::ChartDescriptor::from_element(tree.get(c), &self.config.chart_attribute)
                    .map(|d| (c, d))
            })
            .collect();
        let grouping = grouping::group(tree, &ids, &claims, &charts);
        log::info!(
            "analyzed {} elements: {} texts, {} groups, {} charts",
            ids.len(),
            claims.len(),
            grouping.groups.len(),
            charts.len()
        );
        Ok(Analysis { ids, claims, charts, descriptors, grouping, transform })
    }

    /// Editable reconstruction without raster fallbacks.
    pub fn reconstruct(&self, tree: &SnapshotTree) -> Result<Presentation> {
        let analysis = self.analyze(tree)?;
        let items = emit::Emitter::new(tree, &analysis, &self.config).emit();
        Ok(self.presentation(items))
    }

    /// Reconstruction where charts lacking metadata are rasterized through
    /// `snapshotter`. Failed chart snapshots leave that chart out.
    pub async fn export<S: Snapshotter>(
        &self,
        tree: &SnapshotTree,
        snapshotter: &S,
    ) -> Result<Presentation> {
        let analysis = self.analyze(tree)?;
        let wanted: Vec<NodeIndex> = analysis
            .charts
            .iter()
            .copied()
            .filter(|c| !analysis.descriptors.contains_key(c))
            .collect();
        let images: HashMap<NodeIndex, String> =
            snapshotter::snapshot_all(snapshotter, tree, &wanted, &self.config.snapshot).await;
        let items = emit::Emitter::new(tree, &analysis, &self.config)
            .with_chart_images(&images)
            .emit();
        Ok(self.presentation(items))
    }

    /// Raster preview of the export region. See [`preview::prepare`].
    pub async fn preview<S: Snapshotter>(
        &self,
        tree: &SnapshotTree,
        snapshotter: &S,
        host: &OffscreenHost,
    ) -> PreviewState {
        preview::prepare(tree, snapshotter, host, &self.config).await
    }

    fn presentation(&self, items: Vec<SlideItem>) -> Presentation {
        let mut all = Vec::with_capacity(items.len() + 1);
        all.push(SlideItem::Text {
            rect: self.config.title_box,
            text: self.config.title.clone(),
            font_size: self.config.title_font_size,
            bold: true,
            color: Color::BLACK,
            align: snapshot::TextAlign::Left,
            fill: None,
        });
        all.extend(items);
        Presentation {
            title: self.config.title.clone(),
            size: self.config.slide,
            slide: Slide { items: all },
        }
    }
}
