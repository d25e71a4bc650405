//! The reconstructed presentation: a single slide of positioned items.
//!
//! Items are kept in paint order. Coordinates are slide inches, font sizes
//! and line widths are points.

use crate::chart::ChartDescriptor;
use crate::color::Color;
use crate::geometry::Rect;
use crate::snapshot::TextAlign;
use crate::{Result, SlideSize};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Outline of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    /// Points.
    pub width: f64,
    pub color: Color,
}

/// One drawing command on the slide.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SlideItem {
    /// Rounded rectangle: group backgrounds and border accents.
    Shape {
        rect: Rect,
        fill: Option<Color>,
        line: Option<Stroke>,
        /// Corner radius in inches.
        radius: f64,
        shadow: bool,
    },
    Text {
        rect: Rect,
        text: String,
        /// Points.
        font_size: f64,
        bold: bool,
        color: Color,
        align: TextAlign,
        fill: Option<Color>,
    },
    Chart {
        rect: Rect,
        chart: ChartDescriptor,
    },
    /// Raster placeholder, a `data:` URI.
    Image { rect: Rect, data_uri: String },
}

impl SlideItem {
    pub fn rect(&self) -> &Rect {
        match self {
            SlideItem::Shape { rect, .. }
            | SlideItem::Text { rect, .. }
            | SlideItem::Chart { rect, .. }
            | SlideItem::Image { rect, .. } => rect,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SlideItem::Shape { .. } => "shape",
            SlideItem::Text { .. } => "text",
            SlideItem::Chart { .. } => "chart",
            SlideItem::Image { .. } => "image",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Slide {
    pub items: Vec<SlideItem>,
}

impl Slide {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|i| match i {
            SlideItem::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn count(&self, kind: &str) -> usize {
        self.items.iter().filter(|i| i.kind() == kind).count()
    }
}

/// The finished document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation {
    pub title: String,
    pub size: SlideSize,
    pub slide: Slide,
}

impl Presentation {
    /// `<title>.pptx` with path-hostile characters replaced.
    pub fn file_name(&self) -> String {
        let cleaned: String = self
            .title
            .trim()
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();
        if cleaned.is_empty() {
            "presentation.pptx".to_string()
        } else {
            format!("{}.pptx", cleaned)
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// SHA-256 of the compact JSON form, hex encoded. Stable across runs for
    /// the same input.
    pub fn fingerprint(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&json)))
    }

    #[cfg(feature = "pptx")]
    pub fn to_pptx_bytes(&self) -> Result<Vec<u8>> {
        crate::pptx::write(self)
    }

    /// Write `<dir>/<file_name()>` and return its path.
    #[cfg(feature = "pptx")]
    pub fn write_pptx(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(self.file_name());
        std::fs::write(&path, self.to_pptx_bytes()?)?;
        log::info!("wrote {} ({} items)", path.display(), self.slide.items.len());
        Ok(path)
    }
}
