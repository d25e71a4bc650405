//! Structured chart metadata attached to chart elements.
//!
//! A chart element may carry a JSON attribute (by default `data-chart`):
//!
//! ```json
//! {"chartType":"pie","labels":["A","B"],"values":[1,2],"colors":["#111","#222"]}
//! ```
//!
//! When present and well formed, the emitter draws a native chart instead of
//! a raster placeholder. Absent metadata is not an error; malformed metadata
//! is logged and the element is treated as having none.

use crate::color::Color;
use crate::snapshot::{ElementSnapshot, NodeIndex, SnapshotTree};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Palette used when the descriptor supplies fewer colors than values.
pub const DEFAULT_PALETTE: [Color; 5] = [
    Color::Rgb(0x93, 0xc5, 0xfd),
    Color::Rgb(0x60, 0xa5, 0xfa),
    Color::Rgb(0x3b, 0x82, 0xf6),
    Color::Rgb(0x25, 0x63, 0xeb),
    Color::Rgb(0x1d, 0x4e, 0xd8),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Doughnut,
    Bar,
    Line,
    Area,
}

impl ChartKind {
    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pie" => Some(ChartKind::Pie),
            "doughnut" | "donut" => Some(ChartKind::Doughnut),
            "bar" | "column" => Some(ChartKind::Bar),
            "line" => Some(ChartKind::Line),
            "area" => Some(ChartKind::Area),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDescriptor {
    chart_type: String,
    labels: Vec<String>,
    values: Vec<f64>,
    #[serde(default)]
    colors: Vec<String>,
    legend_color: Option<String>,
    label_color: Option<String>,
}

/// Validated chart metadata with normalized colors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// One color per value.
    pub colors: Vec<Color>,
    pub legend_color: Option<Color>,
    pub label_color: Option<Color>,
}

impl ChartDescriptor {
    /// Strict parse. Unknown chart types fall back to a bar chart.
    pub fn parse(json: &str) -> Result<Self> {
        let raw: RawDescriptor =
            serde_json::from_str(json).map_err(|e| Error::ChartError(e.to_string()))?;
        if raw.labels.is_empty() {
            return Err(Error::ChartError("no categories".into()));
        }
        if raw.labels.len() != raw.values.len() {
            return Err(Error::ChartError(format!(
                "{} labels but {} values",
                raw.labels.len(),
                raw.values.len()
            )));
        }
        if let Some(v) = raw.values.iter().find(|v| !v.is_finite()) {
            return Err(Error::ChartError(format!("non-finite value {}", v)));
        }
        let kind = ChartKind::from_name(&raw.chart_type).unwrap_or_else(|| {
            log::debug!("unknown chart type {:?}, drawing as bar", raw.chart_type);
            ChartKind::Bar
        });
        let colors = (0..raw.values.len())
            .map(|i| {
                let fallback = DEFAULT_PALETTE[i % DEFAULT_PALETTE.len()];
                raw.colors
                    .get(i)
                    .map(|c| match Color::normalize_or(c, fallback) {
                        Color::Transparent => fallback,
                        c => c,
                    })
                    .unwrap_or(fallback)
            })
            .collect();
        Ok(Self {
            kind,
            labels: raw.labels,
            values: raw.values,
            colors,
            legend_color: raw.legend_color.as_deref().map(|c| Color::normalize_or(c, Color::BLACK)),
            label_color: raw.label_color.as_deref().map(|c| Color::normalize_or(c, Color::BLACK)),
        })
    }

    /// Read the descriptor from `attribute` on `el`. Malformed metadata is
    /// logged and reported as absent.
    pub fn from_element(el: &ElementSnapshot, attribute: &str) -> Option<Self> {
        let raw = el.attr(attribute)?;
        match Self::parse(raw) {
            Ok(d) => Some(d),
            Err(e) => {
                log::warn!("ignoring chart metadata on <{}>: {}", el.tag, e);
                None
            }
        }
    }
}

/// Non-excluded elements marked as charts, either by `class` or by carrying
/// the metadata `attribute`, in document order.
pub fn find_chart_elements(tree: &SnapshotTree, class: &str, attribute: &str) -> Vec<NodeIndex> {
    tree.iter()
        .filter(|(_, el)| !el.excluded && (el.has_class(class) || el.attr(attribute).is_some()))
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pie_descriptor_parses() {
        let d = ChartDescriptor::parse(
            r##"{"chartType":"pie","labels":["A","B"],"values":[1,2],"colors":["#111","#222"]}"##,
        )
        .unwrap();
        assert_eq!(d.kind, ChartKind::Pie);
        assert_eq!(d.labels, vec!["A", "B"]);
        assert_eq!(d.colors, vec![Color::Rgb(0x11, 0x11, 0x11), Color::Rgb(0x22, 0x22, 0x22)]);
        assert_eq!(d.legend_color, None);
    }

    #[test]
    fn missing_colors_use_palette() {
        let d = ChartDescriptor::parse(
            r#"{"chartType":"Column","labels":["a","b","c"],"values":[3,1,2],"colors":["nope"],"labelColor":"white"}"#,
        )
        .unwrap();
        assert_eq!(d.kind, ChartKind::Bar);
        assert_eq!(d.colors, DEFAULT_PALETTE[..3].to_vec());
        assert_eq!(d.label_color, Some(Color::WHITE));
    }

    #[test]
    fn malformed_descriptors_are_errors() {
        assert!(ChartDescriptor::parse("{chartType: pie").is_err());
        assert!(ChartDescriptor::parse(r#"{"chartType":"pie","labels":["a"],"values":[]}"#).is_err());
        assert!(ChartDescriptor::parse(r#"{"chartType":"pie","labels":[],"values":[]}"#).is_err());
        assert!(ChartDescriptor::parse(r#"{"labels":["a"],"values":[1]}"#).is_err());
    }

    #[test]
    fn unknown_type_draws_as_bar() {
        let d = ChartDescriptor::parse(r#"{"chartType":"radar","labels":["a"],"values":[1]}"#).unwrap();
        assert_eq!(d.kind, ChartKind::Bar);
    }
}
