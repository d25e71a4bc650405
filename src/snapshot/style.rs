//! Computed-style bundle and the declaration parser that fills it.
//!
//! Both ingestion paths (JSON captures of `getComputedStyle` output and
//! inline `style` attributes) reduce to a list of `property: value` pairs,
//! applied in order so later declarations win.

use crate::color::Color;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// One value per box side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Sides<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Copy + PartialEq> Sides<T> {
    pub fn uniform(v: T) -> Self {
        Self { top: v, right: v, bottom: v, left: v }
    }

    /// CSS 1-4 value shorthand expansion.
    pub fn from_shorthand(values: &[T]) -> Option<Self> {
        let (top, right, bottom, left) = match *values {
            [a] => (a, a, a, a),
            [a, b] => (a, b, a, b),
            [a, b, c] => (a, b, c, b),
            [a, b, c, d] => (a, b, c, d),
            _ => return None,
        };
        Some(Self { top, right, bottom, left })
    }

    pub fn get(&self, side: Side) -> T {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    pub fn set(&mut self, side: Side, v: T) {
        match side {
            Side::Top => self.top = v,
            Side::Right => self.right = v,
            Side::Bottom => self.bottom = v,
            Side::Left => self.left = v,
        }
    }

    pub fn is_uniform(&self) -> bool {
        self.top == self.right && self.top == self.bottom && self.top == self.left
    }

    pub fn iter(&self) -> impl Iterator<Item = (Side, T)> + '_ {
        [Side::Top, Side::Right, Side::Bottom, Side::Left]
            .into_iter()
            .map(move |s| (s, self.get(s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BorderSide {
    /// Width in CSS pixels.
    pub width: f64,
    pub color: Color,
}

impl BorderSide {
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && !self.color.is_transparent()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn from_css(value: &str) -> Self {
        match value.trim() {
            "center" => TextAlign::Center,
            "right" | "end" => TextAlign::Right,
            "justify" => TextAlign::Justify,
            _ => TextAlign::Left,
        }
    }
}

/// Style properties the converter cares about, already normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleBundle {
    pub background: Color,
    pub color: Color,
    /// CSS pixels.
    pub font_size: f64,
    pub font_weight: String,
    pub text_align: TextAlign,
    pub border: Sides<BorderSide>,
    pub outline: BorderSide,
    pub border_radius: f64,
    pub box_shadow: bool,
    pub margin: Sides<f64>,
    pub padding: Sides<f64>,
}

impl Default for StyleBundle {
    fn default() -> Self {
        Self {
            background: Color::Transparent,
            color: Color::BLACK,
            font_size: 16.0,
            font_weight: "400".to_string(),
            text_align: TextAlign::Left,
            border: Sides::default(),
            outline: BorderSide::default(),
            border_radius: 0.0,
            box_shadow: false,
            margin: Sides::default(),
            padding: Sides::default(),
        }
    }
}

impl StyleBundle {
    /// Apply `property: value` declarations in order.
    pub fn from_declarations<'a, I>(decls: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut b = StyleParser::default();
        for (prop, value) in decls {
            b.apply(&prop.trim().to_ascii_lowercase(), value.trim());
        }
        b.finish()
    }

    /// Parse an inline `style` attribute.
    pub fn from_inline(style: &str) -> Self {
        Self::from_declarations(style.split(';').filter_map(|d| d.split_once(':')))
    }

    /// The `bold` keyword or a numeric weight of at least 600.
    pub fn is_bold(&self) -> bool {
        let w = self.font_weight.trim();
        w == "bold" || w.parse::<f64>().is_ok_and(|n| n >= 600.0)
    }

    pub fn has_visible_border(&self) -> bool {
        self.border.iter().any(|(_, b)| b.is_visible())
    }

    /// Widths or colors differ between sides.
    pub fn has_asymmetric_border(&self) -> bool {
        self.has_visible_border() && !self.border.is_uniform()
    }

    pub fn max_border_width(&self) -> f64 {
        self.border.iter().map(|(_, b)| b.width).fold(0.0, f64::max)
    }

    /// Fill, visible border, outline or shadow.
    pub fn is_decorated(&self) -> bool {
        !self.background.is_transparent()
            || self.has_visible_border()
            || self.outline.is_visible()
            || self.box_shadow
    }
}

// Border colors default to `currentColor`, which is only known once every
// declaration has been seen.
#[derive(Default)]
struct StyleParser {
    style: StyleBundle,
    border_width: Sides<Option<f64>>,
    border_color: Sides<Option<Color>>,
    outline_width: Option<f64>,
    outline_color: Option<Color>,
}

impl StyleParser {
    fn apply(&mut self, prop: &str, value: &str) {
        match prop {
            "background-color" => self.style.background = Color::normalize(value),
            "background" => {
                self.style.background = tokens(value)
                    .iter()
                    .find_map(|t| Color::parse(t).ok())
                    .unwrap_or(Color::Transparent);
            }
            "color" => self.style.color = Color::normalize_or(value, Color::BLACK),
            "font-size" => {
                if let Some(px) = parse_length(value) {
                    self.style.font_size = px;
                }
            }
            "font-weight" => self.style.font_weight = value.to_string(),
            "text-align" => self.style.text_align = TextAlign::from_css(value),
            "border" => {
                let (w, c) = parse_line_shorthand(value);
                self.border_width = Sides::uniform(Some(w));
                self.border_color = Sides::uniform(c);
            }
            "border-width" => {
                let v: Vec<Option<f64>> = tokens(value).iter().map(|t| parse_length(t)).collect();
                if let Some(s) = Sides::from_shorthand(&v) {
                    self.border_width = s;
                }
            }
            "border-color" => {
                let v: Vec<Option<Color>> =
                    tokens(value).iter().map(|t| line_color(t)).collect();
                if let Some(s) = Sides::from_shorthand(&v) {
                    self.border_color = s;
                }
            }
            "border-style" if value.trim() == "none" || value.trim() == "hidden" => {
                self.border_width = Sides::uniform(Some(0.0));
            }
            "outline" => {
                let (w, c) = parse_line_shorthand(value);
                self.outline_width = Some(w);
                self.outline_color = c;
            }
            "outline-width" => self.outline_width = parse_length(value),
            "outline-color" => self.outline_color = line_color(value),
            "border-radius" => {
                if let Some(r) = tokens(value).first().and_then(|t| parse_length(t)) {
                    self.style.border_radius = r;
                }
            }
            "box-shadow" => {
                let v = value.trim();
                self.style.box_shadow = !v.is_empty() && v != "none";
            }
            "margin" => {
                if let Some(s) = parse_box_lengths(value) {
                    self.style.margin = s;
                }
            }
            "padding" => {
                if let Some(s) = parse_box_lengths(value) {
                    self.style.padding = s;
                }
            }
            _ => self.apply_side(prop, value),
        }
    }

    fn apply_side(&mut self, prop: &str, value: &str) {
        let Some(rest) = prop.strip_prefix("border-") else {
            if let Some((side, v)) = side_property(prop, "margin-").map(|s| (s, parse_length(value))) {
                self.style.margin.set(side, v.unwrap_or(0.0));
            } else if let Some(side) = side_property(prop, "padding-") {
                self.style.padding.set(side, parse_length(value).unwrap_or(0.0));
            }
            return;
        };
        let (side_name, suffix) = rest.split_once('-').unwrap_or((rest, ""));
        let Some(side) = side_from_name(side_name) else {
            return;
        };
        match suffix {
            "" => {
                let (w, c) = parse_line_shorthand(value);
                self.border_width.set(side, Some(w));
                self.border_color.set(side, c);
            }
            "width" => self.border_width.set(side, parse_length(value)),
            "color" => self.border_color.set(side, line_color(value)),
            "style" if value.trim() == "none" => self.border_width.set(side, Some(0.0)),
            _ => {}
        }
    }

    fn finish(mut self) -> StyleBundle {
        let current = self.style.color;
        for (side, w) in self.border_width.iter() {
            let color = self.border_color.get(side).unwrap_or(current);
            self.style.border.set(side, BorderSide { width: w.unwrap_or(0.0), color });
        }
        self.style.outline = BorderSide {
            width: self.outline_width.unwrap_or(0.0),
            color: self.outline_color.unwrap_or(current),
        };
        self.style
    }
}

fn side_from_name(name: &str) -> Option<Side> {
    match name {
        "top" => Some(Side::Top),
        "right" => Some(Side::Right),
        "bottom" => Some(Side::Bottom),
        "left" => Some(Side::Left),
        _ => None,
    }
}

fn side_property(prop: &str, prefix: &str) -> Option<Side> {
    prop.strip_prefix(prefix).and_then(side_from_name)
}

/// `<width> <style> <color>` in any order. A `none`/`hidden` style zeroes the width.
fn parse_line_shorthand(value: &str) -> (f64, Option<Color>) {
    let mut width = None;
    let mut color = None;
    let mut hidden = false;
    for t in tokens(value) {
        match t.as_str() {
            "none" | "hidden" => hidden = true,
            "solid" | "dashed" | "dotted" | "double" | "groove" | "ridge" | "inset" | "outset" => {}
            _ => {
                if let Some(w) = parse_length(&t) {
                    width = Some(w);
                } else if let Ok(c) = Color::parse(&t) {
                    color = Some(c);
                }
            }
        }
    }
    if hidden {
        return (0.0, color);
    }
    // a style keyword alone implies the initial `medium` width
    (width.unwrap_or(3.0), color)
}

/// `None` for `currentColor`, resolved against `color` in `finish`.
fn line_color(value: &str) -> Option<Color> {
    let v = value.trim();
    if v.eq_ignore_ascii_case("currentcolor") {
        None
    } else {
        Some(Color::normalize(v))
    }
}

fn parse_box_lengths(value: &str) -> Option<Sides<f64>> {
    let v: Vec<f64> = tokens(value).iter().map(|t| parse_length(t).unwrap_or(0.0)).collect();
    Sides::from_shorthand(&v)
}

/// Length in CSS pixels. Relative units assume a 16px root font.
pub fn parse_length(value: &str) -> Option<f64> {
    let v = value.trim().to_ascii_lowercase();
    match v.as_str() {
        "0" => return Some(0.0),
        "thin" => return Some(1.0),
        "medium" => return Some(3.0),
        "thick" => return Some(5.0),
        _ => {}
    }
    let units: [(&str, f64); 5] = [("px", 1.0), ("rem", 16.0), ("em", 16.0), ("pt", 4.0 / 3.0), ("in", 96.0)];
    for (unit, factor) in units {
        if let Some(n) = v.strip_suffix(unit) {
            return n.trim().parse::<f64>().ok().map(|n| n * factor);
        }
    }
    None
}

/// Split on whitespace outside parentheses: `1px solid rgb(0, 0, 0)` has three tokens.
fn tokens(value: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut depth = 0usize;
    for ch in value.chars() {
        match ch {
            '(' => {
                depth += 1;
                cur.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                cur.push(ch);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !cur.is_empty() {
                    out.push(std::mem::take(&mut cur));
                }
            }
            c => cur.push(c),
        }
    }
    if !cur.is_empty() {
        out.push(cur);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_style_fills_bundle() {
        let s = StyleBundle::from_inline(
            "background-color: #f3f4f6; color: rgb(31, 41, 55); font-size: 14px; font-weight: 600; text-align: center; border-radius: 6px",
        );
        assert_eq!(s.background.to_string(), "#f3f4f6");
        assert_eq!(s.color.to_string(), "#1f2937");
        assert_eq!(s.font_size, 14.0);
        assert!(s.is_bold());
        assert_eq!(s.text_align, TextAlign::Center);
        assert_eq!(s.border_radius, 6.0);
        assert!(s.is_decorated());
    }

    #[test]
    fn left_accent_border_is_asymmetric() {
        let s = StyleBundle::from_inline("border-left: 4px solid rgb(59, 130, 246)");
        assert_eq!(s.border.left.width, 4.0);
        assert_eq!(s.border.top.width, 0.0);
        assert!(s.has_asymmetric_border());
        assert!(s.is_decorated());
    }

    #[test]
    fn border_color_defaults_to_current_color() {
        let s = StyleBundle::from_inline("color: red; border-width: 2px; border-style: solid");
        assert!(s.border.is_uniform());
        assert_eq!(s.border.top.color, Color::Rgb(255, 0, 0));
        assert!(!s.has_asymmetric_border());
    }

    #[test]
    fn shorthands_expand() {
        let s = StyleBundle::from_inline("padding: 4px 8px; margin: 1px 2px 3px; border: none");
        assert_eq!(s.padding, Sides { top: 4.0, right: 8.0, bottom: 4.0, left: 8.0 });
        assert_eq!(s.margin.left, 2.0);
        assert_eq!(s.margin.bottom, 3.0);
        assert!(!s.has_visible_border());
        assert!(!s.is_decorated());
    }

    #[test]
    fn weights_and_lengths() {
        let mut s = StyleBundle::default();
        for (w, bold) in [("bold", true), ("700", true), ("600", true), ("500", false), ("normal", false), ("bolder", false)] {
            s.font_weight = w.into();
            assert_eq!(s.is_bold(), bold, "{}", w);
        }
        assert_eq!(parse_length("1.5rem"), Some(24.0));
        assert_eq!(parse_length("12pt"), Some(16.0));
        assert_eq!(parse_length("auto"), None);
    }

    #[test]
    fn shadow_and_transparent_background() {
        let s = StyleBundle::from_inline("background: transparent; box-shadow: 0 1px 3px rgba(0,0,0,0.1)");
        assert!(s.background.is_transparent());
        assert!(s.box_shadow);
        assert!(s.is_decorated());
    }

    #[test]
    fn current_color_longhands_follow_text_color() {
        let s = StyleBundle::from_inline(
            "border-width: 1px; border-color: currentColor; outline: 2px solid; outline-color: currentcolor; color: #2563eb",
        );
        assert_eq!(s.border.top.color, Color::Rgb(0x25, 0x63, 0xeb));
        assert!(s.border.is_uniform());
        assert_eq!(s.outline.color, Color::Rgb(0x25, 0x63, 0xeb));
        assert!(s.outline.is_visible());

        let s = StyleBundle::from_inline("color: red; border-left: 4px solid #000; border-left-color: currentColor");
        assert_eq!(s.border.left.color, Color::Rgb(255, 0, 0));
        assert!(s.has_asymmetric_border());
    }
}
