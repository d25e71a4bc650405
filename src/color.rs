//! Color normalization for computed-style color strings.
//!
//! Every color that reaches the emitter is either a concrete `#rrggbb` value or
//! the `transparent` sentinel. Parsing never fails at the seam: callers use
//! [`Color::normalize`] or [`Color::normalize_or`], which fall back to a safe
//! default, while [`Color::parse`] exposes the typed failure for tests and
//! diagnostics.

use crate::{Error, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// Colors whose alpha is at or below this value are treated as transparent.
pub const TRANSPARENT_ALPHA: f32 = 0.1;

/// A normalized color: opaque RGB or the transparent sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Transparent,
    Rgb(u8, u8, u8),
}

impl Color {
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    /// Parse a CSS color string using the default alpha threshold.
    pub fn parse(input: &str) -> Result<Color> {
        Self::parse_with_threshold(input, TRANSPARENT_ALPHA)
    }

    /// Parse a CSS color string; alpha at or below `threshold` yields
    /// [`Color::Transparent`].
    pub fn parse_with_threshold(input: &str, threshold: f32) -> Result<Color> {
        let raw = input.trim().to_ascii_lowercase();
        if raw.is_empty() {
            return Err(Error::ColorError("empty color".into()));
        }
        if is_transparent_keyword(&raw) {
            return Ok(Color::Transparent);
        }

        let (rgb, alpha) = if let Some(args) = function_args(&raw, "oklch") {
            oklch_to_rgb(args)?
        } else if let Some(args) = function_args(&raw, "oklab") {
            oklab_to_rgb(args)?
        } else {
            let parsed: csscolorparser::Color = raw
                .parse()
                .map_err(|e| Error::ColorError(format!("{}: {}", input.trim(), e)))?;
            let [r, g, b, _] = parsed.to_rgba8();
            ((r, g, b), parsed.a)
        };

        if alpha <= threshold {
            return Ok(Color::Transparent);
        }
        Ok(Color::Rgb(rgb.0, rgb.1, rgb.2))
    }

    /// Best-effort normalization; unparseable input becomes transparent.
    pub fn normalize(input: &str) -> Color {
        Self::normalize_or(input, Color::Transparent)
    }

    /// Best-effort normalization with an explicit fallback.
    pub fn normalize_or(input: &str, fallback: Color) -> Color {
        match Self::parse(input) {
            Ok(c) => c,
            Err(e) => {
                log::debug!("color fallback to {}: {}", fallback, e);
                fallback
            }
        }
    }

    pub fn is_transparent(&self) -> bool {
        matches!(self, Color::Transparent)
    }

    /// Hex form without the leading `#`, upper-cased, as presentation XML expects.
    pub fn to_srgb_hex(&self) -> Option<String> {
        match self {
            Color::Transparent => None,
            Color::Rgb(r, g, b) => Some(format!("{:02X}{:02X}{:02X}", r, g, b)),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Transparent => f.write_str("transparent"),
            Color::Rgb(r, g, b) => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn is_transparent_keyword(raw: &str) -> bool {
    if raw == "transparent" || raw == "none" {
        return true;
    }
    // computed value of an unset background; skip the parser for it
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    compact == "rgba(0,0,0,0)"
}

fn function_args<'a>(raw: &'a str, name: &str) -> Option<&'a str> {
    raw.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

/// Split `a b c / alpha` (or comma separated) into components.
fn split_components(args: &str) -> Result<([f32; 3], f32)> {
    let (channels, alpha) = match args.split_once('/') {
        Some((c, a)) => (c, Some(a)),
        None => (args, None),
    };
    let parts: Vec<&str> = channels
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() != 3 {
        return Err(Error::ColorError(format!("expected 3 channels in '{}'", args)));
    }
    let mut out = [0.0f32; 3];
    for (slot, part) in out.iter_mut().zip(parts.iter()) {
        *slot = parse_number(part)?;
    }
    let alpha = match alpha {
        Some(a) => parse_number(a.trim())?.clamp(0.0, 1.0),
        None => 1.0,
    };
    Ok((out, alpha))
}

// Percentages are returned as fractions; callers rescale where the channel
// reference range is not 1.
fn parse_number(s: &str) -> Result<f32> {
    let s = s.trim();
    if s == "none" {
        return Ok(0.0);
    }
    let (num, pct) = match s.strip_suffix('%') {
        Some(n) => (n, true),
        None => (s.trim_end_matches("deg"), false),
    };
    let v: f32 = num
        .parse()
        .map_err(|_| Error::ColorError(format!("bad channel '{}'", s)))?;
    Ok(if pct { v / 100.0 } else { v })
}

fn oklch_to_rgb(args: &str) -> Result<((u8, u8, u8), f32)> {
    let ([l, c, h], alpha) = split_components(args)?;
    // 100% chroma is 0.4 in the reference range
    let c = if args.split_whitespace().nth(1).is_some_and(|p| p.ends_with('%')) { c * 0.4 } else { c };
    let hr = h.to_radians();
    Ok((oklab_components_to_rgb(l, c * hr.cos(), c * hr.sin()), alpha))
}

fn oklab_to_rgb(args: &str) -> Result<((u8, u8, u8), f32)> {
    let ([l, a, b], alpha) = split_components(args)?;
    Ok((oklab_components_to_rgb(l, a, b), alpha))
}

fn oklab_components_to_rgb(l: f32, a: f32, b: f32) -> (u8, u8, u8) {
    let l_ = l + 0.396_337_78 * a + 0.215_803_76 * b;
    let m_ = l - 0.105_561_346 * a - 0.063_854_17 * b;
    let s_ = l - 0.089_484_18 * a - 1.291_485_5 * b;

    let l3 = l_ * l_ * l_;
    let m3 = m_ * m_ * m_;
    let s3 = s_ * s_ * s_;

    let r = 4.076_741_7 * l3 - 3.307_711_6 * m3 + 0.230_969_94 * s3;
    let g = -1.268_438 * l3 + 2.609_757_4 * m3 - 0.341_319_38 * s3;
    let bl = -0.004_196_086_3 * l3 - 0.703_418_6 * m3 + 1.707_614_7 * s3;

    (to_srgb_byte(r), to_srgb_byte(g), to_srgb_byte(bl))
}

fn to_srgb_byte(linear: f32) -> u8 {
    let v = if linear <= 0.003_130_8 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
