//! Rectangles and the per-export pixel-to-slide coordinate transform.

use crate::{Error, Result, SlideSize};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle. Source rectangles are in CSS pixels, mapped
/// rectangles are in slide units (inches).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Inclusive overlap test: rectangles that share only an edge overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// True when all four edges of `inner` lie within `self`.
    pub fn contains(&self, inner: &Rect) -> bool {
        inner.x >= self.x
            && inner.y >= self.y
            && inner.right() <= self.right()
            && inner.bottom() <= self.bottom()
    }

    pub fn scaled(&self, k: f64) -> Rect {
        Rect::new(self.x * k, self.y * k, self.width * k, self.height * k)
    }
}

/// Linear mapping from source pixels (relative to the capture root) into
/// slide units. Computed once per export and shared by every element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    root_x: f64,
    root_y: f64,
    scale_x: f64,
    scale_y: f64,
    offset_x: f64,
    offset_y: f64,
}

impl CoordinateTransform {
    /// Derive the transform from the root's measured rectangle and the
    /// target slide size. `offset` is added after scaling.
    pub fn new(root: &Rect, target: SlideSize, offset: (f64, f64)) -> Result<Self> {
        if root.is_empty() {
            return Err(Error::CaptureError(format!(
                "capture root has no area ({}x{})",
                root.width, root.height
            )));
        }
        Ok(Self {
            root_x: root.x,
            root_y: root.y,
            scale_x: target.width / root.width,
            scale_y: target.height / root.height,
            offset_x: offset.0,
            offset_y: offset.1,
        })
    }

    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    pub fn x(&self, px: f64) -> f64 {
        (px - self.root_x) * self.scale_x + self.offset_x
    }

    pub fn y(&self, px: f64) -> f64 {
        (px - self.root_y) * self.scale_y + self.offset_y
    }

    pub fn width(&self, px: f64) -> f64 {
        px * self.scale_x
    }

    pub fn height(&self, px: f64) -> f64 {
        px * self.scale_y
    }

    /// Map a source rectangle into slide units.
    pub fn map(&self, rect: &Rect) -> Rect {
        Rect::new(
            self.x(rect.x),
            self.y(rect.y),
            self.width(rect.width),
            self.height(rect.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide() -> SlideSize {
        SlideSize { width: 14.4, height: 14.58 }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn offsets_are_relative_to_root() {
        let root = Rect::new(100.0, 50.0, 1440.0, 1458.0);
        let t = CoordinateTransform::new(&root, slide(), (0.0, 0.0)).unwrap();
        let r = t.map(&Rect::new(100.0, 50.0, 144.0, 145.8));
        assert!(close(r.x, 0.0) && close(r.y, 0.0));
        assert!(close(r.width, 1.44) && close(r.height, 1.458));
    }

    #[test]
    fn mapping_is_linear() {
        let root = Rect::new(0.0, 0.0, 800.0, 600.0);
        let t = CoordinateTransform::new(&root, slide(), (0.0, 0.0)).unwrap();
        let r = Rect::new(40.0, 30.0, 120.0, 90.0);
        let k = 2.5;
        let a = t.map(&r.scaled(k));
        let b = t.map(&r).scaled(k);
        assert!(close(a.x, b.x) && close(a.y, b.y) && close(a.width, b.width) && close(a.height, b.height));

        // scaling the whole capture leaves the slide layout unchanged
        let t2 = CoordinateTransform::new(&root.scaled(k), slide(), (0.0, 0.0)).unwrap();
        let c = t2.map(&r.scaled(k));
        let d = t.map(&r);
        assert!(close(c.x, d.x) && close(c.width, d.width) && close(c.height, d.height));
    }

    #[test]
    fn zero_sized_root_is_rejected() {
        let root = Rect::new(0.0, 0.0, 0.0, 10.0);
        assert!(CoordinateTransform::new(&root, slide(), (0.0, 0.0)).is_err());
    }

    #[test]
    fn inclusive_overlap_and_containment() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 5.0, 5.0);
        let apart = Rect::new(10.5, 0.0, 5.0, 5.0);
        assert!(a.overlaps(&touching));
        assert!(!a.overlaps(&apart));
        assert!(a.contains(&Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(!a.contains(&Rect::new(1.0, 1.0, 10.0, 2.0)));
    }
}
