// src/canvas/viewport.rs

use crate::dom::fmt_num;
use crate::types::Point;

/// Pan offset and scale shared by the node layer and the edge layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f64,
    pan: Point,
    min_scale: f64,
    max_scale: f64,
}

impl Viewport {
    pub fn new(min_scale: f64, max_scale: f64) -> Self {
        Self {
            scale: 1.0_f64.clamp(min_scale, max_scale),
            pan: Point::default(),
            min_scale,
            max_scale,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min_scale, self.max_scale)
    }

    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }

    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = self.clamp_scale(scale);
        }
    }

    pub fn set_pan(&mut self, pan: Point) {
        if pan.x.is_finite() && pan.y.is_finite() {
            self.pan = pan;
        }
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.set_pan(Point::new(self.pan.x + dx, self.pan.y + dy));
    }

    /// Multiply the scale by `factor` (clamped) keeping `center` fixed on
    /// screen: `pan' = center - (center - pan) * (new / old)`.
    ///
    /// Returns `false` when the scale did not change (already at a bound, or
    /// a non-positive/non-finite factor).
    pub fn zoom(&mut self, factor: f64, center: Point) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            return false;
        }
        let old = self.scale;
        let new = self.clamp_scale(old * factor);
        if new == old {
            return false;
        }
        let ratio = new / old;
        self.pan = Point::new(
            center.x - (center.x - self.pan.x) * ratio,
            center.y - (center.y - self.pan.y) * ratio,
        );
        self.scale = new;
        true
    }

    /// Map a point on screen (relative to the canvas) into canvas space.
    pub fn screen_to_canvas(&self, p: Point) -> Point {
        Point::new((p.x - self.pan.x) / self.scale, (p.y - self.pan.y) / self.scale)
    }

    pub fn canvas_to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.pan.x, p.y * self.scale + self.pan.y)
    }

    /// CSS transform applied to both layers.
    pub fn transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            fmt_num(self.pan.x),
            fmt_num(self.pan.y),
            format_scale(self.scale)
        )
    }
}

fn format_scale(scale: f64) -> String {
    let s = format!("{scale:.4}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_keeps_center_fixed() {
        let mut vp = Viewport::new(0.2, 3.0);
        let center = Point::new(400.0, 300.0);
        let before = vp.screen_to_canvas(center);
        assert!(vp.zoom(2.0, center));
        let after = vp.screen_to_canvas(center);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
        assert_eq!(vp.pan(), Point::new(-400.0, -300.0));
    }

    #[test]
    fn zoom_at_bound_is_a_no_op() {
        let mut vp = Viewport::new(0.5, 1.0);
        assert!(!vp.zoom(1.5, Point::default()));
        assert!(!vp.zoom(0.0, Point::default()));
        assert!(!vp.zoom(f64::NAN, Point::default()));
        assert_eq!(vp.scale(), 1.0);
    }

    #[test]
    fn transform_string_is_compact() {
        let mut vp = Viewport::new(0.2, 3.0);
        vp.set_pan(Point::new(10.0, -5.5));
        vp.set_scale(1.25);
        assert_eq!(vp.transform(), "translate(10px, -5.5px) scale(1.25)");
    }
}
