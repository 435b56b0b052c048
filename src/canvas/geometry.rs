// src/canvas/geometry.rs

//! Edge routing between node anchor points.

use crate::dom::fmt_num;
use crate::types::{Point, Rect};

/// Below this distance between the two nodes an edge is a straight line.
pub const DIRECT_DISTANCE_THRESHOLD: f64 = 150.0;

/// Control points sit this fraction of the horizontal delta away from the
/// endpoints...
pub const CONTROL_OFFSET_RATIO: f64 = 0.5;

/// ...but never further than this.
pub const MAX_CONTROL_OFFSET: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    Direct,
    Curved,
}

impl PathStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            PathStyle::Direct => "direct",
            PathStyle::Curved => "curved",
        }
    }
}

/// A routed edge, ready to be written into an SVG `d` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePath {
    pub style: PathStyle,
    pub start: Point,
    pub end: Point,
    pub d: String,
}

impl EdgePath {
    /// Point halfway along the edge (exact for straight lines, the curve's
    /// `t = 0.5` point otherwise).
    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }
}

/// Right-edge centre of the source box.
pub fn source_anchor(rect: Rect) -> Point {
    Point::new(rect.x + rect.width, rect.y + rect.height / 2.0)
}

/// Left-edge centre of the target box.
pub fn target_anchor(rect: Rect) -> Point {
    Point::new(rect.x, rect.y + rect.height / 2.0)
}

/// Route an edge from `from` to `to`.
///
/// The path style depends on the distance between the two boxes' positions:
/// close nodes get a straight line, everything else a cubic curve whose
/// control points stay level with their endpoint.
pub fn route(from: Rect, to: Rect) -> EdgePath {
    let distance = Point::new(from.x, from.y).distance_to(Point::new(to.x, to.y));
    let start = source_anchor(from);
    let end = target_anchor(to);

    if distance < DIRECT_DISTANCE_THRESHOLD {
        return EdgePath {
            style: PathStyle::Direct,
            start,
            end,
            d: format!(
                "M {} {} L {} {}",
                fmt_num(start.x),
                fmt_num(start.y),
                fmt_num(end.x),
                fmt_num(end.y)
            ),
        };
    }

    let offset = ((end.x - start.x).abs() * CONTROL_OFFSET_RATIO).min(MAX_CONTROL_OFFSET);
    let c1 = Point::new(start.x + offset, start.y);
    let c2 = Point::new(end.x - offset, end.y);

    EdgePath {
        style: PathStyle::Curved,
        start,
        end,
        d: format!(
            "M {} {} C {} {}, {} {}, {} {}",
            fmt_num(start.x),
            fmt_num(start.y),
            fmt_num(c1.x),
            fmt_num(c1.y),
            fmt_num(c2.x),
            fmt_num(c2.y),
            fmt_num(end.x),
            fmt_num(end.y)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_offset_is_capped() {
        let path = route(
            Rect::new(0.0, 0.0, 200.0, 80.0),
            Rect::new(1200.0, 0.0, 200.0, 80.0),
        );
        assert_eq!(path.style, PathStyle::Curved);
        assert_eq!(path.d, "M 200 40 C 350 40, 1050 40, 1200 40");
    }

    #[test]
    fn control_points_are_level_with_endpoints() {
        let path = route(
            Rect::new(0.0, 0.0, 200.0, 80.0),
            Rect::new(300.0, 200.0, 200.0, 80.0),
        );
        assert_eq!(path.d, "M 200 40 C 250 40, 250 240, 300 240");
    }
}
