use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{MIN_WINDOW_HEIGHT_PCT, MIN_WINDOW_WIDTH_PCT};
use crate::window::{FloatRect, WindowGeometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown resize edge tag: {0:?}")]
pub struct UnknownEdge(pub String);

impl ResizeEdge {
    pub const ALL: [ResizeEdge; 8] = [
        ResizeEdge::North,
        ResizeEdge::South,
        ResizeEdge::East,
        ResizeEdge::West,
        ResizeEdge::NorthEast,
        ResizeEdge::NorthWest,
        ResizeEdge::SouthEast,
        ResizeEdge::SouthWest,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ResizeEdge::North => "n",
            ResizeEdge::South => "s",
            ResizeEdge::East => "e",
            ResizeEdge::West => "w",
            ResizeEdge::NorthEast => "ne",
            ResizeEdge::NorthWest => "nw",
            ResizeEdge::SouthEast => "se",
            ResizeEdge::SouthWest => "sw",
        }
    }

    // Horizontal sides match by containment, vertical sides by exact tag.
    // Keep the two rules distinct.

    pub fn resizes_left(self) -> bool {
        self.tag().contains('w')
    }

    pub fn resizes_right(self) -> bool {
        self.tag().contains('e')
    }

    pub fn resizes_top(self) -> bool {
        matches!(self.tag(), "n" | "nw" | "ne")
    }

    pub fn resizes_bottom(self) -> bool {
        matches!(self.tag(), "s" | "sw" | "se")
    }
}

impl fmt::Display for ResizeEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ResizeEdge {
    type Err = UnknownEdge;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResizeEdge::ALL
            .into_iter()
            .find(|edge| edge.tag() == s)
            .ok_or_else(|| UnknownEdge(s.to_string()))
    }
}

/// Host viewport size in its own pixel unit (screen pixels or terminal cells).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Used whenever the host cannot report a size.
    pub const FALLBACK: Viewport = Viewport {
        width: 1.0,
        height: 1.0,
    };

    pub fn new(width: f64, height: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        (valid(width) && valid(height)).then_some(Self { width, height })
    }

    pub fn px_to_percent(&self, dx: f64, dy: f64) -> (f64, f64) {
        (dx / self.width * 100.0, dy / self.height * 100.0)
    }
}

/// Resize `start` by a pointer delta given in viewport percent.
///
/// Sizes are floored at the minimum; shrinking from the left or top moves the
/// origin so the opposite edge stays put. Position is never clamped here.
pub fn apply_resize(start: WindowGeometry, edge: ResizeEdge, dx: f64, dy: f64) -> WindowGeometry {
    let mut out = start;
    if edge.resizes_right() {
        out.w = (start.w + dx).max(MIN_WINDOW_WIDTH_PCT);
    }
    if edge.resizes_left() {
        let width = (start.w - dx).max(MIN_WINDOW_WIDTH_PCT);
        out.x = start.x + (start.w - width);
        out.w = width;
    }
    if edge.resizes_bottom() {
        out.h = (start.h + dy).max(MIN_WINDOW_HEIGHT_PCT);
    }
    if edge.resizes_top() {
        let height = (start.h - dy).max(MIN_WINDOW_HEIGHT_PCT);
        out.y = start.y + (start.h - height);
        out.h = height;
    }
    out
}

/// Keep at least `margin` pixels of a dragged window inside the viewport.
///
/// The window may hang off the left edge but never above the top.
pub fn clamp_position(geometry: &mut WindowGeometry, viewport: Viewport, margin: f64) {
    let min_x = -(geometry.w / 100.0) * viewport.width + margin;
    let max_x = viewport.width - margin;
    let min_y = 0.0;
    let max_y = viewport.height - margin;

    let px_x = geometry.x / 100.0 * viewport.width;
    let px_y = geometry.y / 100.0 * viewport.height;

    // min/max rather than f64::clamp: a tiny viewport can invert the bounds.
    geometry.x = px_x.min(max_x).max(min_x) / viewport.width * 100.0;
    geometry.y = px_y.min(max_y).max(min_y) / viewport.height * 100.0;
}

/// Which border handle of `rect`, if any, sits under the given cell.
pub fn edge_at(rect: FloatRect, column: u16, row: u16) -> Option<ResizeEdge> {
    if rect.width < 2 || rect.height < 2 || !rect.contains(column, row) {
        return None;
    }
    let (c, r) = (column as i32, row as i32);
    let left = c == rect.x;
    let right = c == rect.right() - 1;
    let top = r == rect.y;
    let bottom = r == rect.bottom() - 1;
    match (top, bottom, left, right) {
        (true, _, true, _) => Some(ResizeEdge::NorthWest),
        (true, _, _, true) => Some(ResizeEdge::NorthEast),
        (_, true, true, _) => Some(ResizeEdge::SouthWest),
        (_, true, _, true) => Some(ResizeEdge::SouthEast),
        (true, ..) => Some(ResizeEdge::North),
        (_, true, ..) => Some(ResizeEdge::South),
        (_, _, true, _) => Some(ResizeEdge::West),
        (_, _, _, true) => Some(ResizeEdge::East),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom(x: f64, y: f64, w: f64, h: f64) -> WindowGeometry {
        WindowGeometry { x, y, w, h, z: 0 }
    }

    #[test]
    fn west_resize_keeps_right_edge() {
        let start = geom(10.0, 10.0, 30.0, 20.0);
        let res = apply_resize(start, ResizeEdge::West, 5.0, 0.0);
        assert_eq!(res.w, 25.0);
        assert_eq!(res.x, 15.0);
        assert_eq!((res.y, res.h), (10.0, 20.0));
    }

    #[test]
    fn west_resize_past_width_floors_at_minimum() {
        let start = geom(10.0, 10.0, 30.0, 20.0);
        let res = apply_resize(start, ResizeEdge::West, 50.0, 0.0);
        assert_eq!(res.w, MIN_WINDOW_WIDTH_PCT);
        assert_eq!(res.x, 10.0 + (30.0 - MIN_WINDOW_WIDTH_PCT));
    }

    #[test]
    fn north_resize_drag_down() {
        let start = geom(0.0, 50.0, 20.0, 20.0);
        let res = apply_resize(start, ResizeEdge::North, 0.0, 5.0);
        assert_eq!(res, geom(0.0, 55.0, 20.0, 15.0));
    }

    #[test]
    fn north_resize_drag_up() {
        let start = geom(0.0, 50.0, 20.0, 20.0);
        let res = apply_resize(start, ResizeEdge::North, 0.0, -5.0);
        assert_eq!(res, geom(0.0, 45.0, 20.0, 25.0));
    }

    #[test]
    fn corners_combine_both_axes() {
        let start = geom(10.0, 10.0, 30.0, 30.0);
        let se = apply_resize(start, ResizeEdge::SouthEast, 4.0, 6.0);
        assert_eq!(se, geom(10.0, 10.0, 34.0, 36.0));
        let nw = apply_resize(start, ResizeEdge::NorthWest, 4.0, 6.0);
        assert_eq!(nw, geom(14.0, 16.0, 26.0, 24.0));
        let ne = apply_resize(start, ResizeEdge::NorthEast, 4.0, 6.0);
        assert_eq!(ne, geom(10.0, 16.0, 34.0, 24.0));
        let sw = apply_resize(start, ResizeEdge::SouthWest, 4.0, 6.0);
        assert_eq!(sw, geom(14.0, 10.0, 26.0, 36.0));
    }

    #[test]
    fn resize_is_not_clamped_to_viewport() {
        let start = geom(90.0, 90.0, 30.0, 30.0);
        let res = apply_resize(start, ResizeEdge::SouthEast, 500.0, 500.0);
        assert_eq!(res.w, 530.0);
        assert_eq!(res.h, 530.0);
    }

    #[test]
    fn side_rules_by_tag() {
        assert!(ResizeEdge::SouthWest.resizes_left());
        assert!(!ResizeEdge::SouthWest.resizes_right());
        assert!(ResizeEdge::NorthEast.resizes_top());
        assert!(!ResizeEdge::East.resizes_top());
        assert!(!ResizeEdge::East.resizes_bottom());
        assert_eq!("se".parse::<ResizeEdge>(), Ok(ResizeEdge::SouthEast));
        assert!("x".parse::<ResizeEdge>().is_err());
    }

    #[test]
    fn clamp_left_keeps_margin_visible() {
        let viewport = Viewport::new(1000.0, 1000.0).unwrap();
        let mut g = geom(-500.0, 10.0, 33.0, 20.0);
        clamp_position(&mut g, viewport, 50.0);
        let expected = (-(33.0 / 100.0) * 1000.0 + 50.0) / 1000.0 * 100.0;
        assert!((g.x - expected).abs() < 1e-9, "x = {}", g.x);
        assert!((g.x - -28.0).abs() < 1e-9);
        assert_eq!(g.y, 10.0);
    }

    #[test]
    fn clamp_right_bottom_and_top() {
        let viewport = Viewport::new(1000.0, 500.0).unwrap();
        let mut g = geom(200.0, 300.0, 33.0, 20.0);
        clamp_position(&mut g, viewport, 50.0);
        assert!((g.x - 95.0).abs() < 1e-9);
        assert!((g.y - 90.0).abs() < 1e-9);

        let mut above = geom(10.0, -40.0, 33.0, 20.0);
        clamp_position(&mut above, viewport, 50.0);
        assert_eq!(above.y, 0.0);
    }

    #[test]
    fn clamp_survives_fallback_viewport() {
        let mut g = geom(10.0, 10.0, 33.0, 20.0);
        clamp_position(&mut g, Viewport::FALLBACK, 50.0);
        assert!(g.x.is_finite() && g.y.is_finite());
    }

    #[test]
    fn viewport_rejects_degenerate_sizes() {
        assert!(Viewport::new(0.0, 10.0).is_none());
        assert!(Viewport::new(10.0, f64::NAN).is_none());
        let v = Viewport::new(200.0, 50.0).unwrap();
        assert_eq!(v.px_to_percent(20.0, 5.0), (10.0, 10.0));
    }

    #[test]
    fn edge_handles_on_border() {
        let rect = FloatRect {
            x: 2,
            y: 2,
            width: 10,
            height: 5,
        };
        assert_eq!(edge_at(rect, 2, 2), Some(ResizeEdge::NorthWest));
        assert_eq!(edge_at(rect, 11, 2), Some(ResizeEdge::NorthEast));
        assert_eq!(edge_at(rect, 2, 6), Some(ResizeEdge::SouthWest));
        assert_eq!(edge_at(rect, 11, 6), Some(ResizeEdge::SouthEast));
        assert_eq!(edge_at(rect, 5, 2), Some(ResizeEdge::North));
        assert_eq!(edge_at(rect, 5, 6), Some(ResizeEdge::South));
        assert_eq!(edge_at(rect, 2, 4), Some(ResizeEdge::West));
        assert_eq!(edge_at(rect, 11, 4), Some(ResizeEdge::East));
        assert_eq!(edge_at(rect, 5, 4), None);
        assert_eq!(edge_at(rect, 0, 0), None);
    }
}
