mod window_manager;

use std::fmt;

use ratatui::prelude::Rect;
use serde::Serialize;

use crate::layout::floating::Viewport;

pub use window_manager::{
    CursorOverride, DragSession, PointerEvent, PointerSession, ResizeSession, WindowFocus,
    WindowHit, WindowManager,
};

/// The fixed set of panes a replay renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowId {
    Chat,
    Terminal,
    Browser,
    Editor,
    Design,
}

impl WindowId {
    pub const ALL: [WindowId; 5] = [
        WindowId::Chat,
        WindowId::Terminal,
        WindowId::Browser,
        WindowId::Editor,
        WindowId::Design,
    ];

    pub fn title(self) -> &'static str {
        match self {
            WindowId::Chat => "Chat",
            WindowId::Terminal => "Terminal",
            WindowId::Browser => "Browser",
            WindowId::Editor => "Editor",
            WindowId::Design => "Design",
        }
    }

    /// Where each window sits before the user touches anything.
    pub fn default_geometry(self) -> WindowGeometry {
        let (x, y, w, h, z) = match self {
            WindowId::Browser => (1.0, 1.0, 33.0, 48.0, 1),
            WindowId::Design => (1.0, 1.0, 33.0, 48.0, 0),
            WindowId::Terminal => (35.0, 1.0, 33.0, 48.0, 2),
            WindowId::Editor => (1.0, 51.0, 67.0, 48.0, 3),
            WindowId::Chat => (69.0, 1.0, 30.0, 98.0, 5),
        };
        WindowGeometry { x, y, w, h, z }
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Floating window placement in viewport percent plus its stacking index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowGeometry {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub z: u32,
}

impl WindowGeometry {
    /// Resolve to a signed cell rectangle, rounding to the nearest cell.
    pub fn to_float_rect(&self, viewport: Viewport) -> FloatRect {
        let to_cells = |pct: f64, extent: f64| (pct / 100.0 * extent).round();
        let width = to_cells(self.w, viewport.width).clamp(1.0, u16::MAX as f64);
        let height = to_cells(self.h, viewport.height).clamp(1.0, u16::MAX as f64);
        FloatRect {
            x: to_cells(self.x, viewport.width) as i32,
            y: to_cells(self.y, viewport.height) as i32,
            width: width as u16,
            height: height as u16,
        }
    }
}

/// Signed floating rectangle origin with unsigned size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl FloatRect {
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        let (c, r) = (column as i32, row as i32);
        c >= self.x && c < self.right() && r >= self.y && r < self.bottom()
    }

    /// The part of this rectangle that lands inside `bounds`.
    pub fn visible_in(&self, bounds: Rect) -> Rect {
        let left = self.x.max(bounds.x as i32);
        let top = self.y.max(bounds.y as i32);
        let right = self.right().min(bounds.right() as i32);
        let bottom = self.bottom().min(bounds.bottom() as i32);
        if right <= left || bottom <= top {
            return Rect::default();
        }
        Rect {
            x: left as u16,
            y: top as u16,
            width: (right - left) as u16,
            height: (bottom - top) as u16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stacking_indices_are_unique() {
        let mut zs: Vec<u32> = WindowId::ALL
            .iter()
            .map(|id| id.default_geometry().z)
            .collect();
        zs.sort_unstable();
        zs.dedup();
        assert_eq!(zs.len(), WindowId::ALL.len());
        assert!(zs.iter().all(|&z| z < crate::constants::INITIAL_STACK_COUNTER));
    }

    #[test]
    fn geometry_resolves_to_cells() {
        let g = WindowGeometry {
            x: 10.0,
            y: 50.0,
            w: 25.0,
            h: 50.0,
            z: 0,
        };
        let viewport = Viewport::new(80.0, 24.0).expect("viewport");
        let r = g.to_float_rect(viewport);
        assert_eq!(
            r,
            FloatRect {
                x: 8,
                y: 12,
                width: 20,
                height: 12
            }
        );
    }

    #[test]
    fn visible_in_clips_negative_offsets() {
        let bounds = Rect::new(0, 0, 80, 24);
        let rect = FloatRect {
            x: -5,
            y: 3,
            width: 20,
            height: 6,
        };
        assert_eq!(rect.visible_in(bounds), Rect::new(0, 3, 15, 6));
        let gone = FloatRect {
            x: 90,
            y: 0,
            width: 4,
            height: 4,
        };
        assert_eq!(gone.visible_in(bounds), Rect::default());
    }

    #[test]
    fn contains_handles_signed_origin() {
        let rect = FloatRect {
            x: -2,
            y: 1,
            width: 4,
            height: 2,
        };
        assert!(rect.contains(0, 1));
        assert!(rect.contains(1, 2));
        assert!(!rect.contains(2, 1));
        assert!(!rect.contains(0, 3));
    }
}
