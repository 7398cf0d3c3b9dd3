//! Floating geometry math shared by the window manager and the renderer.

pub mod floating;

pub use floating::{ResizeEdge, UnknownEdge, Viewport, apply_resize, clamp_position, edge_at};
