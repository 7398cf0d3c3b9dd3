use std::collections::BTreeMap;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use super::{FloatRect, WindowGeometry, WindowId};
use crate::constants::{INITIAL_STACK_COUNTER, MIN_VISIBLE_MARGIN_PX, TERMINAL_POINTER_ID};
use crate::layout::floating::{ResizeEdge, Viewport, apply_resize, clamp_position, edge_at};

/// Receiver of "raise this window" requests from the step engine.
pub trait WindowFocus {
    fn bring_to_front(&mut self, id: WindowId);
}

/// Detached engines have nobody to notify.
impl WindowFocus for () {
    fn bring_to_front(&mut self, _id: WindowId) {}
}

/// A pointer sample in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: u64,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn new(pointer_id: u64, x: f64, y: f64) -> Self {
        Self { pointer_id, x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub id: WindowId,
    pub pointer_id: u64,
    pub start_x: f64,
    pub start_y: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    pub id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_id: u64,
    pub start_x: f64,
    pub start_y: f64,
    pub origin: WindowGeometry,
}

/// The single pointer session slot. Starting a new session replaces any
/// session already in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PointerSession {
    #[default]
    Idle,
    Dragging(DragSession),
    Resizing(ResizeSession),
}

impl PointerSession {
    fn pointer_id(&self) -> Option<u64> {
        match self {
            PointerSession::Idle => None,
            PointerSession::Dragging(drag) => Some(drag.pointer_id),
            PointerSession::Resizing(resize) => Some(resize.pointer_id),
        }
    }

    pub fn window(&self) -> Option<WindowId> {
        match self {
            PointerSession::Idle => None,
            PointerSession::Dragging(drag) => Some(drag.id),
            PointerSession::Resizing(resize) => Some(resize.id),
        }
    }
}

/// Host-wide cursor state a session imposes while it owns the pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorOverride {
    pub grabbing: bool,
    pub selection_disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHit {
    pub id: WindowId,
    pub edge: Option<ResizeEdge>,
}

#[derive(Debug, Clone)]
pub struct WindowManager {
    windows: BTreeMap<WindowId, WindowGeometry>,
    stack_counter: u32,
    viewport: Option<Viewport>,
    visible_margin: f64,
    session: PointerSession,
    cursor: CursorOverride,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowManager {
    pub fn new() -> Self {
        Self {
            windows: WindowId::ALL
                .into_iter()
                .map(|id| (id, id.default_geometry()))
                .collect(),
            stack_counter: INITIAL_STACK_COUNTER,
            viewport: None,
            visible_margin: MIN_VISIBLE_MARGIN_PX,
            session: PointerSession::Idle,
            cursor: CursorOverride::default(),
        }
    }

    /// Override the on-screen margin kept while dragging, in viewport units.
    pub fn with_visible_margin(mut self, margin: f64) -> Self {
        self.visible_margin = margin;
        self
    }

    pub fn windows(&self) -> &BTreeMap<WindowId, WindowGeometry> {
        &self.windows
    }

    pub fn geometry(&self, id: WindowId) -> WindowGeometry {
        self.windows
            .get(&id)
            .copied()
            .unwrap_or_else(|| id.default_geometry())
    }

    fn geometry_mut(&mut self, id: WindowId) -> &mut WindowGeometry {
        self.windows
            .entry(id)
            .or_insert_with(|| id.default_geometry())
    }

    pub fn stack_counter(&self) -> u32 {
        self.stack_counter
    }

    /// Record the host viewport size; `None` when the host is not mounted.
    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.unwrap_or(Viewport::FALLBACK)
    }

    pub fn session(&self) -> PointerSession {
        self.session
    }

    pub fn cursor_override(&self) -> CursorOverride {
        self.cursor
    }

    /// Windows ordered back to front.
    pub fn draw_order(&self) -> Vec<WindowId> {
        let mut ids: Vec<WindowId> = self.windows.keys().copied().collect();
        ids.sort_by_key(|id| self.windows[id].z);
        ids
    }

    pub fn topmost(&self) -> Option<WindowId> {
        self.draw_order().last().copied()
    }

    pub fn bring_to_front(&mut self, id: WindowId) {
        self.stack_counter = self.stack_counter.saturating_add(1);
        let z = self.stack_counter;
        self.geometry_mut(id).z = z;
        tracing::debug!(window = %id, z, "raised window");
    }

    pub fn start_drag(&mut self, id: WindowId, pointer: PointerEvent) {
        self.end_session();
        self.bring_to_front(id);
        let geometry = self.geometry(id);
        self.session = PointerSession::Dragging(DragSession {
            id,
            pointer_id: pointer.pointer_id,
            start_x: pointer.x,
            start_y: pointer.y,
            origin_x: geometry.x,
            origin_y: geometry.y,
        });
        self.cursor = CursorOverride {
            grabbing: true,
            selection_disabled: true,
        };
        tracing::debug!(window = %id, "drag started");
    }

    pub fn start_resize(&mut self, id: WindowId, edge: ResizeEdge, pointer: PointerEvent) {
        self.end_session();
        self.bring_to_front(id);
        self.session = PointerSession::Resizing(ResizeSession {
            id,
            edge,
            pointer_id: pointer.pointer_id,
            start_x: pointer.x,
            start_y: pointer.y,
            origin: self.geometry(id),
        });
        self.cursor = CursorOverride {
            grabbing: false,
            selection_disabled: true,
        };
        tracing::debug!(window = %id, %edge, "resize started");
    }

    /// Feed a pointer move to the active session. Returns `true` when a
    /// window moved or changed size.
    pub fn pointer_move(&mut self, pointer: PointerEvent) -> bool {
        if self.session.pointer_id() != Some(pointer.pointer_id) {
            return false;
        }
        let viewport = self.viewport();
        let margin = self.visible_margin;
        match self.session {
            PointerSession::Idle => false,
            PointerSession::Dragging(drag) => {
                let (dx, dy) =
                    viewport.px_to_percent(pointer.x - drag.start_x, pointer.y - drag.start_y);
                let geometry = self.geometry_mut(drag.id);
                geometry.x = drag.origin_x + dx;
                geometry.y = drag.origin_y + dy;
                clamp_position(geometry, viewport, margin);
                true
            }
            PointerSession::Resizing(resize) => {
                let (dx, dy) = viewport
                    .px_to_percent(pointer.x - resize.start_x, pointer.y - resize.start_y);
                let resized = apply_resize(resize.origin, resize.edge, dx, dy);
                let geometry = self.geometry_mut(resize.id);
                // the stacking index may have moved on since the session began
                *geometry = WindowGeometry {
                    z: geometry.z,
                    ..resized
                };
                true
            }
        }
    }

    /// End the active session if `pointer` owns it.
    pub fn pointer_up(&mut self, pointer: PointerEvent) -> bool {
        if self.session.pointer_id() != Some(pointer.pointer_id) {
            return false;
        }
        self.end_session();
        true
    }

    fn end_session(&mut self) {
        if let Some(id) = self.session.window() {
            tracing::debug!(window = %id, "pointer session ended");
        }
        self.session = PointerSession::Idle;
        self.cursor = CursorOverride::default();
    }

    pub fn float_rect(&self, id: WindowId) -> FloatRect {
        self.geometry(id).to_float_rect(self.viewport())
    }

    /// Topmost window under a cell, and the border handle under it if any.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<WindowHit> {
        self.draw_order().into_iter().rev().find_map(|id| {
            let rect = self.float_rect(id);
            rect.contains(column, row).then(|| WindowHit {
                id,
                edge: edge_at(rect, column, row),
            })
        })
    }

    /// Route a terminal mouse event into drag/resize sessions.
    pub fn handle_mouse_event(&mut self, mouse: &MouseEvent) -> bool {
        let pointer = PointerEvent::new(
            TERMINAL_POINTER_ID,
            mouse.column as f64,
            mouse.row as f64,
        );
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(hit) = self.hit_test(mouse.column, mouse.row) else {
                    return false;
                };
                match hit.edge {
                    Some(edge) => self.start_resize(hit.id, edge, pointer),
                    None => self.start_drag(hit.id, pointer),
                }
                true
            }
            MouseEventKind::Drag(MouseButton::Left) => self.pointer_move(pointer),
            MouseEventKind::Up(MouseButton::Left) => self.pointer_up(pointer),
            _ => false,
        }
    }
}

impl WindowFocus for WindowManager {
    fn bring_to_front(&mut self, id: WindowId) {
        WindowManager::bring_to_front(self, id);
    }
}
