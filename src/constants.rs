//! Shared crate-wide constants.

use std::time::Duration;

/// Smallest width a resize can leave a window at, in viewport percent.
pub const MIN_WINDOW_WIDTH_PCT: f64 = 15.0;

/// Smallest height a resize can leave a window at, in viewport percent.
pub const MIN_WINDOW_HEIGHT_PCT: f64 = 15.0;

/// Portion of a dragged window, in viewport pixels, that must stay on screen
/// so the user can grab it again.
pub const MIN_VISIBLE_MARGIN_PX: f64 = 50.0;

/// Same guarantee as [`MIN_VISIBLE_MARGIN_PX`] when the viewport unit is a
/// terminal cell rather than a pixel.
pub const MIN_VISIBLE_MARGIN_CELLS: f64 = 4.0;

/// Stacking counter start; sits above every default stacking index.
pub const INITIAL_STACK_COUNTER: u32 = 10;

/// How long the "just happened" highlight stays on a window after a step.
pub const HIGHLIGHT_CLEAR_DELAY: Duration = Duration::from_millis(800);

/// Pointer id used for the single terminal mouse.
pub const TERMINAL_POINTER_ID: u64 = 0;
