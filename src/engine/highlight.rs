use std::time::{Duration, Instant};

use crate::constants::HIGHLIGHT_CLEAR_DELAY;

/// Single-slot deadline for clearing the active-window highlight.
///
/// Arming always replaces the pending deadline, so only the most recent step
/// decides when the highlight goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for HighlightTimer {
    fn default() -> Self {
        Self::new(HIGHLIGHT_CLEAR_DELAY)
    }
}

impl HighlightTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Disarm and return `true` if the deadline has passed at `now`.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
