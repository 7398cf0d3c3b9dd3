use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    /// Keep running, and make sure the handler runs again by this instant
    /// even if no input arrives.
    WakeAt(Instant),
    Quit,
}

/// The single loop that owns input for the replay UI.
///
/// The handler is called with `None` once per iteration (time-driven work
/// such as clearing the highlight and redrawing) and with `Some(event)` for
/// every input event. Queued events are drained before the next idle call.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    /// How long to block on input given the handler's last wake request.
    pub fn poll_timeout(&self, wake_at: Option<Instant>, now: Instant) -> Duration {
        match wake_at {
            Some(deadline) => deadline
                .saturating_duration_since(now)
                .min(self.poll_interval),
            None => self.poll_interval,
        }
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            let wake_at = match handler(&mut self.driver, None)? {
                ControlFlow::Quit => return Ok(()),
                ControlFlow::WakeAt(deadline) => Some(deadline),
                ControlFlow::Continue => None,
            };

            let timeout = self.poll_timeout(wake_at, Instant::now());
            if !self.driver.poll(timeout)? {
                continue;
            }
            // Drain bursts (mouse drags) so redraws do not fall behind input.
            loop {
                let event = self.driver.read()?;
                if handler(&mut self.driver, Some(event))? == ControlFlow::Quit {
                    return Ok(());
                }
                if !self.driver.poll(Duration::ZERO)? {
                    break;
                }
            }
        }
    }
}
