use std::io;
use std::time::{Duration, Instant};

use crate::app::ReplayApp;
use crate::config::ReplayConfig;
use crate::drivers::{InputDriver, OutputDriver};
use crate::engine::StepEngine;
use crate::error::AppError;
use crate::event_loop::{ControlFlow, EventLoop};
use crate::script::Script;

/// Drive `app` until it asks to quit, redrawing only when something changed.
pub fn run_app<O, D>(
    output: &mut O,
    driver: D,
    app: &mut ReplayApp,
    poll_interval: Duration,
) -> io::Result<()>
where
    O: OutputDriver,
    D: InputDriver,
{
    output.enter()?;
    let mut event_loop = EventLoop::new(driver, poll_interval);
    event_loop.driver().set_mouse_capture(true)?;

    let result = event_loop.run(|_, event| {
        match event {
            Some(evt) => app.handle_event(&evt),
            None => {
                app.tick(Instant::now());
                if app.take_redraw() {
                    output.draw(|frame| app.draw(frame))?;
                }
            }
        }
        if app.should_quit() {
            return Ok(ControlFlow::Quit);
        }
        Ok(app
            .wake_deadline()
            .map_or(ControlFlow::Continue, ControlFlow::WakeAt))
    });

    let released = event_loop.driver().set_mouse_capture(false);
    if let Err(err) = &released {
        tracing::warn!(error = %err, "failed to release mouse capture");
    }
    output.exit()?;
    result.and(released)
}

/// Advance a detached engine and render its state as pretty JSON.
pub fn dump_state(script: Script, config: &ReplayConfig) -> Result<String, AppError> {
    let mut engine = StepEngine::new(script).with_highlight_delay(config.highlight_delay);
    let target = match config.goto {
        Some(index) => isize::try_from(index).unwrap_or(isize::MAX),
        None => engine.timeline().last_index().map_or(-1, |i| i as isize),
    };
    engine.goto(target);
    tracing::info!(cursor = engine.cursor(), "dumping state");
    Ok(serde_json::to_string_pretty(engine.state())?)
}
