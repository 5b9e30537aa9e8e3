use std::{
    io,
    time::{Duration, Instant},
};

use crate::{
    App,
    event::TuiEvent,
    event_loop::{EventLoop, RenderMode},
};

/// TUI application runtime.
///
/// Manages the event loop and executes applications that implement the `App` trait.
///
/// The runtime owns a single timer slot. Arming it replaces whatever timer
/// was armed before, so an application never receives ticks from a timer it
/// has replaced or cancelled.
#[derive(Default, Debug)]
pub struct Runtime {
    events: EventLoop,
}

impl Runtime {
    /// Creates a new Runtime.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer to tick every `period`, starting one period from now.
    ///
    /// Replaces any previously armed timer.
    pub fn arm_timer(&mut self, period: Duration) {
        self.events.arm_timer(period, Instant::now());
    }

    /// Disarms the timer. No tick is delivered until it is armed again.
    pub fn cancel_timer(&mut self) {
        self.events.cancel_timer();
    }

    /// Returns the period of the armed timer, if any.
    #[must_use]
    pub fn timer_period(&self) -> Option<Duration> {
        self.events.timer_period()
    }

    /// Sets the render mode.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Runs the application.
    ///
    /// 1. Calls `app.init()` for initialization
    /// 2. Runs the event loop until `app.should_exit()` returns true
    ///    - `Event::Tick`: calls `app.update()`
    ///    - `Event::Render`: calls `app.draw()`
    ///    - `Event::Crossterm`: calls `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => {
                        app.update(&mut self);
                    }
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => {
                        app.handle_event(&mut self, event);
                    }
                }
            }
            Ok(())
        })
    }
}
