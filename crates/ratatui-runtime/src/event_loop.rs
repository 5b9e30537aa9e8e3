use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::event::TuiEvent;

/// Rendering trigger mode.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// Render after state changes (tick or crossterm event).
    #[default]
    OnDirty,
    /// Render after state changes, but with minimum interval between renders.
    ///
    /// If events occur faster than the interval, they are batched into one render.
    Throttled(Duration),
}

impl RenderMode {
    /// Creates `Throttled` mode from frame rate (FPS).
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// A periodic timer armed by the application.
#[derive(Debug, Clone, Copy)]
struct Timer {
    period: Duration,
    next_due: Instant,
}

/// Event loop state management.
///
/// Holds at most one armed timer and the render schedule, and returns the
/// next event via `next()`. Without an armed timer no tick is ever produced.
#[derive(Debug)]
pub(super) struct EventLoop {
    timer: Option<Timer>,
    render_mode: RenderMode,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates a new `EventLoop`.
    ///
    /// No timer is armed, and render mode defaults to `OnDirty`.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        let past_time = now.checked_sub(Duration::from_secs(86400)).unwrap_or(now);
        Self {
            timer: None,
            render_mode: RenderMode::default(),
            last_render: past_time,
            dirty: true, // Initial render is required on startup
        }
    }

    /// Arms the timer to fire every `period`, the first time at `now + period`.
    ///
    /// Any previously armed timer is discarded and never fires again.
    pub(super) fn arm_timer(&mut self, period: Duration, now: Instant) {
        self.timer = Some(Timer {
            period,
            next_due: now + period,
        });
    }

    /// Disarms the timer.
    pub(super) fn cancel_timer(&mut self) {
        self.timer = None;
    }

    pub(super) fn timer_period(&self) -> Option<Duration> {
        self.timer.map(|timer| timer.period)
    }

    /// Sets the render mode.
    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Returns the next event.
    ///
    /// Blocks until the timer expires, a render is due, or a crossterm event
    /// occurs.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.due_event(now) {
                return Ok(event);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    /// Returns the tick or render event due at `now`, if any.
    ///
    /// A tick that is late by more than one period fires once; the following
    /// tick is scheduled a full period after `now`.
    fn due_event(&mut self, now: Instant) -> Option<TuiEvent> {
        if let Some(timer) = &mut self.timer
            && now >= timer.next_due
        {
            timer.next_due += timer.period;
            if timer.next_due <= now {
                timer.next_due = now + timer.period;
            }
            self.dirty = true;
            return Some(TuiEvent::Tick);
        }

        let do_render = match self.render_mode {
            RenderMode::OnDirty => self.dirty,
            RenderMode::Throttled(interval) => {
                self.dirty && now.duration_since(self.last_render) >= interval
            }
        };
        if do_render {
            self.last_render = now;
            self.dirty = false;
            return Some(TuiEvent::Render);
        }

        None
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.timer.map(|timer| timer.next_due);
        let next_render_at = match self.render_mode {
            RenderMode::OnDirty => self.dirty.then_some(now),
            RenderMode::Throttled(interval) => self.dirty.then(|| self.last_render + interval),
        };
        let next_timeout_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}
