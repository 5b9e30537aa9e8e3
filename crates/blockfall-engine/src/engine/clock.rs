use std::time::Duration;

/// Tick period at level 1.
pub const BASE_TICK_PERIOD: Duration = Duration::from_millis(1000);
/// How much faster each level ticks.
pub const TICK_PERIOD_STEP: Duration = Duration::from_millis(100);
/// Fastest possible tick period.
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(100);

/// Returns the automatic-drop period for `level`.
///
/// `max(100ms, 1000ms - (level - 1) * 100ms)`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::tick_period;
///
/// assert_eq!(tick_period(1), Duration::from_millis(1000));
/// assert_eq!(tick_period(5), Duration::from_millis(600));
/// assert_eq!(tick_period(12), Duration::from_millis(100));
/// ```
#[must_use]
pub fn tick_period(level: u32) -> Duration {
    let speedup = TICK_PERIOD_STEP.saturating_mul(level.saturating_sub(1));
    BASE_TICK_PERIOD.saturating_sub(speedup).max(MIN_TICK_PERIOD)
}

/// Identifies one armed configuration of a [`GameClock`].
///
/// A handle stays valid until the clock is re-armed or cancelled. Ticks
/// delivered with an outdated handle must be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockHandle {
    generation: u64,
    period: Duration,
}

impl ClockHandle {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }
}

/// Cancellable periodic scheduler for automatic drops.
///
/// The clock does not measure time itself: it records which configuration is
/// current, and the host's timer delivers ticks tagged with the handle it was
/// armed with. Arming always cancels the previous handle first, so at most
/// one handle is live at any time.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::GameClock;
///
/// let mut clock = GameClock::new();
/// let first = clock.arm(Duration::from_millis(1000));
/// let second = clock.arm(Duration::from_millis(900));
///
/// assert!(!clock.is_current(first));
/// assert!(clock.is_current(second));
///
/// clock.cancel();
/// assert!(!clock.is_current(second));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GameClock {
    last_generation: u64,
    armed: Option<ClockHandle>,
}

impl GameClock {
    /// Creates a stopped clock.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_generation: 0,
            armed: None,
        }
    }

    /// Cancels the current handle, if any, and arms a new one.
    pub fn arm(&mut self, period: Duration) -> ClockHandle {
        self.cancel();
        self.last_generation += 1;
        let handle = ClockHandle {
            generation: self.last_generation,
            period,
        };
        self.armed = Some(handle);
        handle
    }

    /// Stops the clock and returns the handle that was live.
    pub fn cancel(&mut self) -> Option<ClockHandle> {
        self.armed.take()
    }

    #[must_use]
    pub const fn handle(&self) -> Option<ClockHandle> {
        self.armed
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.armed.is_some()
    }

    /// Returns whether ticks tagged with `handle` should still be honored.
    #[must_use]
    pub fn is_current(&self, handle: ClockHandle) -> bool {
        self.armed == Some(handle)
    }
}
