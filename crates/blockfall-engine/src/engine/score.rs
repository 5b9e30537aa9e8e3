/// Lines needed to advance one level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Points per cleared line at level 1.
pub const POINTS_PER_LINE: u64 = 100;

/// Result of a single line-clear event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearOutcome {
    /// Points earned by this event.
    pub score_gained: u64,
    /// Level after the event.
    pub level: u32,
    /// Total lines cleared after the event.
    pub total_lines: u32,
}

/// Computes the effect of clearing `lines_cleared` lines at once.
///
/// All inputs are explicit: the score multiplier is the level *before* the
/// event, and the new level is derived from `lines_before + lines_cleared`.
///
/// # Example
///
/// ```
/// use blockfall_engine::apply_clear_event;
///
/// let outcome = apply_clear_event(9, 2, 1);
/// assert_eq!(outcome.score_gained, 200);
/// assert_eq!(outcome.level, 2);
/// assert_eq!(outcome.total_lines, 11);
/// ```
#[must_use]
pub fn apply_clear_event(lines_before: u32, lines_cleared: u32, current_level: u32) -> ClearOutcome {
    let total_lines = lines_before + lines_cleared;
    ClearOutcome {
        score_gained: u64::from(lines_cleared) * POINTS_PER_LINE * u64::from(current_level),
        level: total_lines / LINES_PER_LEVEL + 1,
        total_lines,
    }
}

/// Score, cleared-line count and level of one game.
///
/// - **Score**: grows only on line clears, by `lines × 100 × level`
/// - **Lines**: total lines cleared
/// - **Level**: `lines / 10 + 1`, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreKeeper {
    score: u64,
    lines: u32,
    level: u32,
}

impl Default for ScoreKeeper {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreKeeper {
    /// Score 0, lines 0, level 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            lines: 0,
            level: 1,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn lines(&self) -> u32 {
        self.lines
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Records a landing that cleared `lines_cleared` lines.
    ///
    /// Landings that clear nothing leave the keeper untouched. Returns whether
    /// the level changed.
    pub fn record_clear(&mut self, lines_cleared: u32) -> bool {
        if lines_cleared == 0 {
            return false;
        }
        let outcome = apply_clear_event(self.lines, lines_cleared, self.level);
        let level_changed = outcome.level != self.level;
        self.score += outcome.score_gained;
        self.lines = outcome.total_lines;
        self.level = outcome.level;
        level_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeper() {
        let keeper = ScoreKeeper::new();
        assert_eq!(keeper.score(), 0);
        assert_eq!(keeper.lines(), 0);
        assert_eq!(keeper.level(), 1);
    }

    #[test]
    fn test_two_lines_at_level_three() {
        let outcome = apply_clear_event(20, 2, 3);
        assert_eq!(outcome.score_gained, 600);
        assert_eq!(outcome.total_lines, 22);
        assert_eq!(outcome.level, 3);
    }

    #[test]
    fn test_level_crosses_ten_lines() {
        let outcome = apply_clear_event(9, 2, 1);
        assert_eq!(outcome.level, 2);
        assert_eq!(outcome.total_lines, 11);
        assert_eq!(outcome.score_gained, 200, "multiplier is the level before the event");
    }

    #[test]
    fn test_record_clear_zero_lines_is_noop() {
        let mut keeper = ScoreKeeper::new();
        assert!(!keeper.record_clear(0));
        assert_eq!(keeper, ScoreKeeper::new());
    }

    #[test]
    fn test_record_clear_accumulates() {
        let mut keeper = ScoreKeeper::new();
        assert!(!keeper.record_clear(4));
        assert_eq!((keeper.score(), keeper.lines(), keeper.level()), (400, 4, 1));

        assert!(!keeper.record_clear(4));
        assert_eq!((keeper.score(), keeper.lines(), keeper.level()), (800, 8, 1));

        assert!(keeper.record_clear(3), "11 lines reaches level 2");
        assert_eq!((keeper.score(), keeper.lines(), keeper.level()), (1100, 11, 2));

        assert!(!keeper.record_clear(2));
        assert_eq!((keeper.score(), keeper.lines(), keeper.level()), (1500, 13, 2));
    }

    #[test]
    fn test_level_grows_without_cap() {
        let mut keeper = ScoreKeeper::new();
        for _ in 0..30 {
            keeper.record_clear(4);
        }
        assert_eq!(keeper.lines(), 120);
        assert_eq!(keeper.level(), 13);
    }
}
