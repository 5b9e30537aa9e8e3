/// Run state of a game.
///
/// ```text
///            pause            pause key / restart
///   Active ─────────▶ Paused ────────────────────▶ Active (fresh game)
///     ▲  ◀───────────   │
///     │   pause button  │
///     │                 │
///     │ overflow        │
///     ▼                 │
///   GameOver ───────────┴── pause key / restart ─▶ Active (fresh game)
/// ```
///
/// Moves, rotations and clock ticks are only honored while `Active`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display, derive_more::IsVariant,
)]
pub enum GameState {
    #[default]
    #[display("active")]
    Active,
    #[display("paused")]
    Paused,
    #[display("game over")]
    GameOver,
}

impl GameState {
    /// Returns whether moves and rotations are accepted.
    #[must_use]
    pub const fn accepts_piece_actions(self) -> bool {
        matches!(self, GameState::Active)
    }

    /// Returns whether the drop clock should be running.
    #[must_use]
    pub const fn clock_runs(self) -> bool {
        matches!(self, GameState::Active)
    }

    /// Plain pause toggle: `Active ⇄ Paused`. `GameOver` stays as is.
    #[must_use]
    pub const fn toggled_pause(self) -> Self {
        match self {
            GameState::Active => GameState::Paused,
            GameState::Paused => GameState::Active,
            GameState::GameOver => GameState::GameOver,
        }
    }
}
