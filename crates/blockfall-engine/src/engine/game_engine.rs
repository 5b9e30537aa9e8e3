use std::fmt;

use tracing::{debug, info, trace};

use crate::core::{ActivePiece, Board, Direction};

use super::{
    Action, ClockHandle, GameClock, GameState, Key, PieceSeed, PieceSource, RandomPieces,
    ScoreKeeper, map_key, tick_period,
};

/// What a single move request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MoveOutcome {
    /// The piece was translated.
    Moved,
    /// A sideways move hit a wall or a filled cell; nothing changed.
    Blocked,
    /// The piece could not move down and was merged into the board. A new
    /// piece has already spawned.
    Landed { cleared_lines: u32 },
    /// The piece landed without ever leaving the top row; the game is over.
    ToppedOut { cleared_lines: u32 },
    /// The request was not accepted in the current state.
    Ignored,
}

struct CloseCallback(Box<dyn FnOnce()>);

impl fmt::Debug for CloseCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CloseCallback(..)")
    }
}

/// One falling-block game.
///
/// The engine owns the board, the active piece, the score, the drop clock and
/// the run state. Every public operation runs to completion and either applies
/// or is a silent no-op; nothing on the action path can fail.
///
/// Whenever the active piece, the level or the run state changes, the clock is
/// cancelled and re-armed with the period of the current level (or left
/// stopped when the game is not active). Ticks carrying an outdated
/// [`ClockHandle`] are ignored.
#[derive(Debug)]
pub struct GameEngine<S = RandomPieces> {
    board: Board,
    piece: Option<ActivePiece>,
    score: ScoreKeeper,
    clock: GameClock,
    state: GameState,
    source: S,
    on_close: Option<CloseCallback>,
    closed: bool,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine {
    /// Starts a game with randomly drawn pieces.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(RandomPieces::new())
    }

    /// Like [`Self::new`], but with a specific seed for the piece sequence.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_source(RandomPieces::with_seed(seed))
    }
}

impl<S> GameEngine<S>
where
    S: PieceSource,
{
    /// Starts a game whose pieces come from `source`.
    ///
    /// The first piece is spawned and the clock armed before this returns.
    #[must_use]
    pub fn with_source(source: S) -> Self {
        let mut engine = Self {
            board: Board::EMPTY,
            piece: None,
            score: ScoreKeeper::new(),
            clock: GameClock::new(),
            state: GameState::Active,
            source,
            on_close: None,
            closed: false,
        };
        engine.spawn_piece();
        engine
    }

    /// Registers the callback invoked once by [`Self::close`].
    #[must_use]
    pub fn on_close(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_close = Some(CloseCallback(Box::new(callback)));
        self
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the falling piece, or `None` once the game is over.
    #[must_use]
    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.piece.as_ref()
    }

    #[must_use]
    pub fn score(&self) -> &ScoreKeeper {
        &self.score
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Maps `key` through [`map_key`] and applies the resulting action.
    ///
    /// Returns whether anything changed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        map_key(key, self.state).is_some_and(|action| self.apply(action))
    }

    /// Applies `action`. Returns whether anything changed.
    pub fn apply(&mut self, action: Action) -> bool {
        if self.closed {
            return false;
        }
        match action {
            Action::Move(direction) => {
                !matches!(
                    self.move_piece(direction),
                    MoveOutcome::Blocked | MoveOutcome::Ignored
                )
            }
            Action::Rotate => self.rotate(),
            Action::Pause => self.press_pause(),
            Action::TogglePause => self.toggle_pause(),
            Action::Restart => {
                self.restart();
                true
            }
            Action::Close => self.close(),
        }
    }

    /// Handles one expiry of the timer armed for `handle`.
    ///
    /// Moves the piece down, unless `handle` is no longer current or the game
    /// is not active.
    pub fn tick(&mut self, handle: ClockHandle) -> MoveOutcome {
        if self.closed || !self.clock.is_current(handle) || !self.state.clock_runs() {
            trace!(generation = handle.generation(), "stale tick ignored");
            return MoveOutcome::Ignored;
        }
        self.move_piece(Direction::Down)
    }

    /// Translates the active piece one cell.
    ///
    /// Sideways moves are silently dropped when invalid. An invalid downward
    /// move lands the piece instead: it is merged into the board, full rows
    /// are cleared and scored, and either a new piece spawns or the game ends.
    pub fn move_piece(&mut self, direction: Direction) -> MoveOutcome {
        if self.closed || !self.state.accepts_piece_actions() {
            return MoveOutcome::Ignored;
        }
        let Some(piece) = self.piece else {
            return MoveOutcome::Ignored;
        };

        let moved = piece.moved(direction);
        if self.board.is_valid_move(moved.shape(), moved.position()) {
            self.piece = Some(moved);
            self.rearm_clock();
            return MoveOutcome::Moved;
        }
        if direction.is_down() {
            self.land(piece)
        } else {
            MoveOutcome::Blocked
        }
    }

    /// Rotates the active piece clockwise in place, if the result fits.
    pub fn rotate(&mut self) -> bool {
        if self.closed || !self.state.accepts_piece_actions() {
            return false;
        }
        let Some(piece) = self.piece else {
            return false;
        };
        let rotated = piece.rotated();
        if !self.board.is_valid_move(rotated.shape(), rotated.position()) {
            return false;
        }
        self.piece = Some(rotated);
        self.rearm_clock();
        true
    }

    /// The pause key: pauses an active game and restarts a paused or finished
    /// one.
    pub fn press_pause(&mut self) -> bool {
        if self.closed {
            return false;
        }
        match self.state {
            GameState::Active => {
                self.state = GameState::Paused;
                debug!("game paused");
                self.rearm_clock();
            }
            GameState::Paused | GameState::GameOver => self.restart(),
        }
        true
    }

    /// The pause button: switches between active and paused, keeping the game.
    ///
    /// Does nothing once the game is over.
    pub fn toggle_pause(&mut self) -> bool {
        if self.closed || self.state.is_game_over() {
            return false;
        }
        self.state = self.state.toggled_pause();
        debug!(state = %self.state, "pause toggled");
        self.rearm_clock();
        true
    }

    /// Discards the current game and starts a fresh one.
    pub fn restart(&mut self) {
        if self.closed {
            return;
        }
        info!(
            score = self.score.score(),
            lines = self.score.lines(),
            level = self.score.level(),
            "game restarted"
        );
        self.board = Board::EMPTY;
        self.score = ScoreKeeper::new();
        self.state = GameState::Active;
        self.spawn_piece();
    }

    /// Stops the clock and invokes the close callback.
    ///
    /// The callback runs at most once. After closing, every other operation
    /// is a no-op. Returns `false` if the engine was already closed.
    pub fn close(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.closed = true;
        self.clock.cancel();
        info!(score = self.score.score(), "game closed");
        if let Some(CloseCallback(callback)) = self.on_close.take() {
            callback();
        }
        true
    }

    fn land(&mut self, piece: ActivePiece) -> MoveOutcome {
        let (board, cleared_lines) = self.board.place_piece(&piece).clear_lines();
        self.board = board;
        if self.score.record_clear(cleared_lines) {
            info!(level = self.score.level(), "level up");
        }
        debug!(
            kind = %piece.kind(),
            x = piece.position().x(),
            y = piece.position().y(),
            cleared_lines,
            "piece landed"
        );

        if piece.position().y() <= 0 {
            self.piece = None;
            self.state = GameState::GameOver;
            self.clock.cancel();
            info!(
                score = self.score.score(),
                lines = self.score.lines(),
                level = self.score.level(),
                "game over"
            );
            return MoveOutcome::ToppedOut { cleared_lines };
        }

        self.spawn_piece();
        MoveOutcome::Landed { cleared_lines }
    }

    fn spawn_piece(&mut self) {
        let piece = ActivePiece::spawn(self.source.next_piece());
        debug!(kind = %piece.kind(), "piece spawned");
        self.piece = Some(piece);
        self.rearm_clock();
    }

    fn rearm_clock(&mut self) {
        if self.closed || !self.state.clock_runs() || self.piece.is_none() {
            if let Some(handle) = self.clock.cancel() {
                trace!(generation = handle.generation(), "clock stopped");
            }
            return;
        }
        let handle = self.clock.arm(tick_period(self.score.level()));
        trace!(
            generation = handle.generation(),
            period = ?handle.period(),
            "clock armed"
        );
    }

    #[cfg(test)]
    pub(crate) fn set_board(&mut self, board: Board) {
        self.board = board;
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc, time::Duration};

    use super::*;
    use crate::{
        PieceSequence,
        core::{BOARD_HEIGHT, PieceKind, Position},
    };

    fn engine_with(chars: &str) -> GameEngine<PieceSequence> {
        GameEngine::with_source(PieceSequence::from_chars(chars).unwrap())
    }

    fn position(engine: &GameEngine<PieceSequence>) -> Position {
        engine.active_piece().unwrap().position()
    }

    /// Moves the piece down until it lands or the move is ignored.
    fn drop_piece<S: PieceSource>(engine: &mut GameEngine<S>) -> MoveOutcome {
        loop {
            let outcome = engine.move_piece(Direction::Down);
            if !outcome.is_moved() {
                return outcome;
            }
        }
    }

    /// Rotates the I-piece upright at spawn and drops it.
    fn drop_vertical_i(engine: &mut GameEngine<PieceSequence>) -> MoveOutcome {
        assert_eq!(engine.active_piece().unwrap().kind(), PieceKind::I);
        assert!(engine.rotate());
        drop_piece(engine)
    }

    #[test]
    fn test_new_game() {
        let engine = engine_with("T");
        assert_eq!(engine.state(), GameState::Active);
        assert!(engine.board().is_empty());
        assert_eq!(position(&engine), Position::new(4, 0));
        assert_eq!(engine.score().score(), 0);
        assert_eq!(engine.score().level(), 1);
        let handle = engine.clock().handle().unwrap();
        assert_eq!(handle.period(), Duration::from_millis(1000));
    }

    #[test]
    fn test_nineteen_downs_reach_bottom_and_twentieth_lands() {
        let mut engine = engine_with("IO");
        for step in 1..=19 {
            assert_eq!(engine.move_piece(Direction::Down), MoveOutcome::Moved);
            assert_eq!(position(&engine), Position::new(4, step));
        }
        assert_eq!(
            engine.move_piece(Direction::Down),
            MoveOutcome::Landed { cleared_lines: 0 }
        );

        let piece = engine.active_piece().unwrap();
        assert_eq!(piece.kind(), PieceKind::O);
        assert_eq!(piece.position(), Position::new(4, 0));
        for x in 0..10 {
            let filled = engine.board().cell(x, 19).unwrap().is_filled();
            assert_eq!(filled, (4..8).contains(&x), "column {x}");
        }
    }

    #[test]
    fn test_sideways_moves_stop_at_walls() {
        let mut engine = engine_with("I");
        for _ in 0..4 {
            assert_eq!(engine.move_piece(Direction::Left), MoveOutcome::Moved);
        }
        assert_eq!(engine.move_piece(Direction::Left), MoveOutcome::Blocked);
        assert_eq!(position(&engine), Position::new(0, 0));

        for _ in 0..6 {
            assert_eq!(engine.move_piece(Direction::Right), MoveOutcome::Moved);
        }
        assert_eq!(engine.move_piece(Direction::Right), MoveOutcome::Blocked);
        assert_eq!(position(&engine), Position::new(6, 0));
    }

    #[test]
    fn test_rotation_blocked_keeps_piece() {
        let mut engine = engine_with("I");
        let mut picture = vec![".........."; BOARD_HEIGHT - 2];
        picture[0] = "....#.....";
        engine.set_board(Board::from_picture(&picture));

        let before = *engine.active_piece().unwrap();
        let handle = engine.clock().handle();
        assert!(!engine.rotate());
        assert_eq!(*engine.active_piece().unwrap(), before);
        assert_eq!(engine.clock().handle(), handle, "no change, no rearm");
    }

    #[test]
    fn test_line_clear_scores() {
        let mut engine = engine_with("I");
        engine.set_board(Board::from_picture(&["####.#####"]));

        assert_eq!(
            drop_vertical_i(&mut engine),
            MoveOutcome::Landed { cleared_lines: 1 }
        );
        assert_eq!(engine.score().score(), 100);
        assert_eq!(engine.score().lines(), 1);
        assert_eq!(engine.score().level(), 1);
        let expected = Board::from_picture(&[
            "....#.....", //
            "....#.....",
            "....#.....",
        ]);
        assert_eq!(*engine.board(), expected);
    }

    #[test]
    fn test_level_up_speeds_up_clock() {
        let mut engine = engine_with("I");
        engine.set_board(Board::from_picture(&["####.#####"; 12]));

        for _ in 0..3 {
            assert_eq!(
                drop_vertical_i(&mut engine),
                MoveOutcome::Landed { cleared_lines: 4 }
            );
        }
        assert_eq!(engine.score().lines(), 12);
        assert_eq!(engine.score().level(), 2);
        assert_eq!(engine.score().score(), 1200);
        assert!(engine.board().is_empty());
        let handle = engine.clock().handle().unwrap();
        assert_eq!(handle.period(), Duration::from_millis(900));
    }

    #[test]
    fn test_stacking_to_the_top_ends_the_game() {
        let mut engine = engine_with("O");
        for _ in 0..9 {
            assert_eq!(
                drop_piece(&mut engine),
                MoveOutcome::Landed { cleared_lines: 0 }
            );
        }
        assert_eq!(
            drop_piece(&mut engine),
            MoveOutcome::ToppedOut { cleared_lines: 0 }
        );

        assert_eq!(engine.state(), GameState::GameOver);
        assert!(engine.active_piece().is_none());
        assert!(!engine.clock().is_running());
        assert!(engine.board().cell(4, 0).unwrap().is_filled());
        assert_eq!(engine.move_piece(Direction::Left), MoveOutcome::Ignored);
        assert!(!engine.rotate());
        assert!(!engine.toggle_pause(), "pause button does nothing after game over");
    }

    #[test]
    fn test_pause_key_while_paused_restarts() {
        let mut engine = engine_with("I");
        engine.set_board(Board::from_picture(&["####.#####", "#........."]));
        drop_vertical_i(&mut engine);
        assert_eq!(engine.score().score(), 100);

        assert!(engine.handle_key(Key::Space));
        assert_eq!(engine.state(), GameState::Paused);
        assert!(!engine.clock().is_running());

        assert!(engine.handle_key(Key::Space));
        assert_eq!(engine.state(), GameState::Active);
        assert!(engine.board().is_empty());
        assert_eq!(*engine.score(), ScoreKeeper::new());
        assert_eq!(position(&engine), Position::new(4, 0));
        assert!(engine.clock().is_running());
    }

    #[test]
    fn test_pause_key_after_game_over_restarts() {
        let mut engine = engine_with("O");
        while !drop_piece(&mut engine).is_topped_out() {}

        assert!(engine.handle_key(Key::Space));
        assert_eq!(engine.state(), GameState::Active);
        assert!(engine.board().is_empty());
        assert!(engine.active_piece().is_some());
    }

    #[test]
    fn test_pause_button_resumes() {
        let mut engine = engine_with("T");
        engine.move_piece(Direction::Down);

        assert!(engine.handle_key(Key::Char('p')));
        assert_eq!(engine.state(), GameState::Paused);
        assert_eq!(engine.move_piece(Direction::Down), MoveOutcome::Ignored);
        assert!(!engine.handle_key(Key::ArrowLeft));

        assert!(engine.handle_key(Key::Char('P')));
        assert_eq!(engine.state(), GameState::Active);
        assert_eq!(position(&engine), Position::new(4, 1), "game kept");
        assert!(engine.clock().is_running());
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let mut engine = engine_with("T");
        let first = engine.clock().handle().unwrap();

        assert!(engine.handle_key(Key::ArrowLeft));
        let second = engine.clock().handle().unwrap();
        assert_ne!(first, second, "moving the piece rearms the clock");

        assert_eq!(engine.tick(first), MoveOutcome::Ignored);
        assert_eq!(position(&engine), Position::new(3, 0));

        assert_eq!(engine.tick(second), MoveOutcome::Moved);
        assert_eq!(position(&engine), Position::new(3, 1));
    }

    #[test]
    fn test_tick_ignored_while_paused() {
        let mut engine = engine_with("T");
        let handle = engine.clock().handle().unwrap();
        engine.press_pause();
        assert_eq!(engine.tick(handle), MoveOutcome::Ignored);
        assert_eq!(position(&engine), Position::new(4, 0));
    }

    #[test]
    fn test_blocked_move_keeps_clock() {
        let mut engine = engine_with("I");
        for _ in 0..4 {
            engine.move_piece(Direction::Left);
        }
        let handle = engine.clock().handle();
        assert_eq!(engine.move_piece(Direction::Left), MoveOutcome::Blocked);
        assert_eq!(engine.clock().handle(), handle);
    }

    #[test]
    fn test_close_invokes_callback_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut engine = engine_with("T").on_close(move || counter.set(counter.get() + 1));

        assert!(engine.handle_key(Key::Char('p')));
        assert!(engine.handle_key(Key::Escape), "close works while paused");
        assert_eq!(calls.get(), 1);
        assert!(engine.is_closed());
        assert!(!engine.clock().is_running());

        assert!(!engine.close());
        assert!(!engine.handle_key(Key::Escape));
        assert!(!engine.handle_key(Key::Space));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_same_seed_same_game() {
        let seed: PieceSeed = "00112233445566778899aabbccddeeff".parse().unwrap();
        let mut a = GameEngine::with_seed(seed);
        let mut b = GameEngine::with_seed(seed);
        for _ in 0..5 {
            assert_eq!(
                a.active_piece().map(ActivePiece::kind),
                b.active_piece().map(ActivePiece::kind)
            );
            assert_eq!(drop_piece(&mut a), drop_piece(&mut b));
        }
        assert_eq!(a.board(), b.board());
    }
}
