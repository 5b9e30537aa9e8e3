//! Game rules and state management.
//!
//! This module drives the core data structures through a game:
//!
//! - [`GameEngine`] - Composition root: board, active piece, score, clock and state
//! - [`ScoreKeeper`] - Score, lines cleared and level
//! - [`GameClock`] - Cancellable automatic-drop schedule
//! - [`GameState`] - Active / Paused / GameOver
//! - [`map_key`] - Key to [`Action`] mapping
//! - [`PieceSource`] - Where new pieces come from ([`RandomPieces`], [`PieceSequence`])
//!
//! # Game Flow
//!
//! 1. A piece spawns at the top center and the drop clock is armed
//! 2. Keys move or rotate the piece; each clock tick moves it down one row
//! 3. When it can no longer move down it lands, full rows are cleared and scored
//! 4. A new piece spawns, unless the landed piece never left the top row
//!
//! The host owns the real timer. After every call it reads
//! [`GameEngine::clock`] and arms or cancels its timer to match, then feeds
//! each expiry back through [`GameEngine::tick`].
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{GameEngine, Key, PieceKind, PieceSequence, Position};
//!
//! let mut engine = GameEngine::with_source(PieceSequence::new([PieceKind::T]));
//! assert_eq!(engine.active_piece().unwrap().position(), Position::new(4, 0));
//!
//! engine.handle_key(Key::ArrowLeft);
//! let handle = engine.clock().handle().unwrap();
//! engine.tick(handle);
//! assert_eq!(engine.active_piece().unwrap().position(), Position::new(3, 1));
//! ```

pub use self::{clock::*, game_engine::*, input::*, piece_source::*, score::*, state::*};

mod clock;
mod game_engine;
mod input;
mod piece_source;
mod score;
mod state;
