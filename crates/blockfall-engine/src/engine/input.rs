use crate::core::Direction;

use super::GameState;

/// Terminal-independent key event, as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowDown,
    ArrowUp,
    Space,
    Escape,
    Char(char),
}

/// An action submitted to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Action {
    /// Translate the active piece.
    #[display("move {_0}")]
    Move(Direction),
    /// Rotate the active piece clockwise.
    #[display("rotate")]
    Rotate,
    /// The pause key: pauses an active game, restarts otherwise.
    #[display("pause")]
    Pause,
    /// The pause button: toggles between active and paused.
    #[display("toggle pause")]
    TogglePause,
    /// Start a fresh game.
    #[display("restart")]
    Restart,
    /// Leave the game and return to the host.
    #[display("close")]
    Close,
}

/// Maps a key to the action it triggers in `state`.
///
/// | key                      | Active          | Paused / GameOver |
/// |--------------------------|-----------------|-------------------|
/// | `←` / `→` / `↓`          | move            | -                 |
/// | `↑` / `x` / `X`          | rotate          | -                 |
/// | `Space`                  | pause           | restart           |
/// | `p` / `P`                | toggle pause    | toggle pause      |
/// | `Esc`                    | close           | close             |
///
/// Every other key is ignored.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Action, Direction, GameState, Key, map_key};
///
/// assert_eq!(
///     map_key(Key::ArrowLeft, GameState::Active),
///     Some(Action::Move(Direction::Left))
/// );
/// assert_eq!(map_key(Key::ArrowLeft, GameState::Paused), None);
/// assert_eq!(map_key(Key::Space, GameState::GameOver), Some(Action::Restart));
/// ```
#[must_use]
pub fn map_key(key: Key, state: GameState) -> Option<Action> {
    match key {
        Key::Escape => return Some(Action::Close),
        Key::Char('p' | 'P') => return Some(Action::TogglePause),
        _ => {}
    }

    if state.is_active() {
        match key {
            Key::ArrowLeft => Some(Action::Move(Direction::Left)),
            Key::ArrowRight => Some(Action::Move(Direction::Right)),
            Key::ArrowDown => Some(Action::Move(Direction::Down)),
            Key::ArrowUp | Key::Char('x' | 'X') => Some(Action::Rotate),
            Key::Space => Some(Action::Pause),
            _ => None,
        }
    } else {
        match key {
            Key::Space => Some(Action::Restart),
            _ => None,
        }
    }
}
