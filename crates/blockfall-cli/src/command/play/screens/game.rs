use std::{cell::Cell, rc::Rc};

use blockfall_engine::{ClockHandle, GameEngine, GameState, Key, PieceSource};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use ratatui_runtime::{Runtime, Screen, ScreenTransition};

use crate::ui::widgets::{GameDisplay, KeyBinding, KeyBindingDisplay};

/// Final numbers of a game, handed back to the host screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GameSummary {
    pub(crate) score: u64,
    pub(crate) lines: u32,
    pub(crate) level: u32,
    pub(crate) finished: bool,
}

/// Hosts a [`GameEngine`] and drives it from the terminal.
///
/// The runtime's timer mirrors the engine's clock: after every key press and
/// every tick the screen re-reads [`GameEngine::clock`] and re-arms or
/// cancels the runtime timer to match. The screen stack cancels the timer
/// when the game leaves the foreground.
#[derive(Debug)]
pub(crate) struct GameScreen<S> {
    engine: GameEngine<S>,
    armed: Option<ClockHandle>,
    summary: Rc<Cell<Option<GameSummary>>>,
}

impl<S> GameScreen<S>
where
    S: PieceSource,
{
    pub(crate) fn new(engine: GameEngine<S>, summary: Rc<Cell<Option<GameSummary>>>) -> Self {
        Self {
            engine,
            armed: None,
            summary,
        }
    }

    fn sync_timer(&mut self, runtime: &mut Runtime) {
        let handle = self.engine.clock().handle();
        if handle == self.armed {
            return;
        }
        match handle {
            Some(handle) => runtime.arm_timer(handle.period()),
            None => runtime.cancel_timer(),
        }
        self.armed = handle;
    }

    fn summarize(&self) -> GameSummary {
        let score = self.engine.score();
        GameSummary {
            score: score.score(),
            lines: score.lines(),
            level: score.level(),
            finished: self.engine.state().is_game_over(),
        }
    }
}

/// Converts a terminal key code to the engine's key type.
fn engine_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}

const ACTIVE_BINDINGS: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↓"], "Down"),
    (&["↑", "X"], "Rotate"),
    (&["Space"], "Pause"),
    (&["P"], "Pause/Resume"),
    (&["Esc"], "Back"),
];
const PAUSED_BINDINGS: &[KeyBinding] = &[
    (&["P"], "Resume"),
    (&["Space"], "Restart"),
    (&["Esc"], "Back"),
];
const GAME_OVER_BINDINGS: &[KeyBinding] = &[(&["Space"], "Restart"), (&["Esc"], "Back")];

impl<S> Screen for GameScreen<S>
where
    S: PieceSource + std::fmt::Debug,
{
    fn on_active(&mut self, runtime: &mut Runtime) {
        self.armed = None;
        self.sync_timer(runtime);
    }

    fn on_inactive(&mut self, _runtime: &mut Runtime) {
        self.armed = None;
    }

    fn on_close(&mut self, _runtime: &mut Runtime) {
        self.summary.set(Some(self.summarize()));
        // No-op when the player already closed the game with Esc
        self.engine.close();
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        if let Some(key) = event
            .as_key_event()
            .filter(|event| event.kind != KeyEventKind::Release)
            .and_then(|event| engine_key(event.code))
        {
            self.engine.handle_key(key);
        }
        if self.engine.is_closed() {
            return ScreenTransition::Pop;
        }
        self.sync_timer(runtime);
        ScreenTransition::Stay
    }

    fn update(&mut self, runtime: &mut Runtime) {
        if let Some(handle) = self.armed {
            self.engine.tick(handle);
        }
        self.sync_timer(runtime);
    }

    fn draw(&self, frame: &mut Frame) {
        let bindings = match self.engine.state() {
            GameState::Active => ACTIVE_BINDINGS,
            GameState::Paused => PAUSED_BINDINGS,
            GameState::GameOver => GAME_OVER_BINDINGS,
        };

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(22), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(GameDisplay::new(&self.engine), main_area);
        frame.render_widget(KeyBindingDisplay::new(bindings), help_area);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use blockfall_engine::{PieceKind, PieceSequence, Position};
    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn screen(
        returned: &Rc<Cell<bool>>,
    ) -> (GameScreen<PieceSequence>, Rc<Cell<Option<GameSummary>>>) {
        let returned = Rc::clone(returned);
        let engine = GameEngine::with_source(PieceSequence::new([PieceKind::T]))
            .on_close(move || returned.set(true));
        let summary = Rc::new(Cell::new(None));
        (GameScreen::new(engine, Rc::clone(&summary)), summary)
    }

    #[test]
    fn test_engine_key() {
        assert_eq!(engine_key(KeyCode::Left), Some(Key::ArrowLeft));
        assert_eq!(engine_key(KeyCode::Char(' ')), Some(Key::Space));
        assert_eq!(engine_key(KeyCode::Char('x')), Some(Key::Char('x')));
        assert_eq!(engine_key(KeyCode::Esc), Some(Key::Escape));
        assert_eq!(engine_key(KeyCode::Enter), None);
    }

    #[test]
    fn test_timer_mirrors_engine_clock() {
        let returned = Rc::new(Cell::new(false));
        let (mut screen, _) = screen(&returned);
        let mut runtime = Runtime::new();

        screen.on_active(&mut runtime);
        assert_eq!(runtime.timer_period(), Some(Duration::from_millis(1000)));
        let first = screen.armed;

        screen.handle_event(&mut runtime, &key(KeyCode::Left));
        assert_ne!(screen.armed, first, "a move re-arms the timer");
        assert_eq!(screen.armed, screen.engine.clock().handle());

        screen.update(&mut runtime);
        assert_eq!(
            screen.engine.active_piece().map(|piece| piece.position()),
            Some(Position::new(3, 1))
        );

        screen.handle_event(&mut runtime, &key(KeyCode::Char(' ')));
        assert_eq!(screen.engine.state(), GameState::Paused);
        assert_eq!(runtime.timer_period(), None, "paused game has no timer");

        screen.update(&mut runtime);
        assert_eq!(screen.engine.state(), GameState::Paused);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let returned = Rc::new(Cell::new(false));
        let (mut screen, _) = screen(&returned);
        let mut runtime = Runtime::new();
        screen.on_active(&mut runtime);

        let release = Event::Key(KeyEvent::new_with_kind(
            KeyCode::Left,
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        screen.handle_event(&mut runtime, &release);
        assert_eq!(
            screen.engine.active_piece().map(|piece| piece.position()),
            Some(Position::new(4, 0))
        );
    }

    #[test]
    fn test_escape_returns_to_host() {
        let returned = Rc::new(Cell::new(false));
        let (mut screen, summary) = screen(&returned);
        let mut runtime = Runtime::new();
        screen.on_active(&mut runtime);

        let transition = screen.handle_event(&mut runtime, &key(KeyCode::Esc));
        assert!(matches!(transition, ScreenTransition::Pop));
        assert!(returned.get());

        screen.on_inactive(&mut runtime);
        screen.on_close(&mut runtime);
        assert_eq!(screen.armed, None);
        assert_eq!(
            summary.get(),
            Some(GameSummary {
                score: 0,
                lines: 0,
                level: 1,
                finished: false,
            })
        );
    }
}
