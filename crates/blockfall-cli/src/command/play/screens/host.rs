use std::{cell::Cell, rc::Rc};

use blockfall_engine::{GameEngine, PieceSeed};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Paragraph},
};
use ratatui_runtime::{Runtime, Screen, ScreenTransition};
use tracing::info;

use super::{GameScreen, game::GameSummary};
use crate::ui::widgets::{KeyBinding, KeyBindingDisplay, color, style};

/// The screen the game is launched from and returns to.
///
/// Every game gets a close callback that raises `returned`; the host checks
/// it when it comes back to the foreground.
#[derive(Debug)]
pub(crate) struct HostScreen {
    seed: Option<PieceSeed>,
    returned: Rc<Cell<bool>>,
    last_game: Rc<Cell<Option<GameSummary>>>,
    games_played: u32,
}

impl HostScreen {
    pub(crate) fn new(seed: Option<PieceSeed>) -> Self {
        Self {
            seed,
            returned: Rc::new(Cell::new(false)),
            last_game: Rc::new(Cell::new(None)),
            games_played: 0,
        }
    }

    fn mount_game(&mut self) -> ScreenTransition {
        let engine = self.seed.map_or_else(GameEngine::new, GameEngine::with_seed);
        let returned = Rc::clone(&self.returned);
        let engine = engine.on_close(move || returned.set(true));

        self.games_played += 1;
        info!(game = self.games_played, "game mounted");
        ScreenTransition::Push(Box::new(GameScreen::new(
            engine,
            Rc::clone(&self.last_game),
        )))
    }

    fn status_lines(&self) -> Vec<Line<'static>> {
        match self.last_game.get() {
            None => vec![Line::from("No game played yet.")],
            Some(game) => {
                let outcome = if game.finished { "game over" } else { "left early" };
                vec![
                    Line::from(format!("Last game ({outcome}):")),
                    Line::from(format!(
                        "score {}  level {}  lines {}",
                        game.score, game.level, game.lines
                    )),
                ]
            }
        }
    }
}

const BINDINGS: &[KeyBinding] = &[(&["Enter", "T"], "Play"), (&["Q", "Esc"], "Quit")];

impl Screen for HostScreen {
    fn on_active(&mut self, _runtime: &mut Runtime) {
        if self.returned.replace(false) {
            info!(last_game = ?self.last_game.get(), "returned from game");
        }
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        let Some(event) = event
            .as_key_event()
            .filter(|event| event.kind == KeyEventKind::Press)
        else {
            return ScreenTransition::Stay;
        };
        match event.code {
            KeyCode::Enter | KeyCode::Char('t' | 'T') => self.mount_game(),
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => ScreenTransition::Exit,
            _ => ScreenTransition::Stay,
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let mut lines = vec![
            Line::from("BLOCKFALL").style(Style::new().fg(color::YELLOW)),
            Line::default(),
        ];
        lines.extend(self.status_lines());

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        let panel_area = main_area.centered(Constraint::Length(40), Constraint::Length(7));

        frame.render_widget(
            Paragraph::new(Text::from(lines))
                .centered()
                .block(Block::bordered().style(style::DEFAULT)),
            panel_area,
        );
        frame.render_widget(KeyBindingDisplay::new(BINDINGS), help_area);
    }
}
