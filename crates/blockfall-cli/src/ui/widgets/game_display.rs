use blockfall_engine::{GameEngine, GameState, PieceSource};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{BoardDisplay, StatsDisplay, color, style};

/// Board and stats side by side, with a banner over the board while the game
/// is paused or over.
#[derive(Debug)]
pub(crate) struct GameDisplay<'a, S> {
    engine: &'a GameEngine<S>,
}

impl<'a, S> GameDisplay<'a, S>
where
    S: PieceSource,
{
    pub(crate) fn new(engine: &'a GameEngine<S>) -> Self {
        Self { engine }
    }

    fn banner(&self) -> Option<(Vec<Line<'static>>, Style)> {
        let score = self.engine.score().score();
        match self.engine.state() {
            GameState::Active => None,
            GameState::Paused => Some((
                vec![
                    Line::from("PAUSED"),
                    Line::from("P resume | Space restart"),
                ],
                style::PAUSED_POPUP,
            )),
            GameState::GameOver => Some((
                vec![
                    Line::from("GAME OVER"),
                    Line::from(format!("Final score: {score}")),
                    Line::from("Space restart"),
                ],
                style::GAME_OVER_POPUP,
            )),
        }
    }
}

impl<S> Widget for GameDisplay<'_, S>
where
    S: PieceSource,
{
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = match self.engine.state() {
            GameState::Active => color::WHITE,
            GameState::Paused => color::YELLOW,
            GameState::GameOver => color::RED,
        };

        let board = BoardDisplay::new(self.engine.board())
            .active_piece(self.engine.active_piece().copied())
            .block(
                Block::bordered()
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
        let stats = StatsDisplay::new(self.engine.score()).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(Padding::horizontal(1))
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let [board_column, stats_column] = Layout::horizontal([
            Constraint::Length(board.width()),
            Constraint::Length(stats.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);
        let [board_area] = Layout::vertical([Constraint::Length(board.height())]).areas(board_column);
        let [stats_area] = Layout::vertical([Constraint::Length(stats.height())]).areas(stats_column);

        let board_width = board.width();
        board.render(board_area, buf);
        stats.render(stats_area, buf);

        if let Some((lines, style)) = self.banner() {
            #[expect(clippy::cast_possible_truncation)]
            let height = lines.len() as u16 + 2;
            let block = Block::new().style(style);
            let area = board_area.centered(Constraint::Length(board_width), Constraint::Length(height));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            Text::from(lines)
                .style(style)
                .centered()
                .render(inner.centered_vertically(Constraint::Length(height - 2)), buf);
        }
    }
}
