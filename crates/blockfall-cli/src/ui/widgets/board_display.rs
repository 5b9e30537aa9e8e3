use std::iter;

use blockfall_engine::{ActivePiece, BOARD_HEIGHT, BOARD_WIDTH, Board, Cell};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::CellDisplay;

/// The playing field with the active piece drawn on top.
#[derive(Debug)]
pub(crate) struct BoardDisplay<'a> {
    board: &'a Board,
    active_piece: Option<ActivePiece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub(crate) fn new(board: &'a Board) -> Self {
        Self {
            board,
            active_piece: None,
            block: None,
        }
    }

    pub(crate) fn active_piece(self, piece: Option<ActivePiece>) -> Self {
        Self {
            active_piece: piece,
            ..self
        }
    }

    pub(crate) fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub(crate) fn width(&self) -> u16 {
        10 * CellDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub(crate) fn height(&self) -> u16 {
        20 * CellDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }

    /// The cells to draw: the board with the part of the piece that lies
    /// inside the grid painted over it.
    fn composed_cells(&self) -> [[Cell; BOARD_WIDTH]; BOARD_HEIGHT] {
        let mut cells = [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT];
        for (dst, src) in iter::zip(&mut cells, self.board.rows()) {
            *dst = *src;
        }
        if let Some(piece) = &self.active_piece {
            for (x, y) in piece.cells() {
                let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                    continue;
                };
                if let Some(cell) = cells.get_mut(y).and_then(|row| row.get_mut(x)) {
                    *cell = Cell::Filled(piece.color());
                }
            }
        }
        cells
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..BOARD_WIDTH).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints = (0..BOARD_HEIGHT).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<BOARD_HEIGHT>(&vertical)
            .into_iter()
            .map(|row| row.layout::<BOARD_WIDTH>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.composed_cells()) {
            for (grid_cell, cell) in iter::zip(grid_row, row) {
                CellDisplay::from_cell(cell).render(grid_cell, buf);
            }
        }
    }
}
