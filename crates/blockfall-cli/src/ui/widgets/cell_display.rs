use blockfall_engine::Cell;
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::ui::widgets::{color, style};

/// One board cell, drawn two terminal columns wide.
#[derive(Debug)]
pub(crate) struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub(crate) const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub(crate) fn width() -> u16 {
        2
    }

    pub(crate) fn height() -> u16 {
        1
    }

    pub(crate) fn from_cell(cell: Cell) -> Self {
        match cell {
            Cell::Empty => Self::new(style::EMPTY_DOT, "."),
            Cell::Filled(piece_color) => Self::new(style::bg_only(color::piece(piece_color)), ""),
        }
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill the whole area, not just the cells covered by the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
