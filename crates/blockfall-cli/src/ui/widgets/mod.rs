use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub(crate) use self::{
    board_display::*, cell_display::*, game_display::*, key_binding_display::*,
    stats_display::*,
};

mod board_display;
mod cell_display;
mod game_display;
mod key_binding_display;
mod stats_display;

pub(crate) mod color {
    use blockfall_engine::PieceColor;
    use ratatui::style::Color;

    pub const EMPTY_CELL: Color = Color::Rgb(0x1a, 0x1a, 0x2e);
    pub const GRAY: Color = Color::Rgb(0x50, 0x50, 0x6e);
    pub const YELLOW: Color = Color::Rgb(0xf0, 0xf0, 0x00);
    pub const RED: Color = Color::Rgb(0xf0, 0x00, 0x00);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    pub const fn piece(color: PieceColor) -> Color {
        let (r, g, b) = color.to_rgb();
        Color::Rgb(r, g, b)
    }
}

pub(crate) mod style {
    use ratatui::style::{Color, Style};

    use super::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::EMPTY_CELL);
    pub const PAUSED_POPUP: Style = fg_bg(color::BLACK, color::YELLOW);
    pub const GAME_OVER_POPUP: Style = fg_bg(color::WHITE, color::RED);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
