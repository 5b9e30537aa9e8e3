//! Board and piece data types.
//!
//! Everything in this module is a plain value: boards and pieces are never
//! mutated in place, every operation hands back a new value.

pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Number of columns of the board.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows of the board.
pub const BOARD_HEIGHT: usize = 20;
