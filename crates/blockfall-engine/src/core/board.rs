use arrayvec::ArrayVec;

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    piece::{ActivePiece, PieceColor, Position, Shape},
};

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum Cell {
    /// Nothing here.
    #[default]
    Empty,
    /// Left behind by a landed piece of this color.
    Filled(PieceColor),
}

type Row = [Cell; BOARD_WIDTH];

const EMPTY_ROW: Row = [Cell::Empty; BOARD_WIDTH];

fn is_full(row: &Row) -> bool {
    row.iter().all(|cell| cell.is_filled())
}

/// Immutable snapshot of the playing field.
///
/// The board is 10 columns by 20 rows; row 0 is the top. A cell only becomes
/// filled when a landed piece is merged in with [`Board::place_piece`], and is
/// only emptied again by [`Board::clear_lines`]. Both return a new board and
/// leave `self` untouched.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ActivePiece, Board, PieceKind, Position};
///
/// let piece = ActivePiece::spawn(PieceKind::I).at(Position::new(0, 19));
/// let board = Board::EMPTY;
/// assert!(board.is_valid_move(piece.shape(), piece.position()));
///
/// let placed = board.place_piece(&piece);
/// assert!(board.is_empty());
/// assert!(!placed.is_empty());
///
/// let (cleared_board, cleared) = placed.clear_lines();
/// assert_eq!(cleared, 0);
/// assert_eq!(cleared_board, placed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    /// A board with every cell empty.
    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; BOARD_HEIGHT],
    };

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_WIDTH]> {
        self.rows.iter()
    }

    /// Returns the cell at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    /// Returns whether no cell is filled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|cell| cell.is_empty())
    }

    /// Checks whether `shape` anchored at `position` fits on the board.
    ///
    /// Every occupied cell must satisfy `0 <= x < 10` and `y < 20`. There is
    /// no lower bound on `y`: cells above the grid are accepted and never
    /// checked for collisions. Cells inside the grid must be empty.
    #[must_use]
    pub fn is_valid_move(&self, shape: &Shape, position: Position) -> bool {
        shape.occupied_cells().all(|(dx, dy)| {
            let Ok(x) = usize::try_from(position.x() + dx) else {
                return false;
            };
            if x >= BOARD_WIDTH {
                return false;
            }
            match usize::try_from(position.y() + dy) {
                Err(_) => true,
                Ok(y) => y < BOARD_HEIGHT && self.rows[y][x].is_empty(),
            }
        })
    }

    /// Returns a copy of the board with `piece` merged in.
    ///
    /// Only cells inside the grid are written; the part of the piece above
    /// row 0 is dropped.
    #[must_use]
    pub fn place_piece(&self, piece: &ActivePiece) -> Self {
        let mut placed = self.clone();
        let filled = Cell::Filled(piece.color());
        for (x, y) in piece.cells() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if let Some(cell) = placed.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                *cell = filled;
            }
        }
        placed
    }

    /// Removes every full row and returns the new board with the count.
    ///
    /// Empty rows are inserted at the top to keep the height at 20. The
    /// remaining rows keep their relative order.
    #[must_use]
    pub fn clear_lines(&self) -> (Self, u32) {
        let mut survivors = ArrayVec::<Row, BOARD_HEIGHT>::new();
        let mut cleared = 0;
        for row in &self.rows {
            if is_full(row) {
                cleared += 1;
            } else {
                survivors.push(*row);
            }
        }

        let mut rows = [EMPTY_ROW; BOARD_HEIGHT];
        rows[BOARD_HEIGHT - survivors.len()..].copy_from_slice(&survivors);
        (Self { rows }, cleared)
    }

    /// Builds a board from a bottom-aligned picture, `#` marking filled cells.
    #[cfg(test)]
    pub(crate) fn from_picture(picture: &[&str]) -> Self {
        const GRAY: PieceColor = PieceColor::rgb(0x80, 0x80, 0x80);

        let mut board = Self::EMPTY;
        let top = BOARD_HEIGHT - picture.len();
        for (row, line) in board.rows[top..].iter_mut().zip(picture) {
            for (cell, ch) in row.iter_mut().zip(line.chars()) {
                if ch == '#' {
                    *cell = Cell::Filled(GRAY);
                }
            }
        }
        board
    }
}
