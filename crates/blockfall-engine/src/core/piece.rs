use rand::{Rng, distr::StandardUniform, prelude::Distribution};

use super::BOARD_WIDTH;

/// Largest row or column count of any shape in the catalog.
const MAX_SHAPE_SIZE: usize = 4;

/// Color token carried by a piece and by the board cells it leaves behind.
///
/// Displayed as a lowercase hex triplet (`#00f0f0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("#{r:02x}{g:02x}{b:02x}")]
pub struct PieceColor {
    r: u8,
    g: u8,
    b: u8,
}

impl PieceColor {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub const fn to_rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// Binary occupancy matrix of a piece in one orientation.
///
/// A shape is `rows × cols` with both dimensions at most 4. Cell `(x, y)` is
/// column `x` of row `y`, relative to the top-left corner of the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    rows: u8,
    cols: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    #[expect(clippy::cast_possible_truncation)]
    const fn from_matrix<const R: usize, const C: usize>(matrix: [[u8; C]; R]) -> Self {
        assert!(R <= MAX_SHAPE_SIZE && C <= MAX_SHAPE_SIZE);
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < R {
            let mut x = 0;
            while x < C {
                cells[y][x] = matrix[y][x] != 0;
                x += 1;
            }
            y += 1;
        }
        Self {
            rows: R as u8,
            cols: C as u8,
            cells,
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        usize::from(self.rows)
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        usize::from(self.cols)
    }

    /// Returns whether cell `(x, y)` of the matrix is occupied.
    ///
    /// Cells outside the matrix are reported as empty.
    #[must_use]
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.cols() && y < self.rows() && self.cells[y][x]
    }

    /// Returns the `(dx, dy)` offsets of the occupied cells, row by row.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.rows).flat_map(move |dy| {
            (0..self.cols)
                .filter(move |&dx| self.cells[usize::from(dy)][usize::from(dx)])
                .map(move |dx| (i32::from(dx), i32::from(dy)))
        })
    }

    /// Returns the shape rotated 90° clockwise.
    ///
    /// The matrix is transposed and every resulting row is reversed, so a
    /// `rows × cols` shape becomes `cols × rows`. Four rotations give back the
    /// original shape.
    #[must_use]
    pub fn rotated(&self) -> Self {
        let (rows, cols) = (self.cols(), self.rows());
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (y, row) in cells.iter_mut().enumerate().take(rows) {
            for (x, cell) in row.iter_mut().enumerate().take(cols) {
                *cell = self.cells[self.rows() - 1 - x][y];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }
}

/// The seven piece kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

/// Uniform draw over the seven kinds.
///
/// Every draw is independent: there is no bag and no repeat suppression.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    /// All kinds, in catalog order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns the spawn orientation of this kind.
    #[must_use]
    pub const fn shape(self) -> Shape {
        CATALOG[self as usize].0
    }

    /// Returns the color of this kind.
    #[must_use]
    pub const fn color(self) -> PieceColor {
        CATALOG[self as usize].1
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('S'), Some(PieceKind::S));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }
}

const CATALOG: [(Shape, PieceColor); PieceKind::LEN] = [
    (
        Shape::from_matrix([[1, 1, 1, 1]]),
        PieceColor::rgb(0x00, 0xf0, 0xf0),
    ),
    (
        Shape::from_matrix([[1, 1], [1, 1]]),
        PieceColor::rgb(0xf0, 0xf0, 0x00),
    ),
    (
        Shape::from_matrix([[0, 1, 0], [1, 1, 1]]),
        PieceColor::rgb(0xa0, 0x00, 0xf0),
    ),
    (
        Shape::from_matrix([[0, 1, 1], [1, 1, 0]]),
        PieceColor::rgb(0x00, 0xf0, 0x00),
    ),
    (
        Shape::from_matrix([[1, 1, 0], [0, 1, 1]]),
        PieceColor::rgb(0xf0, 0x00, 0x00),
    ),
    (
        Shape::from_matrix([[1, 0, 0], [1, 1, 1]]),
        PieceColor::rgb(0x00, 0x00, 0xf0),
    ),
    (
        Shape::from_matrix([[0, 0, 1], [1, 1, 1]]),
        PieceColor::rgb(0xf0, 0xa0, 0x00),
    ),
];

/// Board coordinate of a shape's top-left corner.
///
/// `x` counts columns from the left, `y` counts rows from the top. `y` may be
/// negative while a piece is partly above the visible grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Where every new piece appears: column `BOARD_WIDTH / 2 - 1`, row 0.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const SPAWN: Self = Self::new((BOARD_WIDTH / 2 - 1) as i32, 0);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Direction of a translation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Direction {
    #[display("down")]
    Down,
    #[display("left")]
    Left,
    #[display("right")]
    Right,
}

impl Direction {
    const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// The falling piece: a kind, its current orientation and its anchor.
///
/// Pieces are immutable - movement and rotation return new values, and it is
/// up to the caller to check them against the board before committing.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ActivePiece, Direction, PieceKind, Position};
///
/// let piece = ActivePiece::spawn(PieceKind::T);
/// assert_eq!(piece.position(), Position::new(4, 0));
///
/// let moved = piece.moved(Direction::Left).rotated();
/// assert_eq!(moved.position(), Position::new(3, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    kind: PieceKind,
    shape: Shape,
    position: Position,
}

impl ActivePiece {
    /// Creates a piece of `kind` in spawn orientation at [`Position::SPAWN`].
    #[must_use]
    pub const fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            position: Position::SPAWN,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub const fn color(&self) -> PieceColor {
        self.kind.color()
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn at(self, position: Position) -> Self {
        Self { position, ..self }
    }

    #[must_use]
    pub const fn moved(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.at(self.position.offset(dx, dy))
    }

    /// Returns the piece rotated 90° clockwise around its anchor.
    #[must_use]
    pub fn rotated(self) -> Self {
        Self {
            shape: self.shape.rotated(),
            ..self
        }
    }

    /// Returns the absolute `(x, y)` board coordinates of the occupied cells.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied_cells()
            .map(move |(dx, dy)| (self.position.x() + dx, self.position.y() + dy))
    }
}
