use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::board::BOARD_WIDTH;

/// Column where new pieces appear.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const PIECE_SPAWN_X: i32 = (BOARD_WIDTH / 2) as i32 - 1;
/// Row where new pieces appear; negative rows lie above the visible board.
pub const PIECE_SPAWN_Y: i32 = -2;

/// Unique identity of a piece instance.
///
/// Identifiers are handed out by [`PieceIdGenerator`](crate::engine::PieceIdGenerator)
/// and are only unique within one engine.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PieceId(pub(crate) u32);

impl PieceId {
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A falling tetromino: identity, kind, current shape matrix and board position.
///
/// `x` is the board column of the shape's left edge and `y` the board row of its
/// top edge. `y` is negative while the piece is still partially above the board.
///
/// Pieces are plain values. Movement and rotation return new `Tetromino`s and
/// never touch the shape matrix of another instance.
///
/// # Example
///
/// ```
/// use roundris_engine::{PieceId, PieceKind, Tetromino};
///
/// let piece = Tetromino::new(PieceId::default(), PieceKind::T);
/// let moved = piece.shifted(1, 0);
/// let rotated = moved.rotated_clockwise();
/// assert_eq!(rotated.rotation(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tetromino {
    id: PieceId,
    kind: PieceKind,
    shape: Shape,
    x: i32,
    y: i32,
    rotation: u8,
}

impl Tetromino {
    /// Creates a piece of `kind` in its canonical shape at the spawn position.
    #[must_use]
    pub fn new(id: PieceId, kind: PieceKind) -> Self {
        Self {
            id,
            kind,
            shape: kind.shape(),
            x: PIECE_SPAWN_X,
            y: PIECE_SPAWN_Y,
            rotation: 0,
        }
    }

    /// Returns a copy of this piece placed at the given column and row.
    #[must_use]
    pub fn at(self, x: i32, y: i32) -> Self {
        Self { x, y, ..self }
    }

    #[must_use]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Rotation index in quarter turns (0-3).
    ///
    /// Only used for animation; the shape matrix alone defines gameplay orientation.
    #[must_use]
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Board positions `(x, y)` of every occupied cell, including those above the board.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied_cells()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    #[must_use]
    pub fn shifted(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Rotates the shape a quarter turn clockwise around its top-left anchor.
    #[must_use]
    pub fn rotated_clockwise(self) -> Self {
        Self {
            shape: self.shape.rotated_clockwise(),
            rotation: (self.rotation + 1) % 4,
            ..self
        }
    }
}

/// The seven tetromino kinds.
///
/// Discriminants are the board type codes (1-7); code 0 is reserved for empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 1,
    /// O-piece.
    O = 2,
    /// T-piece.
    T = 3,
    /// S-piece.
    S = 4,
    /// Z-piece.
    Z = 5,
    /// J-piece.
    J = 6,
    /// L-piece.
    L = 7,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(1..=7) {
            1 => PieceKind::I,
            2 => PieceKind::O,
            3 => PieceKind::T,
            4 => PieceKind::S,
            5 => PieceKind::Z,
            6 => PieceKind::J,
            _ => PieceKind::L,
        }
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Board type code of this kind (1-7).
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Looks up a kind by its board type code.
    ///
    /// # Examples
    ///
    /// ```
    /// use roundris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_code(1), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_code(0), None);
    /// assert_eq!(PieceKind::from_code(8), None);
    /// ```
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::S),
            5 => Some(PieceKind::Z),
            6 => Some(PieceKind::J),
            7 => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Returns the canonical spawn shape of this kind.
    #[must_use]
    pub const fn shape(self) -> Shape {
        PIECE_SHAPES[self as usize - 1]
    }

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

/// Largest extent of any shape matrix in either direction.
pub const MAX_SHAPE_SIZE: usize = 4;

/// Occupancy matrix of a piece.
///
/// The matrix is `rows × cols` (at most 4×4) and is stored by value, so every
/// piece owns its own copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawShape")]
pub struct Shape {
    rows: u8,
    cols: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

/// Error returned when a deserialized [`Shape`] is larger than 4×4.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("shape is {rows}x{cols}, at most 4x4 is allowed")]
pub struct ShapeSizeError {
    rows: u8,
    cols: u8,
}

#[derive(Deserialize)]
struct RawShape {
    rows: u8,
    cols: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl TryFrom<RawShape> for Shape {
    type Error = ShapeSizeError;

    fn try_from(raw: RawShape) -> Result<Self, Self::Error> {
        let RawShape { rows, cols, cells } = raw;
        if usize::from(rows) > MAX_SHAPE_SIZE || usize::from(cols) > MAX_SHAPE_SIZE {
            return Err(ShapeSizeError { rows, cols });
        }
        // Cells outside `rows × cols` are always stored as false.
        let mut masked = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (r, row) in masked.iter_mut().enumerate().take(usize::from(rows)) {
            for (c, cell) in row.iter_mut().enumerate().take(usize::from(cols)) {
                *cell = cells[r][c];
            }
        }
        Ok(Self {
            rows,
            cols,
            cells: masked,
        })
    }
}

impl Shape {
    /// Builds a shape from 0/1 rows; only the leading `rows × cols` block is used.
    #[expect(clippy::cast_possible_truncation)]
    const fn from_bits(
        rows: usize,
        cols: usize,
        bits: [[u8; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
    ) -> Self {
        assert!(rows <= MAX_SHAPE_SIZE && cols <= MAX_SHAPE_SIZE);
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut r = 0;
        while r < rows {
            let mut c = 0;
            while c < cols {
                cells[r][c] = bits[r][c] != 0;
                c += 1;
            }
            r += 1;
        }
        Self {
            rows: rows as u8,
            cols: cols as u8,
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

    /// Returns whether the cell at column `col`, row `row` is occupied.
    ///
    /// Anything outside the matrix is unoccupied.
    #[must_use]
    pub fn is_occupied(&self, col: i32, row: i32) -> bool {
        let (Ok(col), Ok(row)) = (usize::try_from(col), usize::try_from(row)) else {
            return false;
        };
        row < self.rows() && col < self.cols() && self.cells[row][col]
    }

    /// Iterates over occupied cells as `(col, row)` offsets from the top-left corner.
    #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.rows()).flat_map(move |row| {
            (0..self.cols())
                .filter(move |&col| self.cells[row][col])
                .map(move |col| (col as i32, row as i32))
        })
    }

    /// Rotates the matrix a quarter turn clockwise.
    ///
    /// A `rows × cols` matrix becomes `cols × rows` with
    /// `new[r][c] = old[rows - 1 - c][r]`.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let rows = self.rows();
        let cols = self.cols();
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (r, row) in cells.iter_mut().enumerate().take(cols) {
            for (c, cell) in row.iter_mut().enumerate().take(rows) {
                *cell = self.cells[rows - 1 - c][r];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows() {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..self.cols() {
                f.write_str(if self.cells[row][col] { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}

const PIECE_SHAPES: [Shape; PieceKind::LEN] = {
    const EEEE: [u8; 4] = [0; 4];
    [
        // I-piece
        Shape::from_bits(1, 4, [[1, 1, 1, 1], EEEE, EEEE, EEEE]),
        // O-piece
        Shape::from_bits(2, 2, [[1, 1, 0, 0], [1, 1, 0, 0], EEEE, EEEE]),
        // T-piece
        Shape::from_bits(2, 3, [[0, 1, 0, 0], [1, 1, 1, 0], EEEE, EEEE]),
        // S-piece
        Shape::from_bits(2, 3, [[0, 1, 1, 0], [1, 1, 0, 0], EEEE, EEEE]),
        // Z-piece
        Shape::from_bits(2, 3, [[1, 1, 0, 0], [0, 1, 1, 0], EEEE, EEEE]),
        // J-piece
        Shape::from_bits(2, 3, [[1, 0, 0, 0], [1, 1, 1, 0], EEEE, EEEE]),
        // L-piece
        Shape::from_bits(2, 3, [[0, 0, 1, 0], [1, 1, 1, 0], EEEE, EEEE]),
    ]
};
