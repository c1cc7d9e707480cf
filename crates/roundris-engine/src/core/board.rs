use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::piece::{PieceKind, Tetromino};

/// Number of columns on the board.
pub const BOARD_WIDTH: usize = 15;
/// Number of rows on the board.
pub const BOARD_HEIGHT: usize = 15;

/// A single board cell.
///
/// The board only ever holds "empty" or one of the seven piece kinds, which
/// correspond to type codes 0 and 1-7 respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Locked block of a specific piece kind.
    Piece(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_occupied(self) -> bool {
        !self.is_empty()
    }

    /// Type code of the cell: 0 when empty, otherwise the piece kind's code.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Piece(kind) => kind.code(),
        }
    }

    /// Returns `None` for codes outside `0..=7`.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        if code == 0 {
            return Some(Cell::Empty);
        }
        PieceKind::from_code(code).map(Cell::Piece)
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Piece(kind) => kind.as_char(),
        }
    }

    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        if c == '.' {
            return Some(Cell::Empty);
        }
        PieceKind::from_char(c).map(Cell::Piece)
    }
}

/// Error returned when parsing a [`Board`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
    #[display("row {row}: expected {expected} cells, found {found}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("row {row}, column {col}: invalid cell {ch:?}")]
    InvalidCell { row: usize, col: usize, ch: char },
}

/// The locked-block grid.
///
/// Rows are indexed top to bottom (`y`), columns left to right (`x`). The
/// board has no sentinel margins; callers that look outside the grid decide
/// for themselves how the border behaves (see [`Board::is_valid_position`]
/// and [`Neighbors::on_board`](super::adjacency::Neighbors::on_board)).
///
/// # Text form
///
/// `Display` and `FromStr` use one line per row and one character per cell:
/// `.` for empty and the piece letter otherwise.
///
/// ```
/// use roundris_engine::{BOARD_HEIGHT, Board};
///
/// let text = format!("{}\n", ["..............."; BOARD_HEIGHT].join("\n"));
/// let board: Board = text.parse().unwrap();
/// assert_eq!(board, Board::EMPTY);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: [[Cell; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
    };

    /// Returns the cell at column `x`, row `y`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    /// Returns whether an in-grid cell holds a block. Outside the grid is `false`.
    #[must_use]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).is_some_and(Cell::is_occupied)
    }

    /// Overwrites a single cell.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the board.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        self.rows[y][x] = cell;
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_WIDTH]> {
        self.rows.iter()
    }

    /// Iterates over every occupied cell as `(x, y, kind)`.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, PieceKind)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, cell)| match cell {
                    Cell::Empty => None,
                    Cell::Piece(kind) => Some((x, y, *kind)),
                })
        })
    }

    /// Checks whether `piece` shifted by `(dx, dy)` fits on the board.
    ///
    /// A position is invalid if any occupied cell of the piece would land
    ///
    /// - outside the columns `0..BOARD_WIDTH`,
    /// - at or below row `BOARD_HEIGHT`, or
    /// - on an occupied board cell.
    ///
    /// Rows above the board (`y < 0`) have no upper bound and are never checked
    /// for occupancy, so pieces can hang over the top while spawning.
    #[must_use]
    pub fn is_valid_position(&self, piece: &Tetromino, dx: i32, dy: i32) -> bool {
        piece.occupied_positions().all(|(x, y)| {
            let (x, y) = (x + dx, y + dy);
            let in_columns = usize::try_from(x).is_ok_and(|x| x < BOARD_WIDTH);
            let above_floor = usize::try_from(y).map_or(true, |y| y < BOARD_HEIGHT);
            in_columns && above_floor && !self.is_occupied(x, y)
        })
    }

    /// Writes the piece's cells into the board with the piece's kind.
    ///
    /// Cells above or outside the board are skipped.
    pub fn fill_piece(&mut self, piece: &Tetromino) {
        for (x, y) in piece.occupied_positions() {
            if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
                && x < BOARD_WIDTH
                && y < BOARD_HEIGHT
            {
                self.rows[y][x] = Cell::Piece(piece.kind());
            }
        }
    }

    /// Returns whether every cell in row `y` is occupied.
    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows[y].iter().all(|cell| cell.is_occupied())
    }

    /// Removes full rows, shifts the rows above them down and refills the top
    /// with empty rows.
    ///
    /// Returns the number of rows removed.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..BOARD_HEIGHT).rev() {
            if self.is_row_full(y) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill([Cell::Empty; BOARD_WIDTH]);
        count
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        if lines.len() != BOARD_HEIGHT {
            return Err(ParseBoardError::RowCount {
                expected: BOARD_HEIGHT,
                found: lines.len(),
            });
        }

        let mut board = Board::EMPTY;
        for (row, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != BOARD_WIDTH {
                return Err(ParseBoardError::RowWidth {
                    row,
                    expected: BOARD_WIDTH,
                    found: width,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                board.rows[row][col] =
                    Cell::from_char(ch).ok_or(ParseBoardError::InvalidCell { row, col, ch })?;
            }
        }
        Ok(board)
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
