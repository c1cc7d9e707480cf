//! Neighbor occupancy and corner classification for rendering.
//!
//! Every occupied cell looks at its eight surrounding cells. The two edge
//! neighbors that meet at a corner, together with the diagonal neighbor
//! between them, decide how that corner is drawn:
//!
//! ```text
//!  convex        merged        concave
//!  . .           # #           . #
//!  . X           # X           # X
//! ```
//!
//! Locked cells and the falling piece follow different border rules, see
//! [`Neighbors::on_board`] and [`Neighbors::in_shape`].

use super::{
    board::{BOARD_HEIGHT, BOARD_WIDTH, Board},
    piece::{PieceKind, Shape, Tetromino},
};

/// One of the four corners of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Self; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];
}

/// How a cell corner is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum CornerStyle {
    /// Neither adjacent edge is occupied: rounded outward.
    Convex,
    /// At least one adjacent edge is occupied and no notch is needed: square.
    Merged,
    /// Both adjacent edges are occupied but the diagonal is not: inward notch.
    Concave,
}

/// Occupancy of the eight cells around a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[expect(clippy::struct_excessive_bools)]
pub struct Neighbors {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
    pub top_left: bool,
    pub top_right: bool,
    pub bottom_left: bool,
    pub bottom_right: bool,
}

impl Neighbors {
    /// Builds the neighbor set of `(x, y)` from an occupancy lookup.
    pub fn from_lookup<F>(x: i32, y: i32, occupied: F) -> Self
    where
        F: Fn(i32, i32) -> bool,
    {
        Self {
            top: occupied(x, y - 1),
            bottom: occupied(x, y + 1),
            left: occupied(x - 1, y),
            right: occupied(x + 1, y),
            top_left: occupied(x - 1, y - 1),
            top_right: occupied(x + 1, y - 1),
            bottom_left: occupied(x - 1, y + 1),
            bottom_right: occupied(x + 1, y + 1),
        }
    }

    /// Neighbors of a locked board cell.
    ///
    /// The side walls and the floor count as occupied, so blocks resting on
    /// them stay flush with the border. The space above row 0 counts as empty.
    #[must_use]
    pub fn on_board(board: &Board, x: i32, y: i32) -> Self {
        Self::from_lookup(x, y, |x, y| board_occupancy(board, x, y))
    }

    /// Neighbors of a cell inside a piece's shape matrix.
    ///
    /// Anything outside the matrix counts as empty.
    #[must_use]
    pub fn in_shape(shape: &Shape, col: i32, row: i32) -> Self {
        Self::from_lookup(col, row, |col, row| shape.is_occupied(col, row))
    }

    /// Returns the `(first edge, second edge, diagonal)` flags meeting at `corner`.
    #[must_use]
    pub fn around(&self, corner: Corner) -> (bool, bool, bool) {
        match corner {
            Corner::TopLeft => (self.top, self.left, self.top_left),
            Corner::TopRight => (self.top, self.right, self.top_right),
            Corner::BottomLeft => (self.bottom, self.left, self.bottom_left),
            Corner::BottomRight => (self.bottom, self.right, self.bottom_right),
        }
    }

    #[must_use]
    pub fn corner_style(&self, corner: Corner) -> CornerStyle {
        match self.around(corner) {
            (false, false, _) => CornerStyle::Convex,
            (true, true, false) => CornerStyle::Concave,
            _ => CornerStyle::Merged,
        }
    }

    #[must_use]
    pub fn corners(&self) -> CellCorners {
        CellCorners {
            top_left: self.corner_style(Corner::TopLeft),
            top_right: self.corner_style(Corner::TopRight),
            bottom_left: self.corner_style(Corner::BottomLeft),
            bottom_right: self.corner_style(Corner::BottomRight),
        }
    }
}

fn board_occupancy(board: &Board, x: i32, y: i32) -> bool {
    let outside_sides = usize::try_from(x).map_or(true, |x| x >= BOARD_WIDTH);
    let below_floor = usize::try_from(y).is_ok_and(|y| y >= BOARD_HEIGHT);
    outside_sides || below_floor || board.is_occupied(x, y)
}

/// Corner styles of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCorners {
    pub top_left: CornerStyle,
    pub top_right: CornerStyle,
    pub bottom_left: CornerStyle,
    pub bottom_right: CornerStyle,
}

impl CellCorners {
    #[must_use]
    pub fn get(&self, corner: Corner) -> CornerStyle {
        match corner {
            Corner::TopLeft => self.top_left,
            Corner::TopRight => self.top_right,
            Corner::BottomLeft => self.bottom_left,
            Corner::BottomRight => self.bottom_right,
        }
    }
}

/// Classification of one occupied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAdjacency {
    /// Column of the cell (board column, or shape column for [`AdjacencyMap::for_shape`]).
    pub x: i32,
    /// Row of the cell (board row, or shape row for [`AdjacencyMap::for_shape`]).
    pub y: i32,
    pub kind: PieceKind,
    pub neighbors: Neighbors,
    pub corners: CellCorners,
}

impl CellAdjacency {
    fn new(x: i32, y: i32, kind: PieceKind, neighbors: Neighbors) -> Self {
        Self {
            x,
            y,
            kind,
            neighbors,
            corners: neighbors.corners(),
        }
    }
}

/// Corner classification of every occupied cell of a board and falling piece.
///
/// This is a pure function of its inputs and is meant to be recomputed for
/// every frame rather than stored alongside game state.
///
/// # Example
///
/// ```
/// use roundris_engine::{AdjacencyMap, Board, CornerStyle, PieceId, PieceKind, Tetromino};
///
/// let piece = Tetromino::new(PieceId::default(), PieceKind::O).at(4, 4);
/// let map = AdjacencyMap::compute(&Board::EMPTY, Some(&piece));
///
/// let top_left = map.piece_cell(4, 4).unwrap();
/// assert_eq!(top_left.corners.top_left, CornerStyle::Convex);
/// assert_eq!(top_left.corners.bottom_right, CornerStyle::Merged);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyMap {
    board_cells: Vec<CellAdjacency>,
    piece_cells: Vec<CellAdjacency>,
}

impl AdjacencyMap {
    /// Classifies every locked cell of `board` and every cell of `piece`.
    ///
    /// Piece cells are reported in board coordinates (including rows above
    /// the board) and are classified from the piece's own shape only; the
    /// falling piece never merges with locked blocks.
    #[must_use]
    pub fn compute(board: &Board, piece: Option<&Tetromino>) -> Self {
        #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        let board_cells = board
            .occupied_cells()
            .map(|(x, y, kind)| {
                let (x, y) = (x as i32, y as i32);
                CellAdjacency::new(x, y, kind, Neighbors::on_board(board, x, y))
            })
            .collect();
        let piece_cells = piece
            .map(|piece| classify_shape(piece.shape(), piece.kind(), piece.x(), piece.y()))
            .unwrap_or_default();
        Self {
            board_cells,
            piece_cells,
        }
    }

    /// Classifies a lone shape, e.g. for a next-piece preview.
    ///
    /// Cells are reported in shape coordinates.
    #[must_use]
    pub fn for_shape(shape: &Shape, kind: PieceKind) -> Self {
        Self {
            board_cells: Vec::new(),
            piece_cells: classify_shape(shape, kind, 0, 0),
        }
    }

    #[must_use]
    pub fn board_cells(&self) -> &[CellAdjacency] {
        &self.board_cells
    }

    #[must_use]
    pub fn piece_cells(&self) -> &[CellAdjacency] {
        &self.piece_cells
    }

    #[must_use]
    pub fn board_cell(&self, x: i32, y: i32) -> Option<&CellAdjacency> {
        self.board_cells
            .iter()
            .find(|cell| cell.x == x && cell.y == y)
    }

    #[must_use]
    pub fn piece_cell(&self, x: i32, y: i32) -> Option<&CellAdjacency> {
        self.piece_cells
            .iter()
            .find(|cell| cell.x == x && cell.y == y)
    }
}

fn classify_shape(shape: &Shape, kind: PieceKind, x0: i32, y0: i32) -> Vec<CellAdjacency> {
    shape
        .occupied_cells()
        .map(|(col, row)| {
            CellAdjacency::new(
                x0 + col,
                y0 + row,
                kind,
                Neighbors::in_shape(shape, col, row),
            )
        })
        .collect()
}

/// Returns `piece` moved straight down as far as it can go.
///
/// Used for the ghost preview; neither `board` nor `piece` is modified.
#[must_use]
pub fn landing_position(board: &Board, piece: &Tetromino) -> Tetromino {
    let mut landed = *piece;
    while board.is_valid_position(&landed, 0, 1) {
        landed = landed.shifted(0, 1);
    }
    landed
}

#[cfg(test)]
mod tests {
    use crate::core::{board::Cell, piece::PieceId};

    use super::*;

    fn board_from(cells: &[(usize, usize)]) -> Board {
        let mut board = Board::EMPTY;
        for &(x, y) in cells {
            board.set_cell(x, y, Cell::Piece(PieceKind::T));
        }
        board
    }

    fn all_corners(style: CornerStyle) -> CellCorners {
        CellCorners {
            top_left: style,
            top_right: style,
            bottom_left: style,
            bottom_right: style,
        }
    }

    #[test]
    fn test_isolated_cell_is_convex() {
        let board = board_from(&[(5, 5)]);
        let map = AdjacencyMap::compute(&board, None);
        let cell = map.board_cell(5, 5).unwrap();
        assert_eq!(cell.neighbors, Neighbors::default());
        assert_eq!(cell.corners, all_corners(CornerStyle::Convex));
    }

    #[test]
    fn test_square_block_outer_convex_inner_merged() {
        let board = board_from(&[(5, 5), (6, 5), (5, 6), (6, 6)]);
        let map = AdjacencyMap::compute(&board, None);

        let top_left = map.board_cell(5, 5).unwrap().corners;
        assert_eq!(top_left.top_left, CornerStyle::Convex);
        assert_eq!(top_left.top_right, CornerStyle::Merged);
        assert_eq!(top_left.bottom_left, CornerStyle::Merged);
        assert_eq!(top_left.bottom_right, CornerStyle::Merged);

        assert_eq!(
            map.board_cell(6, 5).unwrap().corners.top_right,
            CornerStyle::Convex
        );
        assert_eq!(
            map.board_cell(5, 6).unwrap().corners.bottom_left,
            CornerStyle::Convex
        );
        assert_eq!(
            map.board_cell(6, 6).unwrap().corners.bottom_right,
            CornerStyle::Convex
        );

        // The four corners meeting in the middle of the block.
        assert_eq!(
            map.board_cell(6, 5).unwrap().corners.bottom_left,
            CornerStyle::Merged
        );
        assert_eq!(
            map.board_cell(5, 6).unwrap().corners.top_right,
            CornerStyle::Merged
        );
        assert_eq!(
            map.board_cell(6, 6).unwrap().corners.top_left,
            CornerStyle::Merged
        );
    }

    #[test]
    fn test_l_tromino_has_concave_corner() {
        // (5,4)
        // (5,5) (6,5)
        let board = board_from(&[(5, 4), (5, 5), (6, 5)]);
        let map = AdjacencyMap::compute(&board, None);
        let elbow = map.board_cell(5, 5).unwrap();
        assert!(elbow.neighbors.top && elbow.neighbors.right && !elbow.neighbors.top_right);
        assert_eq!(elbow.corners.top_right, CornerStyle::Concave);
        assert_eq!(elbow.corners.top_left, CornerStyle::Merged);
        assert_eq!(elbow.corners.bottom_left, CornerStyle::Convex);
        assert_eq!(elbow.corners.bottom_right, CornerStyle::Merged);
    }

    #[test]
    fn test_board_walls_count_as_occupied() {
        let board = board_from(&[(0, 14)]);
        let map = AdjacencyMap::compute(&board, None);
        let cell = map.board_cell(0, 14).unwrap();
        assert!(cell.neighbors.left && cell.neighbors.bottom && cell.neighbors.bottom_left);
        assert!(!cell.neighbors.top && !cell.neighbors.right);
        assert_eq!(cell.corners.top_left, CornerStyle::Merged);
        assert_eq!(cell.corners.top_right, CornerStyle::Convex);
        assert_eq!(cell.corners.bottom_left, CornerStyle::Merged);
        assert_eq!(cell.corners.bottom_right, CornerStyle::Merged);
    }

    #[test]
    fn test_board_top_edge_is_open() {
        let board = board_from(&[(7, 0)]);
        let map = AdjacencyMap::compute(&board, None);
        let cell = map.board_cell(7, 0).unwrap();
        assert!(!cell.neighbors.top && !cell.neighbors.top_left && !cell.neighbors.top_right);
        assert_eq!(cell.corners.top_left, CornerStyle::Convex);
        assert_eq!(cell.corners.top_right, CornerStyle::Convex);
    }

    #[test]
    fn test_cell_next_to_wall_and_floor_has_no_notch() {
        // Wall on the right, floor below, and a block on top: the wall/floor
        // diagonal counts as occupied so no concave corner appears.
        let board = board_from(&[(14, 13), (14, 14)]);
        let map = AdjacencyMap::compute(&board, None);
        let cell = map.board_cell(14, 14).unwrap();
        assert_eq!(cell.corners.top_right, CornerStyle::Merged);
        assert_eq!(cell.corners.bottom_right, CornerStyle::Merged);
    }

    #[test]
    fn test_piece_ignores_board_and_bounding_box() {
        let board = board_from(&[(0, 14), (1, 14), (2, 14)]);
        // T-piece resting on the row, touching the left wall.
        let piece = Tetromino::new(PieceId::default(), PieceKind::T).at(0, 12);
        let map = AdjacencyMap::compute(&board, Some(&piece));
        assert_eq!(map.piece_cells().len(), 4);

        let left_foot = map.piece_cell(0, 13).unwrap();
        assert!(!left_foot.neighbors.left, "wall is not part of the piece");
        assert!(
            !left_foot.neighbors.bottom,
            "board is not part of the piece"
        );
        assert_eq!(left_foot.corners.bottom_left, CornerStyle::Convex);
        assert_eq!(left_foot.corners.top_left, CornerStyle::Convex);

        let hub = map.piece_cell(1, 13).unwrap();
        assert_eq!(hub.corners.top_left, CornerStyle::Concave);
        assert_eq!(hub.corners.top_right, CornerStyle::Concave);
        assert_eq!(hub.corners.bottom_left, CornerStyle::Merged);
    }

    #[test]
    fn test_for_shape_uses_shape_coordinates() {
        let map = AdjacencyMap::for_shape(&PieceKind::I.shape(), PieceKind::I);
        let xs: Vec<_> = map.piece_cells().iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(xs, vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert!(map.board_cells().is_empty());
        let end = map.piece_cell(0, 0).unwrap();
        assert_eq!(end.corners.top_left, CornerStyle::Convex);
        assert_eq!(end.corners.top_right, CornerStyle::Merged);
    }

    #[test]
    fn test_identical_inputs_classify_identically() {
        let board = board_from(&[(3, 14), (4, 14), (4, 13), (9, 9)]);
        let piece = Tetromino::new(PieceId::default(), PieceKind::S);
        assert_eq!(
            AdjacencyMap::compute(&board, Some(&piece)),
            AdjacencyMap::compute(&board.clone(), Some(&piece))
        );
    }

    #[test]
    fn test_landing_position_on_floor_and_stack() {
        let piece = Tetromino::new(PieceId::default(), PieceKind::I);
        let landed = landing_position(&Board::EMPTY, &piece);
        assert_eq!((landed.x(), landed.y()), (6, 14));
        assert_eq!((piece.x(), piece.y()), (6, -2));

        let board = board_from(&[(8, 10)]);
        let landed = landing_position(&board, &piece);
        assert_eq!(landed.y(), 9);
    }
}
