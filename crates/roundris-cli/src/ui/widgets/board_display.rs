use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};
use roundris_engine::{AdjacencyMap, BOARD_HEIGHT, BOARD_WIDTH, Board, Tetromino};

use crate::ui::{palette::Palette, widgets::BlockDisplay};

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    adjacency: &'a AdjacencyMap,
    palette: &'a Palette,
    ghost: Option<Tetromino>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    /// `adjacency` must be computed from `board` and the falling piece;
    /// the falling piece is drawn from its piece cells.
    pub fn new(board: &'a Board, adjacency: &'a AdjacencyMap, palette: &'a Palette) -> Self {
        Self {
            board,
            adjacency,
            palette,
            ghost: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: Tetromino) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        BOARD_WIDTH as u16 * BlockDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        BOARD_HEIGHT as u16 * BlockDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }

    fn block_at(&self, x: i32, y: i32) -> BlockDisplay {
        if let Some(cell) = self
            .adjacency
            .piece_cell(x, y)
            .or_else(|| self.adjacency.board_cell(x, y))
        {
            return BlockDisplay::piece(self.palette, cell.kind, &cell.corners);
        }
        if let Some(ghost) = self.ghost
            && !self.board.is_occupied(x, y)
            && ghost.occupied_positions().any(|pos| pos == (x, y))
        {
            return BlockDisplay::ghost(self.palette, ghost.kind());
        }
        BlockDisplay::empty(self.palette, true)
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..BOARD_WIDTH).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..BOARD_HEIGHT).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<{ BOARD_HEIGHT }>(&vertical)
            .into_iter()
            .map(|row| row.layout::<{ BOARD_WIDTH }>(&horizontal));

        for (y, grid_row) in iter::zip(0_i32.., grid_cells) {
            for (x, grid_cell) in iter::zip(0_i32.., grid_row) {
                self.block_at(x, y).render(grid_cell, buf);
            }
        }
    }
}
