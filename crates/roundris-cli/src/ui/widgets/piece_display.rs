use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use roundris_engine::{AdjacencyMap, MAX_SHAPE_SIZE, Tetromino};

use crate::ui::{palette::Palette, widgets::BlockDisplay};

/// Preview of a single piece in its spawn orientation.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<&'a Tetromino>,
    palette: &'a Palette,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new(palette: &'a Palette) -> Self {
        Self {
            piece: None,
            palette,
            block: None,
        }
    }

    pub fn piece(self, piece: &'a Tetromino) -> Self {
        Self {
            piece: Some(piece),
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
        MAX_SHAPE_SIZE as u16 * BlockDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let empty_block = BlockDisplay::empty(self.palette, false);
        for position in area.positions() {
            if let Some(cell) = buf.cell_mut(position) {
                cell.set_style(self.palette.text());
                cell.set_symbol(" ");
            }
        }

        let Some(piece) = self.piece else {
            return;
        };
        let shape = piece.shape();
        let (cols, rows) = (shape.cols() as u16, shape.rows() as u16);
        let piece_area = area.centered(
            Constraint::Length(cols * BlockDisplay::width()),
            Constraint::Length(rows * BlockDisplay::height()),
        );

        let col_constraints = (0..cols).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..rows).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let adjacency = AdjacencyMap::for_shape(shape, piece.kind());
        for (y, grid_row) in grid_rows.enumerate() {
            for (x, grid_cell) in grid_row.into_iter().enumerate() {
                match adjacency.piece_cell(x as i32, y as i32) {
                    Some(cell) => {
                        BlockDisplay::piece(self.palette, cell.kind, &cell.corners)
                            .render(grid_cell, buf);
                    }
                    None => Widget::render(&empty_block, grid_cell, buf),
                }
            }
        }
    }
}
