use std::iter;

use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::Widget,
};
use roundris_engine::{CellCorners, CornerStyle, PieceKind};

use crate::ui::palette::Palette;

/// One board cell, drawn as two terminal columns.
///
/// The left column carries the cell's left corners and the right column its
/// right corners, so a convex corner shows as a rounded or cut glyph, a
/// merged corner as a full block and a concave corner as a notch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDisplay {
    style: Style,
    symbol: [&'static str; 2],
}

impl BlockDisplay {
    pub const fn new(style: Style, symbol: [&'static str; 2]) -> Self {
        Self { style, symbol }
    }

    pub const fn width() -> u16 {
        2
    }

    pub const fn height() -> u16 {
        1
    }

    pub const fn empty(palette: &Palette, show_dots: bool) -> Self {
        if show_dots {
            Self::new(palette.empty_dot(), [".", " "])
        } else {
            Self::new(palette.text(), [" ", " "])
        }
    }

    pub fn ghost(palette: &Palette, kind: PieceKind) -> Self {
        Self::new(palette.block(kind), ["[", "]"])
    }

    pub fn piece(palette: &Palette, kind: PieceKind, corners: &CellCorners) -> Self {
        Self::new(
            palette.block(kind),
            [
                left_glyph(corners.top_left, corners.bottom_left),
                right_glyph(corners.top_right, corners.bottom_right),
            ],
        )
    }

    pub fn symbol(&self) -> [&'static str; 2] {
        self.symbol
    }
}

fn left_glyph(top: CornerStyle, bottom: CornerStyle) -> &'static str {
    use CornerStyle::{Concave, Convex};
    match (top, bottom) {
        (Convex, Convex) => "◖",
        (Convex, _) => "◢",
        (_, Convex) => "◥",
        (Concave, Concave) => "▐",
        (Concave, _) => "▟",
        (_, Concave) => "▜",
        _ => "█",
    }
}

fn right_glyph(top: CornerStyle, bottom: CornerStyle) -> &'static str {
    use CornerStyle::{Concave, Convex};
    match (top, bottom) {
        (Convex, Convex) => "◗",
        (Convex, _) => "◣",
        (_, Convex) => "◤",
        (Concave, Concave) => "▌",
        (Concave, _) => "▙",
        (_, Concave) => "▛",
        _ => "█",
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        for (column, symbol) in iter::zip(area.columns(), self.symbol) {
            if let Some(cell) = buf.cell_mut((column.x, column.y)) {
                cell.set_style(self.style);
                cell.set_symbol(symbol);
            }
        }
    }
}
