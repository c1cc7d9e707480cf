use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};
use roundris_engine::{EnginePhase, GameSnapshot};

use crate::ui::{
    palette::Palette,
    widgets::{BoardDisplay, PieceDisplay, SessionStatsDisplay},
};

/// Board, next-piece preview and statistics of one game, side by side.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    snapshot: &'a GameSnapshot,
    palette: &'a Palette,
    show_ghost: bool,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(snapshot: &'a GameSnapshot, palette: &'a Palette) -> Self {
        Self {
            snapshot,
            palette,
            show_ghost: true,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    pub fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let palette = self.palette;
        let style = palette.text();
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_color = match self.snapshot.phase() {
            EnginePhase::GameOver => palette.game_over,
            _ if self.snapshot.is_paused() => palette.paused,
            _ => palette.border,
        };

        let adjacency = self.snapshot.adjacency();
        let game_board = {
            let widget = BoardDisplay::new(self.snapshot.board(), &adjacency, palette)
                .block(Block::bordered().border_style(border_color).style(style));
            match self.snapshot.ghost_piece() {
                Some(ghost) if self.show_ghost => widget.ghost(ghost),
                _ => widget,
            }
        };
        let next_panel = {
            let panel = PieceDisplay::new(palette).block(
                Block::bordered()
                    .title(Line::from("NEXT").centered())
                    .padding(block_padding)
                    .border_style(border_color)
                    .style(style),
            );
            match self.snapshot.next_piece() {
                Some(piece) => panel.piece(piece),
                None => panel,
            }
        };
        let session_stats = SessionStatsDisplay::new(self.snapshot, palette).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(border_color)
                .style(style),
        );

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(session_stats.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(session_stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        let popup = if self.snapshot.is_game_over() {
            Some((
                "GAME OVER!!",
                Style::new().fg(palette.background).bg(palette.game_over),
            ))
        } else if self.snapshot.is_paused() {
            Some(("PAUSED", Style::new().fg(palette.background).bg(palette.paused)))
        } else {
            None
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
