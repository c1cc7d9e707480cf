use ratatui::style::{Color, Style};
use roundris_engine::PieceKind;

/// Colors used by every widget. Widgets never pick colors on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub dim: Color,
    pub border: Color,
    pub paused: Color,
    pub game_over: Color,
    pieces: [Color; PieceKind::LEN],
}

const fn fg_bg(fg: Color, bg: Color) -> Style {
    Style::new().fg(fg).bg(bg)
}

impl Palette {
    /// Tonal colors in the style of Material You.
    pub const MATERIAL: Self = Self {
        background: Color::Rgb(0x1c, 0x1b, 0x1f),
        foreground: Color::Rgb(0xe6, 0xe1, 0xe5),
        dim: Color::Rgb(0x49, 0x45, 0x4f),
        border: Color::Rgb(0xca, 0xc4, 0xd0),
        paused: Color::Rgb(0xef, 0xb8, 0xc8),
        game_over: Color::Rgb(0xf2, 0xb8, 0xb5),
        pieces: [
            Color::Rgb(0x80, 0xd0, 0xe8), // I
            Color::Rgb(0xf0, 0xd0, 0x80), // O
            Color::Rgb(0xd0, 0xbc, 0xff), // T
            Color::Rgb(0xa8, 0xd8, 0x90), // S
            Color::Rgb(0xff, 0xb4, 0xab), // Z
            Color::Rgb(0x9e, 0xc2, 0xff), // J
            Color::Rgb(0xff, 0xb8, 0x78), // L
        ],
    };

    /// Saturated guideline colors.
    pub const CLASSIC: Self = Self {
        background: Color::Rgb(0, 0, 0),
        foreground: Color::Rgb(255, 255, 255),
        dim: Color::Rgb(127, 127, 127),
        border: Color::Rgb(255, 255, 255),
        paused: Color::Rgb(255, 255, 0),
        game_over: Color::Rgb(255, 0, 0),
        pieces: [
            Color::Rgb(0, 255, 255),
            Color::Rgb(255, 255, 0),
            Color::Rgb(255, 0, 255),
            Color::Rgb(0, 255, 0),
            Color::Rgb(255, 0, 0),
            Color::Rgb(0, 0, 255),
            Color::Rgb(255, 127, 0),
        ],
    };

    pub fn piece(&self, kind: PieceKind) -> Color {
        self.pieces[usize::from(kind.code() - 1)]
    }

    pub const fn text(&self) -> Style {
        fg_bg(self.foreground, self.background)
    }

    pub const fn empty_dot(&self) -> Style {
        fg_bg(self.dim, self.background)
    }

    /// Glyphs draw in the piece color over the background, so the rounded
    /// parts of a cell show the background.
    pub fn block(&self, kind: PieceKind) -> Style {
        fg_bg(self.piece(kind), self.background)
    }
}

/// Selectable color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Theme {
    #[default]
    Material,
    Classic,
}

impl Theme {
    pub const fn palette(self) -> &'static Palette {
        match self {
            Theme::Material => &Palette::MATERIAL,
            Theme::Classic => &Palette::CLASSIC,
        }
    }
}
