use std::{sync::Arc, time::Duration};

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::Style,
    text::Text,
};
use roundris_engine::{EngineConfig, EnginePhase, GameCommand, GameEngine, GameSnapshot};

use crate::{
    storage::FileScoreStore,
    tui::{App, Tui},
    ui::{palette::Palette, widgets::SessionDisplay},
};

const FRAME_RATE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Command(GameCommand),
    Quit,
}

fn key_action(code: KeyCode) -> Option<KeyAction> {
    let command = match code {
        KeyCode::Left | KeyCode::Char('a') => GameCommand::MoveLeft,
        KeyCode::Right | KeyCode::Char('d') => GameCommand::MoveRight,
        KeyCode::Down | KeyCode::Char('s') => GameCommand::SoftDrop,
        KeyCode::Up | KeyCode::Char('w') => GameCommand::Rotate,
        KeyCode::Char('r') => GameCommand::Restart,
        KeyCode::Char('p') => GameCommand::TogglePause,
        KeyCode::Char('q') | KeyCode::Esc => return Some(KeyAction::Quit),
        _ => return None,
    };
    Some(KeyAction::Command(command))
}

#[derive(Debug)]
pub(crate) struct PlayApp {
    engine: GameEngine<FileScoreStore>,
    palette: &'static Palette,
    show_ghost: bool,
    is_exiting: bool,
}

impl PlayApp {
    pub(crate) fn new(
        config: EngineConfig,
        store: FileScoreStore,
        palette: &'static Palette,
        show_ghost: bool,
    ) -> Self {
        Self {
            engine: GameEngine::new(config, store),
            palette,
            show_ghost,
            is_exiting: false,
        }
    }

    pub(crate) fn snapshot(&self) -> Arc<GameSnapshot> {
        self.engine.snapshot()
    }

    pub(crate) fn store_error(&self) -> Option<&anyhow::Error> {
        self.engine.store().last_error()
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_frame_rate(FRAME_RATE);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn next_update(&self) -> Option<Duration> {
        self.engine.time_until_next_task()
    }

    fn update(&mut self, _tui: &mut Tui, elapsed: Duration) {
        self.engine.advance(elapsed);
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        let Some(event) = event.as_key_event() else {
            return;
        };
        if event.kind == KeyEventKind::Release {
            return;
        }
        match key_action(event.code) {
            Some(KeyAction::Command(command)) => _ = self.engine.apply(command),
            Some(KeyAction::Quit) => self.is_exiting = true,
            None => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let snapshot = self.engine.snapshot();
        let session_display =
            SessionDisplay::new(&snapshot, self.palette).show_ghost(self.show_ghost);

        let help_text = match snapshot.phase() {
            EnginePhase::GameOver => "Controls: R (Restart) | Q (Quit)",
            _ if snapshot.is_paused() => "Controls: P (Resume) | R (Restart) | Q (Quit)",
            _ => {
                "Controls: ← → (Move) | ↓ (Soft Drop) | ↑ (Rotate) | P (Pause) | R (Restart) | Q (Quit)"
            }
        };
        let help_text = Text::from(help_text)
            .style(Style::new().fg(self.palette.dim))
            .centered();
        let status_text = self
            .store_error()
            .map(|e| {
                Text::from(format!("{e:#}"))
                    .style(Style::new().fg(self.palette.game_over))
                    .centered()
            })
            .unwrap_or_default();

        let [main_area, status_area, help_area] = Layout::vertical([
            Constraint::Length(17),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(&session_display, main_area);
        frame.render_widget(status_text, status_area);
        frame.render_widget(help_text, help_area);
    }
}
