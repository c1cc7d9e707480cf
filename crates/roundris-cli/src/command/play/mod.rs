use std::{path::PathBuf, time::Duration};

use roundris_engine::{EngineConfig, PieceSeed};

use self::app::PlayApp;
use crate::{storage::FileScoreStore, tui::Tui, ui::palette::Theme};

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Gravity interval in milliseconds [default: 500]
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: Option<u64>,
    /// Delay between a lock and the next piece in milliseconds [default: 500]
    #[clap(long)]
    spawn_delay_ms: Option<u64>,
    /// Delay before the first piece of a game in milliseconds [default: 100]
    #[clap(long)]
    start_delay_ms: Option<u64>,
    /// Piece seed (up to 32 hex digits) for a reproducible piece sequence
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Path to the high score file [default: ./data/high_score.json]
    #[clap(long)]
    score_file: Option<PathBuf>,
    /// Color theme
    #[clap(long, value_enum, default_value_t)]
    theme: Theme,
    /// Hide the landing preview of the falling piece
    #[clap(long)]
    no_ghost: bool,
}

impl PlayArg {
    fn engine_config(&self) -> EngineConfig {
        let defaults = EngineConfig::default();
        EngineConfig {
            tick_interval: self
                .tick_ms
                .map_or(defaults.tick_interval, Duration::from_millis),
            spawn_delay: self
                .spawn_delay_ms
                .map_or(defaults.spawn_delay, Duration::from_millis),
            start_delay: self
                .start_delay_ms
                .map_or(defaults.start_delay, Duration::from_millis),
            seed: self.seed,
        }
    }

    fn score_file(&self) -> PathBuf {
        self.score_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(super::DEFAULT_SCORE_FILE))
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let store = FileScoreStore::open(arg.score_file());
    let mut app = PlayApp::new(arg.engine_config(), store, arg.theme.palette(), !arg.no_ghost);

    Tui::new().run(&mut app)?;

    let snapshot = app.snapshot();
    println!(
        "Score: {} | High score: {}",
        snapshot.score(),
        snapshot.high_score().max(snapshot.score())
    );
    if let Some(e) = app.store_error() {
        eprintln!("warning: {e:#}");
    }
    Ok(())
}
