use clap::{Parser, Subcommand};

use self::{play::PlayArg, score::ScoreArg};

mod play;
mod score;

/// Default location of the high score file.
const DEFAULT_SCORE_FILE: &str = "./data/high_score.json";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Show or reset the saved high score
    Score(#[clap(flatten)] ScoreArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Score(arg) => score::run(&arg)?,
    }
    Ok(())
}
