use std::path::PathBuf;

use chrono::Local;
use roundris_engine::ScoreStore as _;

use crate::storage::FileScoreStore;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ScoreArg {
    /// Path to the high score file
    #[clap(long, default_value = super::DEFAULT_SCORE_FILE)]
    score_file: PathBuf,
    /// Delete the saved high score
    #[clap(long)]
    reset: bool,
}

pub(crate) fn run(arg: &ScoreArg) -> anyhow::Result<()> {
    let ScoreArg { score_file, reset } = arg;

    if *reset {
        // A broken file must still be removable.
        let mut store = FileScoreStore::open(score_file);
        store.reset()?;
        println!("High score reset ({})", store.path().display());
        return Ok(());
    }

    let store = FileScoreStore::load(score_file)?;

    match (store.score(), store.saved_at()) {
        (Some(score), Some(saved_at)) => println!(
            "High score: {score} (saved {})",
            saved_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        ),
        _ => println!("No high score saved yet"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir()
            .join(format!("roundris-score-test-{}", process::id()))
            .join(name)
    }

    #[test]
    fn test_reset_removes_corrupt_file() {
        let path = temp_path("corrupt.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ broken").unwrap();

        let show = ScoreArg {
            score_file: path.clone(),
            reset: false,
        };
        assert!(run(&show).is_err());

        let reset = ScoreArg {
            score_file: path.clone(),
            reset: true,
        };
        run(&reset).unwrap();
        assert!(!path.exists());
        run(&show).unwrap();
    }
}
