use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, ErrorKind, Write as _},
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use roundris_engine::ScoreStore;
use serde::{Deserialize, Serialize};

/// On-disk layout of the score file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ScoreFile {
    /// Best score so far
    high_score: u32,
    /// When the file was last written
    saved_at: DateTime<Utc>,
    /// Board in text form, if one was saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    board: Option<String>,
}

/// [`ScoreStore`] backed by a JSON file.
///
/// I/O failures never reach the engine. The most recent one is kept and can
/// be shown to the player through [`FileScoreStore::last_error`].
///
/// A file that could not be read when the store was opened is never
/// overwritten, since it may hold a higher score than the one in memory.
/// A file that was read but did not parse is replaced on the next save.
#[derive(Debug)]
pub struct FileScoreStore {
    path: PathBuf,
    data: Option<ScoreFile>,
    read_only: bool,
    last_error: Option<anyhow::Error>,
}

impl FileScoreStore {
    /// Loads the score file at `path`. A missing file is an empty store.
    pub fn load(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let data = read_score_file(&path)?;
        Ok(Self {
            path,
            data,
            read_only: false,
            last_error: None,
        })
    }

    /// Like [`Self::load`], but a failed load becomes an empty store with
    /// the error recorded.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::load(path.clone()).unwrap_or_else(|e| Self {
            path,
            data: None,
            read_only: !is_parse_error(&e),
            last_error: Some(e),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.data.as_ref().map(|data| data.saved_at)
    }

    pub fn last_error(&self) -> Option<&anyhow::Error> {
        self.last_error.as_ref()
    }

    /// Deletes the score file.
    pub fn reset(&mut self) -> anyhow::Result<()> {
        self.data = None;
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e)
                .with_context(|| format!("Failed to remove score file: {}", self.path.display())),
            _ => {
                self.read_only = false;
                self.last_error = None;
                Ok(())
            }
        }
    }

    fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&mut ScoreFile),
    {
        let data = self.data.get_or_insert_with(|| ScoreFile {
            high_score: 0,
            saved_at: Utc::now(),
            board: None,
        });
        f(data);
        data.saved_at = Utc::now();
        if self.read_only {
            self.last_error = Some(anyhow!(
                "Score file was unreadable at startup, not overwriting: {}",
                self.path.display()
            ));
            return;
        }
        self.last_error = write_score_file(&self.path, data).err();
    }
}

impl ScoreStore for FileScoreStore {
    fn score(&self) -> Option<u32> {
        self.data.as_ref().map(|data| data.high_score)
    }

    fn save_score(&mut self, score: u32) {
        self.update(|data| data.high_score = score);
    }

    fn board(&self) -> Option<String> {
        self.data.as_ref().and_then(|data| data.board.clone())
    }

    fn save_board(&mut self, board: &str) {
        self.update(|data| data.board = Some(board.to_owned()));
    }
}

/// Whether `error` comes from malformed JSON rather than from reading the file.
fn is_parse_error(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<serde_json::Error>()
        .is_some_and(|e| !e.is_io())
}

fn read_score_file(path: &Path) -> anyhow::Result<Option<ScoreFile>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to open score file: {}", path.display()));
        }
    };
    let data = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse score file: {}", path.display()))?;
    Ok(Some(data))
}

fn write_score_file(path: &Path, data: &ScoreFile) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create score file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to write score file: {}", path.display()))?;
    Ok(())
}
