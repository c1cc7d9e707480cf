/// Persistence for the high score.
///
/// Methods are infallible: implementations deal with their own I/O failures
/// (and may report them elsewhere) so the engine never has to.
///
/// `board`/`save_board` carry the [`Board`](crate::Board) text form and are
/// reserved; the engine itself never calls them.
pub trait ScoreStore {
    /// Stored high score, or `None` when nothing has been saved yet.
    fn score(&self) -> Option<u32>;

    fn save_score(&mut self, score: u32);

    fn board(&self) -> Option<String> {
        None
    }

    fn save_board(&mut self, board: &str) {
        let _ = board;
    }
}

impl<S> ScoreStore for &mut S
where
    S: ScoreStore + ?Sized,
{
    fn score(&self) -> Option<u32> {
        (**self).score()
    }

    fn save_score(&mut self, score: u32) {
        (**self).save_score(score);
    }

    fn board(&self) -> Option<String> {
        (**self).board()
    }

    fn save_board(&mut self, board: &str) {
        (**self).save_board(board);
    }
}

/// In-memory store, mainly for tests and headless runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryScoreStore {
    score: Option<u32>,
    board: Option<String>,
    saves: usize,
}

impl MemoryScoreStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_score(score: u32) -> Self {
        Self {
            score: Some(score),
            ..Self::default()
        }
    }

    /// How many times [`ScoreStore::save_score`] was called.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl ScoreStore for MemoryScoreStore {
    fn score(&self) -> Option<u32> {
        self.score
    }

    fn save_score(&mut self, score: u32) {
        self.score = Some(score);
        self.saves += 1;
    }

    fn board(&self) -> Option<String> {
        self.board.clone()
    }

    fn save_board(&mut self, board: &str) {
        self.board = Some(board.to_owned());
    }
}
