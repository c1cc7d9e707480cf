use std::time::Duration;

use crate::core::{AdjacencyMap, Board, Tetromino, landing_position};

use super::GameStats;

/// Lifecycle phase of a [`GameEngine`](super::GameEngine).
///
/// Locking happens inside a single call and is never observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum EnginePhase {
    /// Waiting for a piece: before play starts or between a lock and the next spawn.
    Spawning,
    /// A piece is active and accepts commands.
    Falling,
    GameOver,
}

/// Immutable view of the engine state, published after every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub(crate) board: Board,
    pub(crate) active_piece: Option<Tetromino>,
    pub(crate) next_piece: Option<Tetromino>,
    pub(crate) stats: GameStats,
    pub(crate) high_score: u32,
    pub(crate) phase: EnginePhase,
    pub(crate) paused: bool,
    pub(crate) speed: Duration,
}

impl GameSnapshot {
    /// Locked cells at the time of the snapshot.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The falling piece, if any.
    #[must_use]
    pub fn active_piece(&self) -> Option<&Tetromino> {
        self.active_piece.as_ref()
    }

    /// The upcoming piece shown in the preview.
    #[must_use]
    pub fn next_piece(&self) -> Option<&Tetromino> {
        self.next_piece.as_ref()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.stats.score()
    }

    /// Best score, never lower than the stored one.
    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Statistics of the game.
    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Returns `true` once the game has ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    /// Returns `true` while the game is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current gravity interval.
    #[must_use]
    pub fn speed(&self) -> Duration {
        self.speed
    }

    /// Where the active piece would land if dropped straight down.
    #[must_use]
    pub fn ghost_piece(&self) -> Option<Tetromino> {
        self.active_piece
            .map(|piece| landing_position(&self.board, &piece))
    }

    /// Corner classification of the board and the active piece.
    #[must_use]
    pub fn adjacency(&self) -> AdjacencyMap {
        AdjacencyMap::compute(&self.board, self.active_piece.as_ref())
    }
}
