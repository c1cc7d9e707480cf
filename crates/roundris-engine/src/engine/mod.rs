//! Game rules and timing on top of the [`core`](crate::core) data types.
//!
//! - [`GameEngine`] - the state machine: spawning, gravity, movement,
//!   rotation with wall kicks, locking, line clears and game over
//! - [`Scheduler`] - cancelable one-shot and repeating tasks on a virtual clock
//! - [`GameSnapshot`] - immutable state published after every mutation
//! - [`GameStats`] - score and line-clear statistics
//! - [`PieceFactory`] - seeded piece generation with per-engine identifiers
//! - [`ScoreStore`] - high score persistence
//!
//! # Game Flow
//!
//! 1. [`GameEngine::new`] starts a game; the first two pieces appear after
//!    [`EngineConfig::start_delay`]
//! 2. The driver calls [`GameEngine::advance`] with elapsed time, which fires
//!    the gravity tick every [`EngineConfig::tick_interval`]
//! 3. Player commands are applied with [`GameEngine::apply`]
//! 4. A piece that cannot move down locks; full rows are cleared and the next
//!    piece spawns after [`EngineConfig::spawn_delay`]
//! 5. The game ends when a piece locks above the board or cannot spawn, and
//!    a new high score is saved to the [`ScoreStore`]

pub use self::{
    command::*, config::*, game_engine::*, game_stats::*, piece_factory::*, scheduler::*,
    snapshot::*, storage::*,
};

mod command;
mod config;
mod game_engine;
mod game_stats;
mod piece_factory;
mod scheduler;
mod snapshot;
mod storage;
