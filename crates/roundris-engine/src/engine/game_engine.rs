use std::{sync::Arc, time::Duration};

use crate::core::{Board, Tetromino, landing_position};

use super::{
    EngineConfig, EnginePhase, GameCommand, GameSnapshot, GameStats, MemoryScoreStore, MoveOutcome,
    PieceFactory, ScoreStore,
    scheduler::{Scheduler, TaskHandle},
};

/// Horizontal offsets tried, in order, when a rotation collides.
pub const WALL_KICK_OFFSETS: [i32; 5] = [0, -1, 1, -2, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineTask {
    BeginPlay,
    Gravity,
    SpawnNext,
}

/// The game state machine.
///
/// The engine never reads the wall clock. Time moves only through
/// [`GameEngine::advance`], which fires the gravity tick, the delayed start
/// and the post-lock spawn in deadline order. Player input goes through
/// [`GameEngine::apply`] or the individual command methods.
///
/// Every mutation publishes a fresh [`GameSnapshot`] and bumps
/// [`GameEngine::revision`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use roundris_engine::engine::{
///     EngineConfig, EnginePhase, GameCommand, GameEngine, MemoryScoreStore, PieceSeed,
/// };
///
/// let config = EngineConfig::default().with_seed(PieceSeed::from(7));
/// let mut engine = GameEngine::new(config, MemoryScoreStore::new());
/// assert_eq!(engine.phase(), EnginePhase::Spawning);
///
/// // The first piece appears after the start delay.
/// engine.advance(Duration::from_millis(100));
/// assert_eq!(engine.phase(), EnginePhase::Falling);
///
/// let y = engine.active_piece().unwrap().y();
/// engine.advance(Duration::from_millis(500));
/// assert_eq!(engine.active_piece().unwrap().y(), y + 1);
///
/// engine.apply(GameCommand::MoveLeft);
/// let snapshot = engine.snapshot();
/// assert_eq!(snapshot.score(), 0);
/// ```
#[derive(Debug)]
pub struct GameEngine<S = MemoryScoreStore> {
    config: EngineConfig,
    store: S,
    board: Board,
    active: Option<Tetromino>,
    next: Option<Tetromino>,
    factory: PieceFactory,
    stats: GameStats,
    high_score: u32,
    phase: EnginePhase,
    paused: bool,
    scheduler: Scheduler<EngineTask>,
    gravity: Option<TaskHandle>,
    pending_spawn: Option<TaskHandle>,
    snapshot: Arc<GameSnapshot>,
    revision: u64,
}

impl<S> GameEngine<S>
where
    S: ScoreStore,
{
    /// Creates an engine and starts a new game.
    ///
    /// The high score is read from `store` once, here.
    pub fn new(config: EngineConfig, store: S) -> Self {
        let factory = config
            .seed
            .map_or_else(PieceFactory::new, PieceFactory::with_seed);
        let high_score = store.score().unwrap_or(0);
        let snapshot = Arc::new(GameSnapshot {
            board: Board::EMPTY,
            active_piece: None,
            next_piece: None,
            stats: GameStats::new(),
            high_score,
            phase: EnginePhase::Spawning,
            paused: false,
            speed: config.tick_interval,
        });
        let mut engine = Self {
            config,
            store,
            board: Board::EMPTY,
            active: None,
            next: None,
            factory,
            stats: GameStats::new(),
            high_score,
            phase: EnginePhase::Spawning,
            paused: false,
            scheduler: Scheduler::new(),
            gravity: None,
            pending_spawn: None,
            snapshot,
            revision: 0,
        };
        engine.start_new_game();
        engine
    }

    /// Configuration the engine was created with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The high score store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Locked cells. The active piece is not part of the board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The falling piece, if any.
    #[must_use]
    pub fn active_piece(&self) -> Option<&Tetromino> {
        self.active.as_ref()
    }

    /// The piece that spawns after the active one locks.
    #[must_use]
    pub fn next_piece(&self) -> Option<&Tetromino> {
        self.next.as_ref()
    }

    /// Statistics of the current game.
    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Score of the current game.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.stats.score()
    }

    /// Best score so far. Raised when a game ends with a new record.
    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    #[must_use]
    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    /// Returns `true` while the game is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<GameSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Number of snapshots published so far. Strictly increases with every mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Engine clock time until the next scheduled task, `None` if nothing is
    /// scheduled or the game is paused.
    #[must_use]
    pub fn time_until_next_task(&self) -> Option<Duration> {
        if self.paused {
            return None;
        }
        self.scheduler.time_until_next()
    }

    /// Where the active piece would land if dropped straight down.
    #[must_use]
    pub fn ghost_piece(&self) -> Option<Tetromino> {
        self.active
            .map(|piece| landing_position(&self.board, &piece))
    }

    /// Resets the board and statistics and schedules the first piece.
    ///
    /// Every outstanding task is canceled first, so no timer from the previous
    /// game can fire afterwards.
    pub fn start_new_game(&mut self) {
        self.scheduler.cancel_all();
        self.gravity = None;
        self.pending_spawn = None;

        self.board = Board::EMPTY;
        self.stats = GameStats::new();
        self.active = None;
        self.next = None;
        self.paused = false;
        self.phase = EnginePhase::Spawning;

        if self.config.start_delay.is_zero() {
            self.begin_play();
        } else {
            self.scheduler
                .schedule_once(self.config.start_delay, EngineTask::BeginPlay);
        }
        self.publish();
    }

    pub fn restart_game(&mut self) {
        self.start_new_game();
    }

    /// Moves the active piece one row down, locking it if it cannot move.
    pub fn tick(&mut self) -> MoveOutcome {
        self.move_piece(0, 1)
    }

    /// Moves the active piece by (`dx`, `dy`).
    ///
    /// A blocked move with `dy > 0` locks the piece; any other blocked move
    /// leaves the state untouched.
    pub fn move_piece(&mut self, dx: i32, dy: i32) -> MoveOutcome {
        let Some(piece) = self.controllable_piece() else {
            return MoveOutcome::Ignored;
        };
        let outcome = if self.board.is_valid_position(&piece, dx, dy) {
            self.active = Some(piece.shifted(dx, dy));
            MoveOutcome::Moved
        } else if dy > 0 {
            self.lock_piece(piece);
            MoveOutcome::Locked
        } else {
            return MoveOutcome::Blocked;
        };
        self.publish();
        outcome
    }

    /// Rotates the active piece clockwise, trying each of
    /// [`WALL_KICK_OFFSETS`] in turn. Returns whether the piece rotated.
    pub fn rotate_piece(&mut self) -> bool {
        let Some(piece) = self.controllable_piece() else {
            return false;
        };
        let rotated = piece.rotated_clockwise();
        let Some(dx) = WALL_KICK_OFFSETS
            .into_iter()
            .find(|&dx| self.board.is_valid_position(&rotated, dx, 0))
        else {
            return false;
        };
        self.active = Some(rotated.shifted(dx, 0));
        self.publish();
        true
    }

    /// Pauses or resumes the game. Returns whether the pause flag changed.
    ///
    /// Pausing is only possible while a piece is falling, so the start and
    /// spawn delays always run to completion. While paused the engine clock
    /// stands still and movement is ignored.
    pub fn toggle_pause(&mut self) -> bool {
        if !self.paused && !self.phase.is_falling() {
            return false;
        }
        self.paused = !self.paused;
        self.publish();
        true
    }

    /// Applies a player command. Returns whether the state changed.
    pub fn apply(&mut self, command: GameCommand) -> bool {
        match command {
            GameCommand::MoveLeft => self.move_piece(-1, 0).is_change(),
            GameCommand::MoveRight => self.move_piece(1, 0).is_change(),
            GameCommand::SoftDrop => self.move_piece(0, 1).is_change(),
            GameCommand::Rotate => self.rotate_piece(),
            GameCommand::Restart => {
                self.restart_game();
                true
            }
            GameCommand::TogglePause => self.toggle_pause(),
        }
    }

    /// Moves the engine clock forward by `elapsed`, firing every task that
    /// becomes due. Does nothing while paused.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.paused {
            return;
        }
        let until = self.scheduler.now().saturating_add(elapsed);
        let mut changed = false;
        while let Some((_, task)) = self.scheduler.pop_due(until) {
            changed |= self.run_task(task);
        }
        self.scheduler.advance_to(until);
        if changed {
            self.publish();
        }
    }

    fn run_task(&mut self, task: EngineTask) -> bool {
        match task {
            EngineTask::BeginPlay => {
                self.begin_play();
                true
            }
            EngineTask::Gravity => self.tick().is_change(),
            EngineTask::SpawnNext => {
                self.pending_spawn = None;
                self.spawn_new_piece();
                true
            }
        }
    }

    fn controllable_piece(&self) -> Option<Tetromino> {
        if self.paused || !self.phase.is_falling() {
            return None;
        }
        self.active
    }

    fn begin_play(&mut self) {
        let current = self.factory.create();
        self.next = Some(self.factory.create());
        self.active = Some(current);
        self.phase = EnginePhase::Falling;
        self.gravity = Some(
            self.scheduler
                .schedule_repeating(self.config.tick_interval, EngineTask::Gravity),
        );
    }

    fn lock_piece(&mut self, piece: Tetromino) {
        // Nothing is written when any cell is still above the board.
        if piece.occupied_positions().any(|(_, y)| y < 0) {
            self.game_over();
            return;
        }

        self.board.fill_piece(&piece);
        let cleared_lines = self.board.clear_lines();
        self.stats.complete_piece_drop(cleared_lines);
        self.active = None;
        self.phase = EnginePhase::Spawning;

        if self.config.spawn_delay.is_zero() {
            self.spawn_new_piece();
        } else {
            self.pending_spawn = Some(
                self.scheduler
                    .schedule_once(self.config.spawn_delay, EngineTask::SpawnNext),
            );
        }
    }

    fn spawn_new_piece(&mut self) {
        if self.phase.is_game_over() {
            return;
        }
        let Some(piece) = self.next.take() else {
            return;
        };
        if !self.board.is_valid_position(&piece, 0, 0) {
            self.next = Some(piece);
            self.game_over();
            return;
        }
        self.active = Some(piece);
        self.next = Some(self.factory.create());
        self.phase = EnginePhase::Falling;
    }

    fn game_over(&mut self) {
        if let Some(handle) = self.gravity.take() {
            self.scheduler.cancel(handle);
        }
        if let Some(handle) = self.pending_spawn.take() {
            self.scheduler.cancel(handle);
        }
        self.phase = EnginePhase::GameOver;
        self.paused = false;

        let score = self.stats.score();
        if score > self.high_score {
            self.high_score = score;
            self.store.save_score(score);
        }
    }

    fn publish(&mut self) {
        self.revision += 1;
        self.snapshot = Arc::new(GameSnapshot {
            board: self.board.clone(),
            active_piece: self.active,
            next_piece: self.next,
            stats: self.stats.clone(),
            high_score: self.high_score,
            phase: self.phase,
            paused: self.paused,
            speed: self.config.tick_interval,
        });
    }
}

#[cfg(test)]
impl<S> GameEngine<S>
where
    S: ScoreStore,
{
    fn set_board(&mut self, board: Board) {
        self.board = board;
        self.publish();
    }

    fn set_active_piece(&mut self, piece: Tetromino) {
        self.active = Some(piece);
        self.phase = EnginePhase::Falling;
        self.publish();
    }

    fn set_next_piece(&mut self, piece: Tetromino) {
        self.next = Some(piece);
        self.publish();
    }

    fn add_score(&mut self, lines: usize) {
        self.stats.complete_piece_drop(lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{BOARD_HEIGHT, BOARD_WIDTH, Cell, PieceId, PieceKind},
        engine::PieceSeed,
    };

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn piece(kind: PieceKind) -> Tetromino {
        Tetromino::new(PieceId(100), kind)
    }

    /// Engine with no start or spawn delay and a fixed seed.
    fn immediate_engine() -> GameEngine {
        let config = EngineConfig::immediate(ms(500)).with_seed(PieceSeed::from(1));
        GameEngine::new(config, MemoryScoreStore::new())
    }

    fn default_engine() -> GameEngine {
        let config = EngineConfig::default().with_seed(PieceSeed::from(1));
        GameEngine::new(config, MemoryScoreStore::new())
    }

    fn filled_row(board: &mut Board, y: usize, skip: &[usize]) {
        for x in (0..BOARD_WIDTH).filter(|x| !skip.contains(x)) {
            board.set_cell(x, y, Cell::Piece(PieceKind::Z));
        }
    }

    #[test]
    fn test_start_waits_for_start_delay() {
        let mut engine = default_engine();
        assert_eq!(engine.phase(), EnginePhase::Spawning);
        assert!(engine.active_piece().is_none());
        assert!(engine.next_piece().is_none());

        engine.advance(ms(99));
        assert!(engine.active_piece().is_none());
        engine.advance(ms(1));
        assert_eq!(engine.phase(), EnginePhase::Falling);
        let active = engine.active_piece().unwrap();
        assert_eq!((active.x(), active.y()), (6, -2));
        assert!(engine.next_piece().is_some());
    }

    #[test]
    fn test_gravity_ticks_every_interval() {
        let mut engine = default_engine();
        engine.advance(ms(100));
        let y = engine.active_piece().unwrap().y();
        engine.advance(ms(499));
        assert_eq!(engine.active_piece().unwrap().y(), y);
        engine.advance(ms(1));
        assert_eq!(engine.active_piece().unwrap().y(), y + 1);
        engine.advance(ms(1000));
        assert_eq!(engine.active_piece().unwrap().y(), y + 3);
    }

    #[test]
    fn test_i_piece_falls_to_floor_and_locks() {
        let mut engine = immediate_engine();
        engine.set_active_piece(piece(PieceKind::I));

        for expected_y in -1..=14 {
            assert_eq!(engine.tick(), MoveOutcome::Moved);
            assert_eq!(engine.active_piece().unwrap().y(), expected_y);
        }
        assert_eq!(engine.tick(), MoveOutcome::Locked);

        for x in 0..BOARD_WIDTH {
            let expected = if (6..=9).contains(&x) {
                Cell::Piece(PieceKind::I)
            } else {
                Cell::Empty
            };
            assert_eq!(engine.board().cell(x as i32, 14), Some(expected));
        }
        assert_eq!(engine.board().cell(6, 14).unwrap().code(), 1);
        assert_eq!(engine.stats().completed_pieces(), 1);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_o_piece_completes_row() {
        let mut engine = immediate_engine();
        let mut board = Board::EMPTY;
        filled_row(&mut board, 14, &[0, 1]);
        engine.set_board(board);
        engine.set_active_piece(piece(PieceKind::O).at(0, 12));

        assert_eq!(engine.tick(), MoveOutcome::Moved);
        assert_eq!(engine.tick(), MoveOutcome::Locked);

        assert_eq!(engine.score(), 100);
        assert_eq!(engine.stats().total_cleared_lines(), 1);
        assert_eq!(engine.board().rows().count(), BOARD_HEIGHT);
        // The O's upper half drops into the cleared row.
        assert_eq!(engine.board().cell(0, 14), Some(Cell::Piece(PieceKind::O)));
        assert_eq!(engine.board().cell(1, 14), Some(Cell::Piece(PieceKind::O)));
        assert_eq!(engine.board().occupied_cells().count(), 2);
    }

    #[test]
    fn test_o_piece_rests_on_partial_row() {
        let mut engine = immediate_engine();
        let mut board = Board::EMPTY;
        filled_row(&mut board, 14, &[0]);
        engine.set_board(board);
        // Column 1 is filled at row 14, so the O rests with its bottom at row 13.
        engine.set_active_piece(piece(PieceKind::O).at(0, 11));
        assert_eq!(engine.tick(), MoveOutcome::Moved);
        assert_eq!(engine.tick(), MoveOutcome::Locked);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.board().cell(0, 14), Some(Cell::Empty));
        assert_eq!(engine.board().cell(0, 13), Some(Cell::Piece(PieceKind::O)));
    }

    #[test]
    fn test_sideways_blocked_move_is_noop() {
        let mut engine = immediate_engine();
        engine.set_active_piece(piece(PieceKind::O).at(0, 5));
        let revision = engine.revision();
        assert_eq!(engine.move_piece(-1, 0), MoveOutcome::Blocked);
        assert_eq!(engine.revision(), revision);
        assert_eq!(engine.active_piece().unwrap().x(), 0);

        assert_eq!(engine.move_piece(1, 0), MoveOutcome::Moved);
        assert_eq!(engine.active_piece().unwrap().x(), 1);
        assert!(engine.revision() > revision);
    }

    #[test]
    fn test_spawn_collision_is_game_over() {
        let mut engine = immediate_engine();
        let mut board = Board::EMPTY;
        board.set_cell(6, 0, Cell::Piece(PieceKind::T));
        board.set_cell(7, 0, Cell::Piece(PieceKind::T));
        engine.set_board(board.clone());
        engine.set_next_piece(piece(PieceKind::O).at(6, -1));
        engine.set_active_piece(piece(PieceKind::I).at(0, 14));

        assert_eq!(engine.tick(), MoveOutcome::Locked);
        let mut expected = board;
        for x in 0..4 {
            expected.set_cell(x, 14, Cell::Piece(PieceKind::I));
        }
        assert!(engine.is_game_over());
        assert_eq!(engine.board(), &expected);
        assert_eq!(engine.next_piece().unwrap().kind(), PieceKind::O);
        assert!(engine.active_piece().is_none());
        assert_eq!(engine.time_until_next_task(), None);
    }

    #[test]
    fn test_lock_above_board_is_game_over_without_writing() {
        let mut engine = immediate_engine();
        let mut board = Board::EMPTY;
        board.set_cell(6, 0, Cell::Piece(PieceKind::L));
        engine.set_board(board.clone());
        // Bottom row of the T is at row -1, resting on the block at row 0.
        engine.set_active_piece(piece(PieceKind::T).at(5, -2));

        assert_eq!(engine.tick(), MoveOutcome::Locked);
        assert!(engine.is_game_over());
        assert_eq!(engine.board(), &board);
        assert_eq!(engine.phase(), EnginePhase::GameOver);
    }

    #[test]
    fn test_commands_ignored_after_game_over() {
        let mut engine = immediate_engine();
        let mut board = Board::EMPTY;
        board.set_cell(6, 0, Cell::Piece(PieceKind::L));
        engine.set_board(board);
        engine.set_active_piece(piece(PieceKind::T).at(5, -2));
        engine.tick();
        assert!(engine.is_game_over());

        let revision = engine.revision();
        assert_eq!(engine.move_piece(1, 0), MoveOutcome::Ignored);
        assert!(!engine.rotate_piece());
        assert!(!engine.toggle_pause());
        engine.advance(ms(10_000));
        assert_eq!(engine.revision(), revision);

        assert!(engine.apply(GameCommand::Restart));
        assert!(!engine.is_game_over());
        assert_eq!(engine.board(), &Board::EMPTY);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_spawn_waits_for_spawn_delay() {
        let mut engine = default_engine();
        engine.advance(ms(100));
        engine.set_active_piece(piece(PieceKind::O).at(0, 13));
        let next = *engine.next_piece().unwrap();

        assert_eq!(engine.tick(), MoveOutcome::Locked);
        assert_eq!(engine.phase(), EnginePhase::Spawning);
        assert!(engine.active_piece().is_none());
        assert_eq!(engine.move_piece(1, 0), MoveOutcome::Ignored);

        engine.advance(ms(499));
        assert!(engine.active_piece().is_none());
        engine.advance(ms(1));
        assert_eq!(engine.active_piece().unwrap().id(), next.id());
        assert_ne!(engine.next_piece().unwrap().id(), next.id());
    }

    #[test]
    fn test_restart_cancels_pending_spawn() {
        let mut engine = default_engine();
        engine.advance(ms(100));
        engine.set_active_piece(piece(PieceKind::O).at(0, 13));
        assert_eq!(engine.tick(), MoveOutcome::Locked);

        engine.advance(ms(300));
        engine.restart_game();
        assert_eq!(engine.board(), &Board::EMPTY);

        // Only the start delay of the new game remains.
        assert_eq!(engine.time_until_next_task(), Some(ms(100)));
        engine.advance(ms(100));
        let active = *engine.active_piece().unwrap();
        engine.advance(ms(200));
        assert_eq!(engine.active_piece().unwrap().id(), active.id());
        assert_eq!(engine.active_piece().unwrap().y(), active.y());
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut engine = immediate_engine();
        engine.add_score(2);
        engine.toggle_pause();
        let mut board = Board::EMPTY;
        board.set_cell(3, 14, Cell::Piece(PieceKind::S));
        engine.set_board(board);

        engine.restart_game();
        assert_eq!(engine.board(), &Board::EMPTY);
        assert_eq!(engine.stats(), &GameStats::new());
        assert!(!engine.is_paused());
        assert_eq!(engine.phase(), EnginePhase::Falling);
    }

    #[test]
    fn test_rotation_kicks_off_right_wall() {
        let mut engine = immediate_engine();
        // Vertical I against the right wall; rotating makes it 4 wide.
        let vertical = piece(PieceKind::I).rotated_clockwise().at(13, 5);
        engine.set_active_piece(vertical);

        assert!(engine.rotate_piece());
        let rotated = engine.active_piece().unwrap();
        assert_eq!(rotated.shape().cols(), 4);
        assert_eq!(rotated.x(), 11);
        assert_eq!(rotated.rotation(), 2);
    }

    #[test]
    fn test_rotation_prefers_first_valid_offset() {
        let mut engine = immediate_engine();
        let mut board = Board::EMPTY;
        // Block the unkicked and the -1 targets, leaving +1 free.
        board.set_cell(5, 7, Cell::Piece(PieceKind::J));
        board.set_cell(4, 6, Cell::Piece(PieceKind::J));
        engine.set_board(board);
        engine.set_active_piece(piece(PieceKind::T).at(5, 5));

        assert!(engine.rotate_piece());
        assert_eq!(engine.active_piece().unwrap().x(), 6);
    }

    #[test]
    fn test_rotation_fails_when_boxed_in() {
        let mut engine = immediate_engine();
        let mut board = Board::EMPTY;
        for y in 0..BOARD_HEIGHT {
            for x in (0..BOARD_WIDTH).filter(|x| !(5..=8).contains(x)) {
                board.set_cell(x, y, Cell::Piece(PieceKind::Z));
            }
        }
        for x in 5..=8 {
            board.set_cell(x, 6, Cell::Piece(PieceKind::Z));
        }
        engine.set_board(board);
        let before = piece(PieceKind::I).at(5, 5);
        engine.set_active_piece(before);

        assert!(!engine.rotate_piece());
        assert_eq!(engine.active_piece(), Some(&before));
    }

    #[test]
    fn test_four_rotations_restore_shape() {
        let mut engine = immediate_engine();
        let start = piece(PieceKind::L).at(5, 5);
        engine.set_active_piece(start);
        for _ in 0..4 {
            assert!(engine.rotate_piece());
        }
        let active = engine.active_piece().unwrap();
        assert_eq!(active.shape(), start.shape());
        assert_eq!(active.rotation(), 0);
    }

    #[test]
    fn test_pause_freezes_clock() {
        let mut engine = default_engine();
        engine.advance(ms(100));
        let y = engine.active_piece().unwrap().y();

        engine.advance(ms(300));
        assert!(engine.toggle_pause());
        assert!(engine.is_paused());
        assert_eq!(engine.time_until_next_task(), None);
        engine.advance(ms(5000));
        assert_eq!(engine.active_piece().unwrap().y(), y);
        assert_eq!(engine.move_piece(1, 0), MoveOutcome::Ignored);
        assert!(!engine.rotate_piece());

        assert!(engine.apply(GameCommand::TogglePause));
        assert_eq!(engine.time_until_next_task(), Some(ms(200)));
        engine.advance(ms(200));
        assert_eq!(engine.active_piece().unwrap().y(), y + 1);
    }

    #[test]
    fn test_pause_refused_while_spawning() {
        let mut engine = default_engine();
        assert_eq!(engine.phase(), EnginePhase::Spawning);
        assert!(!engine.toggle_pause());
        assert!(!engine.apply(GameCommand::TogglePause));

        engine.advance(ms(100));
        engine.set_active_piece(piece(PieceKind::O).at(0, 13));
        assert_eq!(engine.tick(), MoveOutcome::Locked);
        assert!(!engine.toggle_pause());
        assert!(!engine.is_paused());

        engine.advance(ms(1000));
        assert_eq!(engine.phase(), EnginePhase::Falling);
        assert!(engine.active_piece().is_some());
        assert!(engine.toggle_pause());
    }

    #[test]
    fn test_huge_advance_saturates() {
        let mut engine = default_engine();
        engine.advance(Duration::MAX);
        // Pieces pile up in the spawn column until the game ends.
        assert!(engine.is_game_over());
        assert_eq!(engine.time_until_next_task(), None);

        engine.advance(Duration::MAX);
        engine.restart_game();
        engine.advance(ms(1));
        assert_eq!(engine.phase(), EnginePhase::Falling);
    }

    #[test]
    fn test_high_score_saved_once_on_game_over() {
        let config = EngineConfig::immediate(ms(500)).with_seed(PieceSeed::from(1));
        let mut store = MemoryScoreStore::with_score(150);
        let mut engine = GameEngine::new(config, &mut store);
        assert_eq!(engine.high_score(), 150);

        engine.add_score(2);
        let mut board = Board::EMPTY;
        board.set_cell(6, 0, Cell::Piece(PieceKind::L));
        engine.set_board(board);
        engine.set_active_piece(piece(PieceKind::T).at(5, -2));
        engine.tick();

        assert!(engine.is_game_over());
        assert_eq!(engine.high_score(), 200);
        assert_eq!(engine.snapshot().high_score(), 200);
        engine.advance(ms(10_000));
        drop(engine);
        assert_eq!(store.score(), Some(200));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_lower_score_is_not_saved() {
        let config = EngineConfig::immediate(ms(500)).with_seed(PieceSeed::from(1));
        let mut engine = GameEngine::new(config, MemoryScoreStore::with_score(500));
        engine.add_score(1);
        let mut board = Board::EMPTY;
        board.set_cell(6, 0, Cell::Piece(PieceKind::L));
        engine.set_board(board);
        engine.set_active_piece(piece(PieceKind::T).at(5, -2));
        engine.tick();

        assert!(engine.is_game_over());
        assert_eq!(engine.high_score(), 500);
        assert_eq!(engine.store().save_count(), 0);
    }

    #[test]
    fn test_snapshot_tracks_state() {
        let mut engine = immediate_engine();
        let first = engine.snapshot();
        let revision = engine.revision();
        engine.set_active_piece(piece(PieceKind::S).at(3, 3));
        engine.apply(GameCommand::MoveRight);

        let snapshot = engine.snapshot();
        assert!(engine.revision() > revision);
        assert_ne!(first, snapshot);
        assert_eq!(snapshot.active_piece().unwrap().x(), 4);
        assert_eq!(snapshot.speed(), ms(500));
        assert_eq!(snapshot.phase(), EnginePhase::Falling);
        assert_eq!(snapshot.ghost_piece(), engine.ghost_piece());
        assert_eq!(snapshot.adjacency().piece_cells().len(), 4);
    }

    #[test]
    fn test_ghost_piece_does_not_mutate() {
        let mut engine = immediate_engine();
        let active = piece(PieceKind::O).at(4, 0);
        engine.set_active_piece(active);
        let ghost = engine.ghost_piece().unwrap();
        assert_eq!((ghost.x(), ghost.y()), (4, 13));
        assert_eq!(engine.active_piece(), Some(&active));
        assert_eq!(engine.board(), &Board::EMPTY);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = immediate_engine();
        let mut b = immediate_engine();
        for _ in 0..200 {
            a.advance(ms(500));
            b.advance(ms(500));
            a.apply(GameCommand::MoveLeft);
            b.apply(GameCommand::MoveLeft);
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
