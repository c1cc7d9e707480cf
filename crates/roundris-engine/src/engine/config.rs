use std::time::Duration;

use super::PieceSeed;

/// Timing and randomness settings of a [`GameEngine`](super::GameEngine).
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use roundris_engine::engine::{EngineConfig, PieceSeed};
///
/// let config = EngineConfig {
///     tick_interval: Duration::from_millis(250),
///     seed: Some(PieceSeed::from(1)),
///     ..EngineConfig::default()
/// };
/// assert_eq!(config.spawn_delay, Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Period of the gravity tick.
    pub tick_interval: Duration,
    /// Pause between a lock and the next spawn.
    pub spawn_delay: Duration,
    /// Pause between a (re)start and the first piece.
    pub start_delay: Duration,
    /// Fixed seed for the piece sequence, random when `None`.
    pub seed: Option<PieceSeed>,
}

impl EngineConfig {
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);
    pub const DEFAULT_SPAWN_DELAY: Duration = Duration::from_millis(500);
    pub const DEFAULT_START_DELAY: Duration = Duration::from_millis(100);

    /// Configuration without any delays, ticking every `tick_interval`.
    #[must_use]
    pub const fn immediate(tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            spawn_delay: Duration::ZERO,
            start_delay: Duration::ZERO,
            seed: None,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: PieceSeed) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Self::DEFAULT_TICK_INTERVAL,
            spawn_delay: Self::DEFAULT_SPAWN_DELAY,
            start_delay: Self::DEFAULT_START_DELAY,
            seed: None,
        }
    }
}
