use serde::{Deserialize, Serialize};

/// Points awarded per cleared line.
pub const POINTS_PER_LINE: u32 = 100;

/// Score, lock count and line-clear statistics of one game.
///
/// Every cleared line is worth [`POINTS_PER_LINE`]; there are no multi-line
/// bonuses.
///
/// # Example
///
/// ```
/// use roundris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(2);
/// stats.complete_piece_drop(0);
///
/// assert_eq!(stats.score(), 200);
/// assert_eq!(stats.completed_pieces(), 2);
/// assert_eq!(stats.line_cleared_counter(), &[1, 0, 1, 0, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: u32,
    completed_pieces: u32,
    total_cleared_lines: u32,
    line_cleared_counter: [u32; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Number of pieces locked into the board.
    #[must_use]
    pub const fn completed_pieces(&self) -> u32 {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> u32 {
        self.total_cleared_lines
    }

    /// Locks by number of lines they cleared: index 0 counts locks that
    /// cleared nothing, index 4 counts four-line clears.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[u32; 5] {
        &self.line_cleared_counter
    }

    /// Records a locked piece that cleared `cleared_lines` rows.
    #[expect(clippy::cast_possible_truncation)]
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) {
        let lines = cleared_lines as u32;
        self.completed_pieces += 1;
        self.total_cleared_lines += lines;
        if let Some(count) = self.line_cleared_counter.get_mut(cleared_lines) {
            *count += 1;
        }
        self.score = self.score.saturating_add(lines * POINTS_PER_LINE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let stats = GameStats::new();
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.completed_pieces(), 0);
        assert_eq!(stats.total_cleared_lines(), 0);
        assert_eq!(stats.line_cleared_counter(), &[0; 5]);
    }

    #[test]
    fn test_score_is_linear_in_lines() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(1);
        assert_eq!(stats.score(), 100);
        stats.complete_piece_drop(4);
        assert_eq!(stats.score(), 500);
        assert_eq!(stats.total_cleared_lines(), 5);
        assert_eq!(stats.line_cleared_counter(), &[0, 1, 0, 0, 1]);
    }
}
