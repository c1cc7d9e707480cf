/// Discrete player input understood by [`GameEngine::apply`](super::GameEngine::apply).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum GameCommand {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    Restart,
    TogglePause,
}

/// Result of [`GameEngine::move_piece`](super::GameEngine::move_piece).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum MoveOutcome {
    /// The piece moved by the requested offset.
    Moved,
    /// A downward move was blocked and the piece locked (possibly ending the game).
    Locked,
    /// A sideways or upward move was blocked; nothing changed.
    Blocked,
    /// No active piece, paused, or game over.
    Ignored,
}

impl MoveOutcome {
    /// Whether the engine state changed.
    #[must_use]
    pub fn is_change(self) -> bool {
        matches!(self, Self::Moved | Self::Locked)
    }
}
