/// Failures surfaced by the timeline core.
///
/// Every variant is recoverable by the caller: the core never retries and
/// never produces partial layouts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The transcript could not be replayed as a legal move sequence.
    #[error("Invalid PGN format: {0}")]
    InvalidNotation(String),

    /// The transcript parsed but contained no moves.
    #[error("PGN contains no moves")]
    EmptyGame,

    #[error("Invalid square '{0}': expected a file a-h followed by a rank 1-8")]
    InvalidSquare(String),

    /// A meme clip or transition sound referenced by id no longer exists.
    #[error("Missing {kind} {id}")]
    MissingAsset { kind: AssetKind, id: i64 },

    #[error("Move {index} has a non-positive duration")]
    InvalidDuration { index: usize },

    #[error("Frame rate must be positive")]
    InvalidFrameRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    MemeClip,
    TransitionSound,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::MemeClip => f.write_str("meme clip"),
            AssetKind::TransitionSound => f.write_str("transition sound"),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
