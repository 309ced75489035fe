use crate::Coords;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Raw mode, alternate screen or event reading failed
    #[error("terminal error: {0}")]
    Terminal(#[from] crossterm::ErrorKind),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("terminal too small: need {needed:?} columns x rows, have {actual:?}")]
    TerminalTooSmall { needed: Coords, actual: Coords },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("duplicate comment id: {0}")]
    DuplicateCommentId(String),
}
