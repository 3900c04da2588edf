use thiserror::Error;

use crate::game::GameError;

/// Errors that can occur while building or searching a tree.
///
/// None of them are transient: each one points at an integration or
/// programming mistake and is returned to the caller as soon as it happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// The game could not process a state, e.g. enumerate its moves.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A move was applied to a state where it is not legal.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// An internal invariant of the tree was violated.
    #[error("logic error: {0}")]
    Logic(String),

    /// Search was requested for a state that is already decided.
    #[error("no legal moves available")]
    NoLegalMoves,

    /// The configuration or budget cannot be used.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<GameError> for SearchError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::InvalidState(msg) => SearchError::InvalidState(msg),
            GameError::IllegalMove(msg) => SearchError::IllegalMove(msg),
        }
    }
}
