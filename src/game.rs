use std::fmt::Debug;

use thiserror::Error;

/// Reward reported for a won game.
pub const REWARD_WIN: f64 = 1.0;
/// Reward reported for a drawn game.
pub const REWARD_DRAW: f64 = 0.5;
/// Reward reported for a lost game.
pub const REWARD_LOSS: f64 = 0.0;

/// The central trait of the library, defining the interface for a game state.
///
/// To search a custom game, this trait must be implemented by its state type.
/// It provides the engine with everything it needs to know about the rules,
/// so the search itself stays free of game-specific logic.
///
/// Implementations must be deterministic: applying the same move to the same
/// state always yields the same successor state.
pub trait Game: Clone {
    /// The type representing a move in the game. This could be a simple `u8` for a board position
    /// or a more complex struct for games with intricate actions.
    type Move: Clone + PartialEq + Debug;

    /// Identifies a participant of the game.
    type Player: Copy + PartialEq + Debug;

    /// Returns the player whose turn it is to make a move.
    fn player_to_move(&self) -> Self::Player;

    /// Returns every legal move available from this state.
    ///
    /// Terminal states may return an empty list. A non-terminal state must
    /// have at least one legal move.
    fn legal_moves(&self) -> Result<Vec<Self::Move>, GameError>;

    /// Returns the successor state reached by playing `mv`.
    ///
    /// Fails with [`GameError::IllegalMove`] if `mv` is not legal here.
    fn apply(&self, mv: &Self::Move) -> Result<Self, GameError>;

    /// Returns `true` once the game is decided.
    fn is_terminal(&self) -> bool;

    /// Returns the result of a terminal state from the viewpoint of `player`,
    /// in the range `[0, 1]`: [`REWARD_WIN`], [`REWARD_DRAW`], [`REWARD_LOSS`]
    /// or anything in between.
    fn reward(&self, player: Self::Player) -> f64;
}

/// Errors reported by [`Game`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("illegal move: {0}")]
    IllegalMove(String),
}

/// Represents the possible outcomes of a finished game for one player.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Outcome {
    /// The player has won.
    Win,
    /// The game has ended in a draw.
    Draw,
    /// The player has lost.
    Loss,
}

impl Outcome {
    /// Classifies a reward: above one half is a win, below is a loss.
    pub fn from_reward(reward: f64) -> Self {
        if reward > REWARD_DRAW {
            Outcome::Win
        } else if reward < REWARD_DRAW {
            Outcome::Loss
        } else {
            Outcome::Draw
        }
    }
}
