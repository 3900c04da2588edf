//! Contains ready-made implementations of the `Game` trait.

/// Single-pile Nim, a small game with a known winning strategy.
pub mod nim;
/// A `Game` implementation for the game of Tic-Tac-Toe.
pub mod tic_tac_toe;
