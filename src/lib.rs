//! A generic Monte Carlo tree search engine built on UCT.
//!
//! The engine works with any turn-based game that implements the [`Game`]
//! trait: it grows a search tree with random playouts, balances exploration
//! and exploitation with UCB1 and recommends a move once its budget of
//! iterations or time is spent.
//!
//! # Example
//!
//! ```rust
//! use mcts_uct::config::Budget;
//! use mcts_uct::games::tic_tac_toe::TicTacToe;
//! use mcts_uct::mcts::MonteCarloTreeSearch;
//!
//! // X X .
//! // O O .
//! // . . .
//! let board = TicTacToe::from_moves(&[0, 3, 1, 4]).unwrap();
//!
//! // Create and configure a new MCTS search instance using the builder
//! let mut mcts = MonteCarloTreeSearch::builder()
//!     .with_seed(42)
//!     .build()
//!     .unwrap();
//!
//! // X completes the top row
//! let best_move = mcts.choose_move(&board, Budget::iterations(1000)).unwrap();
//! assert_eq!(best_move, 2);
//! ```

/// Plays complete games between two engines.
pub mod arena;
/// Strategies that write playout results back into the tree.
pub mod backup;
/// Search configuration and budgets.
pub mod config;
/// The error type returned by every fallible search operation.
pub mod error;
/// The `Game` trait, the contract between the engine and a game.
pub mod game;
/// Contains ready-made implementations of the `Game` trait.
pub mod games;
/// The core module of the library, containing the `MonteCarloTreeSearch` implementation.
pub mod mcts;
/// Contains the `MctsNode` struct, which represents a node in the search tree.
pub mod mcts_node;
/// Contains traits and implementations for random number generation.
pub mod random;
/// Playout policies.
pub mod rollout;
/// UCT scoring and tree descent.
pub mod selection;
/// The search tree and its maintenance operations.
pub mod tree;

pub use config::{Budget, FinalMoveSelection, MctsConfig};
pub use error::SearchError;
pub use game::{Game, GameError, Outcome};
pub use mcts::{MonteCarloTreeSearch, SearchReport};
pub use tree::SearchTree;
