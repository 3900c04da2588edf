use crate::game::{Game, Outcome};
use crate::error::SearchError;

/// Visit and outcome statistics accumulated by backpropagation.
///
/// Everything is attributed to the node's mover, the player who chose the
/// move leading into the node.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct NodeStats {
    /// Number of simulations whose result passed through this node.
    pub visits: u32,
    /// Sum of rewards backpropagated through this node.
    pub total_reward: f64,
    /// Simulations won by the mover. Only counted by the outcome backup.
    pub wins: u32,
    /// Drawn simulations. Only counted by the outcome backup.
    pub draws: u32,
    /// Simulations lost by the mover. Only counted by the outcome backup.
    pub losses: u32,
    /// Game-theoretic value for the mover: the reward of the terminal state
    /// reached when every player below picks its best child. Only kept by the
    /// outcome backup.
    pub expected_value: Option<f64>,
}

impl NodeStats {
    /// Records one simulation passing through the node.
    pub fn record(&mut self, reward: f64, outcome: Option<Outcome>) {
        self.visits += 1;
        self.total_reward += reward;
        match outcome {
            Some(Outcome::Win) => self.wins += 1,
            Some(Outcome::Draw) => self.draws += 1,
            Some(Outcome::Loss) => self.losses += 1,
            None => {}
        }
    }

    /// Mean reward, or `0.0` if the node was never visited.
    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward / self.visits as f64
        }
    }

    /// The value selection and final move choice work with: the expected
    /// value when the backup keeps one, the mean reward otherwise.
    #[inline]
    pub fn value(&self) -> f64 {
        self.expected_value.unwrap_or_else(|| self.mean_value())
    }

    /// Calculates the win rate of this node.
    pub fn wins_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins as f64 / self.visits as f64
        }
    }

    /// Calculates the draw rate of this node.
    pub fn draws_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.draws as f64 / self.visits as f64
        }
    }
}

/// Represents a single node in the Monte Carlo search tree.
///
/// Each node stores the state of the game, the move that led to it, the moves
/// that still have to be expanded and the statistics gathered so far. Parent
/// and child links live in the owning [`SearchTree`](crate::tree::SearchTree).
#[derive(Debug, Clone)]
pub struct MctsNode<G: Game> {
    state: G,
    prev_move: Option<G::Move>,
    mover: Option<G::Player>,
    player_to_move: G::Player,
    is_terminal: bool,
    pub(crate) untried_moves: Vec<G::Move>,
    pub(crate) depth: u32,
    pub(crate) stats: NodeStats,
    /// Terminal state behind [`NodeStats::expected_value`].
    pub(crate) expected_outcome: Option<G>,
    pub(crate) checked_for_terminal_moves: bool,
}

impl<G: Game> MctsNode<G> {
    /// Creates a root node for `state`.
    pub fn root(state: G) -> Result<Self, SearchError> {
        Self::build(state, None, None, 0)
    }

    /// Creates the node reached by `mv`, chosen by `mover`.
    pub fn child(state: G, mv: G::Move, mover: G::Player, depth: u32) -> Result<Self, SearchError> {
        Self::build(state, Some(mv), Some(mover), depth)
    }

    fn build(
        state: G,
        prev_move: Option<G::Move>,
        mover: Option<G::Player>,
        depth: u32,
    ) -> Result<Self, SearchError> {
        let is_terminal = state.is_terminal();
        let untried_moves = if is_terminal {
            Vec::new()
        } else {
            let moves = state.legal_moves()?;
            if moves.is_empty() {
                return Err(SearchError::InvalidState(
                    "non-terminal state has no legal moves".into(),
                ));
            }
            moves
        };

        Ok(Self {
            player_to_move: state.player_to_move(),
            state,
            prev_move,
            mover,
            is_terminal,
            untried_moves,
            depth,
            stats: NodeStats::default(),
            expected_outcome: None,
            checked_for_terminal_moves: false,
        })
    }

    /// The game state this node represents.
    pub fn state(&self) -> &G {
        &self.state
    }

    /// The move that led to this node. `None` for a root that was never a child.
    pub fn prev_move(&self) -> Option<&G::Move> {
        self.prev_move.as_ref()
    }

    /// The player who chose [`prev_move`](Self::prev_move).
    pub fn mover(&self) -> Option<G::Player> {
        self.mover
    }

    pub fn player_to_move(&self) -> G::Player {
        self.player_to_move
    }

    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    /// Legal moves that have not been expanded yet.
    pub fn untried_moves(&self) -> &[G::Move] {
        &self.untried_moves
    }

    /// A node is fully expanded once every legal move has a child.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_moves.is_empty()
    }

    /// Distance in plies from the current root.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn stats(&self) -> &NodeStats {
        &self.stats
    }

    #[inline]
    pub fn visits(&self) -> u32 {
        self.stats.visits
    }

    #[inline]
    pub fn mean_value(&self) -> f64 {
        self.stats.mean_value()
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.stats.value()
    }

    /// The terminal state the expected value was taken from, if one is kept.
    pub fn expected_outcome(&self) -> Option<&G> {
        self.expected_outcome.as_ref()
    }
}
