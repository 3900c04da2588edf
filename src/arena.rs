//! Plays complete games between two engines.

use tracing::{debug, info};

use crate::config::Budget;
use crate::error::SearchError;
use crate::game::{Game, Outcome};
use crate::mcts::MonteCarloTreeSearch;
use crate::random::{RandomGenerator, StandardRandomGenerator};
use crate::rollout::{RolloutPolicy, UniformRollout};
use crate::tree::SearchTree;

/// One side of a match: an engine, its per-move budget and, when tree reuse
/// is on, the tree carried over from earlier moves.
#[derive(Debug)]
pub struct Contestant<G: Game, R = UniformRollout, K = StandardRandomGenerator> {
    engine: MonteCarloTreeSearch<R, K>,
    budget: Budget,
    reuse_tree: bool,
    tree: Option<SearchTree<G>>,
}

impl<G, R, K> Contestant<G, R, K>
where
    G: Game,
    R: RolloutPolicy<G>,
    K: RandomGenerator,
{
    pub fn new(engine: MonteCarloTreeSearch<R, K>, budget: Budget) -> Self {
        Self {
            engine,
            budget,
            reuse_tree: false,
            tree: None,
        }
    }

    /// Keeps the searched subtree of every played move for the next search.
    pub fn with_tree_reuse(mut self, reuse_tree: bool) -> Self {
        self.reuse_tree = reuse_tree;
        self
    }

    pub fn engine(&self) -> &MonteCarloTreeSearch<R, K> {
        &self.engine
    }

    /// The tree kept from the last search, if reuse is on.
    pub fn tree(&self) -> Option<&SearchTree<G>> {
        self.tree.as_ref()
    }

    /// Picks a move for `state`.
    ///
    /// With tree reuse the kept tree is searched further if its root looks
    /// like `state`: same player to move, same legal moves. That holds as long
    /// as every played move is passed to [`Contestant::observe`]. Otherwise
    /// the search starts over from `state`.
    pub fn choose(&mut self, state: &G) -> Result<G::Move, SearchError> {
        if !self.reuse_tree {
            return self.engine.choose_move(state, self.budget);
        }

        let moves = state.legal_moves()?;
        let kept = match self.tree.take() {
            Some(tree) if is_rooted_at(&tree, state, &moves)? => Some(tree),
            Some(_) => {
                debug!("kept tree does not match the position, starting over");
                None
            }
            None => None,
        };
        let mut tree = match kept {
            Some(tree) => tree,
            None => SearchTree::new(state.clone())?,
        };
        let mv = match moves.as_slice() {
            [] => return Err(SearchError::NoLegalMoves),
            [only] => only.clone(),
            _ => self.engine.search(&mut tree, self.budget)?.best_move,
        };
        self.tree = Some(tree);
        Ok(mv)
    }

    /// Advances the kept tree past `mv`, or drops it if `mv` was never expanded.
    pub fn observe(&mut self, mv: &G::Move) -> Result<(), SearchError> {
        let Some(mut tree) = self.tree.take() else {
            return Ok(());
        };

        match tree.child_for_move(tree.root_id(), mv)? {
            Some(child) => {
                tree.reroot(child)?;
                self.tree = Some(tree);
            }
            None => debug!(mv = ?mv, "move was not expanded, dropping tree"),
        }
        Ok(())
    }

    /// Forgets any kept tree.
    pub fn reset(&mut self) {
        self.tree = None;
    }
}

fn is_rooted_at<G: Game>(
    tree: &SearchTree<G>,
    state: &G,
    moves: &[G::Move],
) -> Result<bool, SearchError> {
    let root = tree.root().value();
    if root.player_to_move() != state.player_to_move() {
        return Ok(false);
    }
    Ok(root.state().legal_moves()? == moves)
}

/// A finished game.
#[derive(Debug, Clone)]
pub struct MatchRecord<G: Game> {
    /// Every move in the order it was played.
    pub moves: Vec<G::Move>,
    pub final_state: G,
    /// The player the first contestant played.
    pub first_player: G::Player,
    /// Result for `first_player`.
    pub outcome: Outcome,
}

/// Plays `initial` to the end.
///
/// `first` plays the player to move in `initial`, `second` every other
/// player. Both contestants see every move, so trees they keep stay in step
/// with the game.
pub fn play_game<G, R1, K1, R2, K2>(
    initial: G,
    first: &mut Contestant<G, R1, K1>,
    second: &mut Contestant<G, R2, K2>,
) -> Result<MatchRecord<G>, SearchError>
where
    G: Game,
    R1: RolloutPolicy<G>,
    K1: RandomGenerator,
    R2: RolloutPolicy<G>,
    K2: RandomGenerator,
{
    first.reset();
    second.reset();

    let first_player = initial.player_to_move();
    let mut state = initial;
    let mut moves = Vec::new();

    while !state.is_terminal() {
        let player = state.player_to_move();
        let mv = if player == first_player {
            first.choose(&state)?
        } else {
            second.choose(&state)?
        };
        info!(ply = moves.len() + 1, player = ?player, mv = ?mv, "move played");

        first.observe(&mv)?;
        second.observe(&mv)?;
        state = state.apply(&mv)?;
        moves.push(mv);
    }

    let outcome = Outcome::from_reward(state.reward(first_player));
    info!(plies = moves.len(), outcome = ?outcome, "game over");

    Ok(MatchRecord {
        moves,
        final_state: state,
        first_player,
        outcome,
    })
}
