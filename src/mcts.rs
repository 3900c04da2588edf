//! The search driver: runs selection, expansion, simulation and
//! backpropagation under a budget and recommends a move.

use std::time::{Duration, Instant};

use ego_tree::{NodeId, NodeRef};
use tracing::{debug, trace};

use crate::backup::BackupStrategy;
use crate::config::{Budget, FinalMoveSelection, MctsConfig};
use crate::error::SearchError;
use crate::game::Game;
use crate::mcts_node::MctsNode;
use crate::random::{RandomGenerator, SeededRandomGenerator, StandardRandomGenerator};
use crate::rollout::{RolloutPolicy, UniformRollout, playout};
use crate::selection::descend;
use crate::tree::SearchTree;

/// The main struct for running the Monte Carlo Tree Search algorithm.
///
/// It holds the configuration, the rollout policy and the random number
/// generator. Trees are passed in per call, so one engine can serve any
/// number of searches and any game its rollout policy supports.
#[derive(Debug, Clone)]
pub struct MonteCarloTreeSearch<R = UniformRollout, K = StandardRandomGenerator> {
    config: MctsConfig,
    rollout: R,
    random: K,
}

/// A builder for creating instances of `MonteCarloTreeSearch`.
///
/// This provides a convenient way to configure the MCTS search with different parameters.
#[derive(Debug, Clone)]
pub struct MonteCarloTreeSearchBuilder<R, K> {
    config: MctsConfig,
    rollout: R,
    random: K,
}

impl<R, K> MonteCarloTreeSearchBuilder<R, K> {
    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: MctsConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the exploration constant of the UCT formula.
    pub fn with_exploration_constant(mut self, c: f64) -> Self {
        self.config.exploration_constant = c;
        self
    }

    /// Sets the backup strategy.
    pub fn with_backup(mut self, backup: BackupStrategy) -> Self {
        self.config.backup = backup;
        self
    }

    /// Sets how the final move is picked.
    pub fn with_final_move(mut self, final_move: FinalMoveSelection) -> Self {
        self.config.final_move = final_move;
        self
    }

    /// Expands only game-ending moves where there are any.
    pub fn with_early_end(mut self, early_end: bool) -> Self {
        self.config.early_end = early_end;
        self
    }

    /// Sets the policy used to play simulations out.
    pub fn with_rollout_policy<R2>(self, rollout: R2) -> MonteCarloTreeSearchBuilder<R2, K> {
        MonteCarloTreeSearchBuilder {
            config: self.config,
            rollout,
            random: self.random,
        }
    }

    /// Sets the random number generator for the MCTS search.
    pub fn with_random_generator<K2: RandomGenerator>(
        self,
        random: K2,
    ) -> MonteCarloTreeSearchBuilder<R, K2> {
        MonteCarloTreeSearchBuilder {
            config: self.config,
            rollout: self.rollout,
            random,
        }
    }

    /// Makes the search reproducible with a seeded generator.
    pub fn with_seed(self, seed: u64) -> MonteCarloTreeSearchBuilder<R, SeededRandomGenerator> {
        self.with_random_generator(SeededRandomGenerator::new(seed))
    }

    /// Builds the engine, rejecting invalid configurations.
    pub fn build(self) -> Result<MonteCarloTreeSearch<R, K>, SearchError> {
        self.config.validate()?;
        Ok(MonteCarloTreeSearch {
            config: self.config,
            rollout: self.rollout,
            random: self.random,
        })
    }
}

impl MonteCarloTreeSearch {
    /// Returns a new builder with the default configuration, uniform rollouts
    /// and the thread-local random generator.
    pub fn builder() -> MonteCarloTreeSearchBuilder<UniformRollout, StandardRandomGenerator> {
        MonteCarloTreeSearchBuilder {
            config: MctsConfig::default(),
            rollout: UniformRollout,
            random: StandardRandomGenerator,
        }
    }
}

impl<R, K: RandomGenerator> MonteCarloTreeSearch<R, K> {
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Picks a move for `state` with a fresh tree.
    ///
    /// A state with a single legal move returns it without searching, whatever
    /// the budget.
    pub fn choose_move<G>(&mut self, state: &G, budget: Budget) -> Result<G::Move, SearchError>
    where
        G: Game,
        R: RolloutPolicy<G>,
    {
        let mut tree = SearchTree::new(state.clone())?;
        let root = tree.node(tree.root_id())?;
        if root.is_terminal() {
            return Err(SearchError::NoLegalMoves);
        }
        if let [only] = root.untried_moves() {
            return Ok(only.clone());
        }

        budget.validate()?;
        Ok(self.search(&mut tree, budget)?.best_move)
    }

    /// Runs iterations on `tree` until `budget` is exhausted.
    ///
    /// At least one iteration always runs. The tree keeps its statistics, so
    /// it can be searched again or re-rooted after a move is played.
    pub fn search<G>(
        &mut self,
        tree: &mut SearchTree<G>,
        budget: Budget,
    ) -> Result<SearchReport<G::Move>, SearchError>
    where
        G: Game,
        R: RolloutPolicy<G>,
    {
        budget.validate()?;
        if tree.node(tree.root_id())?.is_terminal() {
            return Err(SearchError::NoLegalMoves);
        }

        let start = Instant::now();
        let mut iterations = 0;
        loop {
            let _ = self.iterate(tree)?;
            iterations += 1;
            if budget.is_exhausted(iterations, start.elapsed()) {
                break;
            }
        }

        let best_move = self.best_move(tree)?;
        let report = SearchReport::new(tree, best_move, iterations, start.elapsed());
        debug!(
            iterations,
            nodes = report.tree_size,
            elapsed_ms = report.elapsed.as_millis() as u64,
            best_move = ?report.best_move,
            "search finished"
        );
        Ok(report)
    }

    /// Performs one full iteration (selection, expansion, simulation,
    /// backpropagation) and returns the node the simulation started from.
    pub fn iterate<G>(&mut self, tree: &mut SearchTree<G>) -> Result<NodeId, SearchError>
    where
        G: Game,
        R: RolloutPolicy<G>,
    {
        let selected = descend(tree.root(), self.config.exploration_constant).id();

        // Terminal nodes are simulated in place.
        let leaf = if tree.node(selected)?.is_terminal() {
            selected
        } else {
            if self.config.early_end {
                tree.narrow_to_terminal_moves(selected)?;
            }
            tree.expand(selected, &mut self.random)?
        };

        let result = playout(tree.node(leaf)?.state(), &mut self.rollout, &mut self.random)?;
        self.config.backup.update(tree, leaf, &result.terminal)?;

        let node = tree.node(leaf)?;
        trace!(
            leaf = ?leaf,
            depth = node.depth(),
            plies = result.plies,
            reward = result
                .terminal
                .reward(node.mover().unwrap_or_else(|| node.player_to_move())),
            "MCTS iteration complete"
        );
        Ok(leaf)
    }

    /// Runs exactly `n` iterations on `tree`.
    pub fn iterate_n_times<G>(&mut self, tree: &mut SearchTree<G>, n: u32) -> Result<(), SearchError>
    where
        G: Game,
        R: RolloutPolicy<G>,
    {
        for _ in 0..n {
            let _ = self.iterate(tree)?;
        }
        Ok(())
    }

    /// The recommended move at the root of `tree`.
    ///
    /// Ties go to the child expanded first.
    pub fn best_move<G: Game>(&self, tree: &SearchTree<G>) -> Result<G::Move, SearchError> {
        let root = tree.root();
        if root.value().is_terminal() {
            return Err(SearchError::NoLegalMoves);
        }

        let best = match self.config.final_move {
            FinalMoveSelection::RobustChild => best_child(root, MctsNode::visits),
            FinalMoveSelection::MaxChild => best_child(root, |n| (n.value(), n.mean_value())),
        };
        best
            .and_then(|node| node.prev_move().cloned())
            .ok_or_else(|| SearchError::Logic("root has no expanded children".into()))
    }
}

fn best_child<'a, G, F, T>(root: NodeRef<'a, MctsNode<G>>, key: F) -> Option<&'a MctsNode<G>>
where
    G: Game,
    F: Fn(&MctsNode<G>) -> T,
    T: PartialOrd,
{
    let mut best: Option<(&MctsNode<G>, T)> = None;
    for child in root.children() {
        let node = child.value();
        let score = key(node);
        if best.as_ref().is_none_or(|(_, best_score)| score > *best_score) {
            best = Some((node, score));
        }
    }
    best.map(|(node, _)| node)
}

/// Statistics of one root move after a search.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveStats<M> {
    pub mv: M,
    pub visits: u32,
    pub mean_value: f64,
    /// Value used for selection; differs from the mean under the outcome backup.
    pub value: f64,
}

/// Result of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport<M> {
    /// Recommended move.
    pub best_move: M,
    /// Iterations run by this search.
    pub iterations: u32,
    pub elapsed: Duration,
    /// Visits of the root, including earlier searches on the same tree.
    pub root_visits: u32,
    /// Nodes in the tree when the search ended.
    pub tree_size: usize,
    /// Every expanded root move, in expansion order.
    pub moves: Vec<MoveStats<M>>,
}

impl<M: Clone> SearchReport<M> {
    fn new<G: Game<Move = M>>(
        tree: &SearchTree<G>,
        best_move: M,
        iterations: u32,
        elapsed: Duration,
    ) -> Self {
        let root = tree.root();
        let moves = root
            .children()
            .filter_map(|child| {
                let node = child.value();
                node.prev_move().map(|mv| MoveStats {
                    mv: mv.clone(),
                    visits: node.visits(),
                    mean_value: node.mean_value(),
                    value: node.value(),
                })
            })
            .collect();

        Self {
            best_move,
            iterations,
            elapsed,
            root_visits: root.value().visits(),
            tree_size: tree.node_count(),
            moves,
        }
    }
}
