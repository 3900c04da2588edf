//! Backpropagation of playout results.
//!
//! Both strategies give every node on the path exactly one visit and keep
//! the rewards attributed to each node's mover. Selection and final move
//! choice read [`NodeStats::value`](crate::mcts_node::NodeStats::value)
//! without knowing which strategy ran: the mean reward after a classic
//! backup, the minimax expected value after an outcome backup.

use ego_tree::NodeId;
use serde::Deserialize;

use crate::error::SearchError;
use crate::game::{Game, Outcome};
use crate::tree::SearchTree;

/// How a terminal result is written back along the selected path.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupStrategy {
    /// One scalar reward, taken from the leaf's mover and remapped to
    /// `1 - r` at every ply on the way up. Assumes strictly alternating turns.
    #[default]
    Classic,
    /// Each node is credited with the terminal reward of its own mover and
    /// counts wins, draws and losses separately. It also keeps an expected
    /// value: the latest result at a leaf, and above it the value of the
    /// child its player to move likes best. No alternation is assumed, so
    /// games with extra turns or passes are scored correctly.
    Outcome,
}

impl BackupStrategy {
    /// Writes the result of a playout that started at `leaf` and ended in
    /// `terminal` into every node from `leaf` up to the root.
    pub fn update<G: Game>(
        self,
        tree: &mut SearchTree<G>,
        leaf: NodeId,
        terminal: &G,
    ) -> Result<(), SearchError> {
        let path = tree.path_to_root(leaf)?;
        match self {
            BackupStrategy::Classic => {
                let node = tree.node(leaf)?;
                let mut reward = match node.mover() {
                    Some(mover) => terminal.reward(mover),
                    None => 1.0 - terminal.reward(node.player_to_move()),
                };
                for id in path {
                    tree.update_node(id, |n| n.stats.record(reward, None))?;
                    reward = 1.0 - reward;
                }
            }
            BackupStrategy::Outcome => {
                for id in path {
                    let node = tree.node(id)?;
                    let player = node.mover().unwrap_or_else(|| node.player_to_move());
                    let reward = terminal.reward(player);
                    let outcome = Outcome::from_reward(reward);
                    let expected = principal_outcome(tree, id)?.unwrap_or_else(|| terminal.clone());
                    let expected_value = expected.reward(player);
                    tree.update_node(id, |n| {
                        n.stats.record(reward, Some(outcome));
                        n.stats.expected_value = Some(expected_value);
                        n.expected_outcome = Some(expected);
                    })?;
                }
            }
        }
        Ok(())
    }
}

/// The expected outcome of the child of `id` that is best for the player to
/// move at `id`. A child's expected value is already taken from that player's
/// side, since the player to move is the child's mover. Ties go to the first
/// child.
fn principal_outcome<G: Game>(tree: &SearchTree<G>, id: NodeId) -> Result<Option<G>, SearchError> {
    let mut best: Option<(&G, f64)> = None;
    for child in tree.get(id)?.children() {
        let node = child.value();
        let (Some(expected), Some(value)) = (node.expected_outcome(), node.stats().expected_value)
        else {
            continue;
        };
        if best.is_none_or(|(_, best_value)| value > best_value) {
            best = Some((expected, value));
        }
    }
    Ok(best.map(|(expected, _)| expected.clone()))
}
