//! UCT child selection.
//!
//! Children are scored with UCB1:
//!
//! ```text
//! UCT(c) = value(c) + C * sqrt(ln(N_parent) / n_c)
//! ```
//!
//! `value` is [`NodeStats::value`]: the mean reward, or the expected value
//! when the outcome backup keeps one.
//!
//! Unvisited children score `+inf` so every child is tried once before
//! exploitation starts. Ties go to the child expanded first, which keeps
//! seeded searches reproducible.

use ego_tree::{NodeId, NodeRef};

use crate::game::Game;
use crate::mcts_node::{MctsNode, NodeStats};

/// Default exploration constant from the UCB1 derivation.
pub const DEFAULT_EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// Calculates the UCT value of a child whose parent has `parent_visits` visits.
#[inline]
pub fn uct_score(child: &NodeStats, parent_visits: u32, exploration: f64) -> f64 {
    if child.visits == 0 {
        return f64::INFINITY;
    }

    let visits = child.visits as f64;
    child.value() + exploration * ((parent_visits as f64).ln() / visits).sqrt()
}

/// Picks the child of `node` with the highest UCT score.
///
/// Returns `None` if the node has no children or every score is NaN.
pub fn select_child<G: Game>(node: NodeRef<'_, MctsNode<G>>, exploration: f64) -> Option<NodeId> {
    let parent_visits = node.value().visits();
    let mut best: Option<(NodeId, f64)> = None;

    for child in node.children() {
        let score = uct_score(child.value().stats(), parent_visits, exploration);
        if score.is_nan() {
            continue;
        }
        // Strict comparison: the first of equal scores is kept.
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((child.id(), score));
        }
    }

    best.map(|(id, _)| id)
}

/// Descends from `node` while the current node is fully expanded, not
/// terminal and has children. The returned node is the expansion target.
pub fn descend<G: Game>(node: NodeRef<'_, MctsNode<G>>, exploration: f64) -> NodeRef<'_, MctsNode<G>> {
    let mut current = node;
    loop {
        let data = current.value();
        if data.is_terminal() || !data.is_fully_expanded() || !current.has_children() {
            return current;
        }

        let next = select_child(current, exploration)
            .and_then(|id| current.children().find(|child| child.id() == id));
        match next {
            Some(child) => current = child,
            None => return current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::nim::Nim;
    use crate::random::SeededRandomGenerator;
    use crate::tree::SearchTree;

    fn stats(visits: u32, total_reward: f64) -> NodeStats {
        NodeStats {
            visits,
            total_reward,
            ..NodeStats::default()
        }
    }

    #[test]
    fn test_uct_score() {
        // 0.5 + sqrt(2) * sqrt(ln(100) / 10)
        let score = uct_score(&stats(10, 5.0), 100, DEFAULT_EXPLORATION);
        assert!((score - 1.4597).abs() < 1e-3);

        // Without exploration only the mean is left.
        let greedy = uct_score(&stats(10, 5.0), 100, 0.0);
        assert!((greedy - 0.5).abs() < 1e-9);
    }

    #[test]
    fn expected_value_replaces_mean() {
        let mut child = stats(10, 9.0);
        child.expected_value = Some(0.0);
        let greedy = uct_score(&child, 100, 0.0);
        assert!(greedy.abs() < 1e-9);
    }

    #[test]
    fn unvisited_child_has_priority() {
        assert_eq!(uct_score(&stats(0, 0.0), 10, 1.0), f64::INFINITY);
    }

    #[test]
    fn more_visits_shrink_the_bonus() {
        let rarely = uct_score(&stats(2, 1.0), 50, 1.0);
        let often = uct_score(&stats(20, 10.0), 50, 1.0);
        assert!(rarely > often);
    }

    fn three_children() -> (SearchTree<Nim>, Vec<NodeId>) {
        let mut tree = SearchTree::new(Nim::new(9)).unwrap();
        let mut rng = SeededRandomGenerator::new(11);
        let root = tree.root_id();
        let ids = (0..3).map(|_| tree.expand(root, &mut rng).unwrap()).collect();
        (tree, ids)
    }

    #[test]
    fn test_select_child() {
        let (mut tree, ids) = three_children();
        let root = tree.root_id();
        tree.update_node(root, |n| n.stats = stats(30, 15.0)).unwrap();
        tree.update_node(ids[0], |n| n.stats = stats(10, 2.0)).unwrap();
        tree.update_node(ids[1], |n| n.stats = stats(10, 9.0)).unwrap();
        tree.update_node(ids[2], |n| n.stats = stats(10, 4.0)).unwrap();

        assert_eq!(select_child(tree.root(), DEFAULT_EXPLORATION), Some(ids[1]));
    }

    #[test]
    fn ties_go_to_first_child() {
        let (mut tree, ids) = three_children();
        let root = tree.root_id();
        tree.update_node(root, |n| n.stats = stats(30, 15.0)).unwrap();
        for id in &ids {
            tree.update_node(*id, |n| n.stats = stats(10, 5.0)).unwrap();
        }

        assert_eq!(select_child(tree.root(), DEFAULT_EXPLORATION), Some(ids[0]));
    }

    #[test]
    fn unvisited_child_beats_strong_siblings() {
        let (mut tree, ids) = three_children();
        let root = tree.root_id();
        tree.update_node(root, |n| n.stats = stats(20, 10.0)).unwrap();
        tree.update_node(ids[0], |n| n.stats = stats(10, 10.0)).unwrap();
        tree.update_node(ids[1], |n| n.stats = stats(10, 10.0)).unwrap();

        assert_eq!(select_child(tree.root(), DEFAULT_EXPLORATION), Some(ids[2]));
    }

    #[test]
    fn descend_stops_at_partially_expanded_root() {
        let mut tree = SearchTree::new(Nim::new(9)).unwrap();
        let mut rng = SeededRandomGenerator::new(12);
        let root = tree.root_id();
        tree.expand(root, &mut rng).unwrap();

        assert_eq!(descend(tree.root(), DEFAULT_EXPLORATION).id(), root);
    }

    #[test]
    fn descend_passes_fully_expanded_nodes() {
        let (mut tree, ids) = three_children();
        let root = tree.root_id();
        tree.update_node(root, |n| n.stats = stats(3, 1.5)).unwrap();
        tree.update_node(ids[0], |n| n.stats = stats(1, 0.0)).unwrap();
        tree.update_node(ids[1], |n| n.stats = stats(1, 1.0)).unwrap();
        tree.update_node(ids[2], |n| n.stats = stats(1, 0.5)).unwrap();

        // The best child still has untried moves, so descent stops there.
        let target = descend(tree.root(), DEFAULT_EXPLORATION);
        assert_eq!(target.id(), ids[1]);
        assert!(!target.value().is_fully_expanded());
    }
}
