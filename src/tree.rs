//! Search tree with arena allocation.
//!
//! Nodes live in an [`ego_tree::Tree`] arena and are addressed by [`NodeId`].
//! Parent links are plain arena indices, so a child never owns or keeps its
//! parent alive; dropping the tree drops every node at once.

use std::fmt::Write;

use ego_tree::{NodeId, NodeRef, Tree};
use tracing::debug;

use crate::error::SearchError;
use crate::game::Game;
use crate::mcts_node::MctsNode;
use crate::random::RandomGenerator;

/// The Monte Carlo search tree for one root position.
#[derive(Debug, Clone)]
pub struct SearchTree<G: Game> {
    tree: Tree<MctsNode<G>>,
}

impl<G: Game> SearchTree<G> {
    /// Builds a one-node tree for `root_state`.
    ///
    /// Fails with [`SearchError::InvalidState`] if the game cannot enumerate the
    /// moves of a non-terminal root.
    pub fn new(root_state: G) -> Result<Self, SearchError> {
        Ok(Self {
            tree: Tree::new(MctsNode::root(root_state)?),
        })
    }

    #[inline]
    pub fn root_id(&self) -> NodeId {
        self.tree.root().id()
    }

    /// A reference to the root node, for traversal.
    #[inline]
    pub fn root(&self) -> NodeRef<'_, MctsNode<G>> {
        self.tree.root()
    }

    /// A reference to any node of the tree, for traversal.
    pub fn get(&self, id: NodeId) -> Result<NodeRef<'_, MctsNode<G>>, SearchError> {
        self.tree
            .get(id)
            .ok_or_else(|| SearchError::Logic(format!("node {id:?} is not part of the tree")))
    }

    /// The data of a node.
    pub fn node(&self, id: NodeId) -> Result<&MctsNode<G>, SearchError> {
        self.get(id).map(|node| node.value())
    }

    /// Runs `update` on the data of a node.
    pub(crate) fn update_node<F>(&mut self, id: NodeId, update: F) -> Result<(), SearchError>
    where
        F: FnOnce(&mut MctsNode<G>),
    {
        let mut node = self
            .tree
            .get_mut(id)
            .ok_or_else(|| SearchError::Logic(format!("node {id:?} is not part of the tree")))?;
        update(node.value());
        Ok(())
    }

    /// Total number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        self.tree.root().descendants().count()
    }

    /// The child of `id` reached by `mv`, if it has been expanded.
    pub fn child_for_move(&self, id: NodeId, mv: &G::Move) -> Result<Option<NodeId>, SearchError> {
        Ok(self
            .get(id)?
            .children()
            .find(|child| child.value().prev_move() == Some(mv))
            .map(|child| child.id()))
    }

    /// Node ids from `id` up to and including the root.
    pub fn path_to_root(&self, id: NodeId) -> Result<Vec<NodeId>, SearchError> {
        let mut path = vec![id];
        path.extend(self.get(id)?.ancestors().map(|n| n.id()));
        Ok(path)
    }

    /// Expands one untried move of `id` and returns the new child.
    ///
    /// The move is picked uniformly at random among the untried ones so the
    /// order reported by the game does not bias the search.
    pub fn expand<K: RandomGenerator>(
        &mut self,
        id: NodeId,
        random: &mut K,
    ) -> Result<NodeId, SearchError> {
        let mut node = self
            .tree
            .get_mut(id)
            .ok_or_else(|| SearchError::Logic(format!("node {id:?} is not part of the tree")))?;
        let parent = node.value();
        if parent.is_terminal() {
            return Err(SearchError::Logic("cannot expand a terminal node".into()));
        }
        if parent.untried_moves.is_empty() {
            return Err(SearchError::Logic(
                "cannot expand a fully expanded node".into(),
            ));
        }

        let index = random.next_index(parent.untried_moves.len());
        let child_state = parent.state().apply(&parent.untried_moves[index])?;
        let mover = parent.player_to_move();
        let depth = parent.depth + 1;
        let mv = parent.untried_moves[index].clone();
        let child = MctsNode::child(child_state, mv, mover, depth)?;
        let _ = parent.untried_moves.swap_remove(index);

        Ok(node.append(child).id())
    }

    /// Restricts the untried moves of `id` to the moves that end the game,
    /// if there are any. Each node is checked once; later calls do nothing.
    pub fn narrow_to_terminal_moves(&mut self, id: NodeId) -> Result<(), SearchError> {
        let node = self.node(id)?;
        if node.checked_for_terminal_moves || node.is_terminal() {
            return Ok(());
        }

        let mut ending = Vec::new();
        for mv in node.untried_moves() {
            if node.state().apply(mv)?.is_terminal() {
                ending.push(mv.clone());
            }
        }
        self.update_node(id, |n| {
            n.checked_for_terminal_moves = true;
            if !ending.is_empty() {
                n.untried_moves = ending;
            }
        })
    }

    /// Promotes `child`, a child of the root, to be the new root.
    ///
    /// Every other branch of the old root is dropped. The kept subtree is
    /// copied into a fresh arena, so afterwards the tree holds exactly the
    /// nodes of that subtree and nothing of the discarded siblings.
    pub fn reroot(&mut self, child: NodeId) -> Result<(), SearchError> {
        let root_id = self.root_id();
        let new_root = self.get(child)?;
        if new_root.parent().map(|p| p.id()) != Some(root_id) {
            return Err(SearchError::Logic(format!(
                "node {child:?} is not a child of the root"
            )));
        }

        let mut root_data = new_root.value().clone();
        root_data.depth = 0;
        let mut fresh = Tree::new(root_data);
        let mut pending = vec![(child, fresh.root().id())];

        while let Some((old_id, new_id)) = pending.pop() {
            let old = self.get(old_id)?;
            let mut parent = fresh
                .get_mut(new_id)
                .ok_or_else(|| SearchError::Logic("lost track of a copied node".into()))?;
            for old_child in old.children() {
                let mut data = old_child.value().clone();
                data.depth = data.depth.saturating_sub(1);
                let copied = parent.append(data).id();
                pending.push((old_child.id(), copied));
            }
        }

        let dropped = self.node_count();
        self.tree = fresh;
        debug!(
            kept = self.node_count(),
            dropped = dropped - self.node_count(),
            "re-rooted search tree"
        );
        Ok(())
    }

    /// Longest path from the root, in plies.
    pub fn max_depth(&self) -> u32 {
        self.tree
            .root()
            .descendants()
            .map(|node| node.value().depth())
            .max()
            .unwrap_or(0)
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.tree.root().value();
        TreeStats {
            total_nodes: self.node_count(),
            root_visits: root.visits(),
            root_value: root.mean_value(),
            max_depth: self.max_depth(),
        }
    }

    /// One line per child of the root: move, reward/visits and mean value.
    pub fn children_summary(&self) -> String {
        let mut out = String::new();
        for child in self.tree.root().children() {
            let _ = writeln!(out, "{}", describe(child.value()));
        }
        out
    }

    /// Indented dump of the tree down to `max_depth` plies below the root.
    pub fn render(&self, max_depth: u32) -> String {
        let mut out = String::new();
        let mut pending = vec![self.tree.root()];
        while let Some(node) = pending.pop() {
            let data = node.value();
            let _ = writeln!(out, "{}{}", "| ".repeat(data.depth() as usize), describe(data));
            if data.depth() < max_depth {
                let children: Vec<_> = node.children().collect();
                // Reversed so children come out in insertion order.
                pending.extend(children.into_iter().rev());
            }
        }
        out
    }
}

fn describe<G: Game>(node: &MctsNode<G>) -> String {
    let stats = node.stats();
    let mut line = format!(
        "[move: {:?} reward/visits: {:.1}/{} mean: {:.3}",
        node.prev_move(),
        stats.total_reward,
        stats.visits,
        stats.mean_value()
    );
    if let Some(expected) = stats.expected_value {
        let _ = write!(
            line,
            " ev: {expected:.3} wins: {:.0}% draws: {:.0}%",
            stats.wins_rate() * 100.0,
            stats.draws_rate() * 100.0
        );
    }
    line.push(']');
    line
}

/// Statistics about a search tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f64,
    pub max_depth: u32,
}
