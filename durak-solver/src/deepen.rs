//! Incremental deepening: extend a built tree by one trick at its
//! unexpanded frontier.

use rustc_hash::FxHashSet;
use tracing::debug;

use durak_core::Table;

use crate::search::TrickSearch;
use crate::tree::{pick_best, HandValue, Node, NodeId, Tree};

impl Tree {
    /// Expand every heuristic frontier leaf under the root by one
    /// trick and recompute the affected ancestors' choices.
    ///
    /// Terminal leaves are never touched: a hand that is actually
    /// empty has nothing to expand, and an already-exact subtree keeps
    /// its estimate. Only frontier leaves change, and only their
    /// ancestors get a new best move.
    pub fn deepen(&mut self) {
        self.deepen_from(self.root);
    }

    /// Like [`deepen`](Tree::deepen), but restricted to the subtree
    /// under `id`, typically the node the game has advanced to.
    pub fn deepen_from(&mut self, id: NodeId) {
        let before = self.nodes.len();
        let mut visited = FxHashSet::default();
        self.deepen_node(id, &mut visited);
        debug!(
            before,
            after = self.nodes.len(),
            "deepened search tree"
        );
    }

    fn deepen_node(&mut self, id: NodeId, visited: &mut FxHashSet<NodeId>) {
        // Shared transposition nodes are reachable from several
        // parents; expand each only once.
        if !visited.insert(id) {
            return;
        }
        match &self.nodes[id] {
            Node::Leaf(_) => {}
            Node::Hand(hand) => match hand.value {
                HandValue::Terminal(_) => {}
                HandValue::Heuristic(_) => {
                    let (attacker, defender, favored_attacks) =
                        (hand.attacker, hand.defender, hand.favored_attacks);
                    // One-level rebuild seeded with the leaf's own
                    // hands and favored side.
                    let mut trick =
                        TrickSearch::new(&mut self.nodes, self.trump, favored_attacks, 1);
                    let root = trick.attacker_turn(attacker, defender, Table::EMPTY);
                    match &mut self.nodes[id] {
                        Node::Hand(hand) => {
                            hand.value = HandValue::Expanded(root);
                            hand.depth = 1;
                        }
                        _ => unreachable!(),
                    }
                }
                HandValue::Expanded(root) => self.deepen_node(root, visited),
            },
            Node::Decision(decision) => {
                let children: Vec<NodeId> = decision.moves.iter().map(|&(_, c)| c).collect();
                for child in children {
                    self.deepen_node(child, visited);
                }
                // Children may have new estimates; re-pick under the
                // same max/min rule as construction.
                let (best, estimate) = match &self.nodes[id] {
                    Node::Decision(decision) => {
                        pick_best(&self.nodes, &decision.moves, decision.maximize)
                    }
                    _ => unreachable!(),
                };
                match &mut self.nodes[id] {
                    Node::Decision(decision) => {
                        decision.best = best;
                        decision.estimate = estimate;
                    }
                    _ => unreachable!(),
                }
            }
        }
    }
}
