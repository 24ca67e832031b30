//! Game-tree search for two-player durak endgames.
//!
//! The engine computes, for a known split of the remaining cards
//! between an attacker and a defender, the game-theoretic win
//! probability and the best move at every decision point:
//!
//! - [`build`] runs a depth-bounded minimax search over whole tricks,
//!   including the combinatorial toss-in choice after a failed
//!   defense, and returns the retained [`Tree`].
//! - [`hand_relation`] is the closed-form estimate substituted at the
//!   search horizon.
//! - [`Tree::deepen`] extends a built tree by one more trick at its
//!   unexpanded frontier without recomputing exact subtrees.
//!
//! The search is synchronous, allocation-light and deterministic;
//! independent trees can be built on as many threads as desired.

mod deepen;
mod relation;
mod search;
mod tree;

pub use relation::hand_relation;
pub use search::{build, MAX_DEPTH};
pub use tree::{DecisionNode, HandNode, HandValue, Move, Node, NodeId, Tree};

#[cfg(test)]
mod tests;
