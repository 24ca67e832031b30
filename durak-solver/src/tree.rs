//! Retained search tree: node storage, moves and navigation.
//!
//! All nodes of one search live in a single arena owned by [`Tree`];
//! links are indices into it. The transposition cache makes the
//! structure a DAG within a trick: table states reached by different
//! move orders share one node.

use durak_core::{Card, CardSet, Suit, Table};

/// Index of a node inside its [`Tree`]
pub type NodeId = usize;

/// One move at a decision point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Attacker places a card on the table
    Attack(Card),
    /// Attacker stops a nonempty trick; the defender survives
    Stop,
    /// Defender covers the pending attack card
    Defend(Card),
    /// Defender gives up the trick
    Take,
    /// Attacker adds extra matching cards after the defender gave up
    /// (possibly none), closing the trick
    Toss(CardSet),
}

/// In-trick decision point. Immutable after construction except during
/// deepening, which may re-pick `best` and `estimate` after a
/// descendant frontier was expanded.
#[derive(Debug, Clone)]
pub struct DecisionNode {
    /// Table state this decision was taken at
    pub table: Table,
    /// Whether the attacker is the one choosing here (the defender
    /// moves at cover-or-take decisions)
    pub mover_attacks: bool,
    /// Whether the mover here is the side the search is optimized for
    pub maximize: bool,
    /// Every legal move and the state it leads to
    pub moves: Vec<(Move, NodeId)>,
    /// Index into `moves` of the chosen move
    pub best: usize,
    /// Estimate of this position, in [0, 1] for the favored side
    pub estimate: f64,
}

impl DecisionNode {
    /// The move selected at this decision point
    pub fn best_move(&self) -> Move {
        self.moves[self.best].0
    }
}

/// Node at a trick boundary: the full position between tricks.
#[derive(Debug, Clone)]
pub struct HandNode {
    /// Hand of the player leading this trick
    pub attacker: CardSet,
    /// Hand of the player answering it
    pub defender: CardSet,
    /// Whether the side being optimized for is the attacker here
    pub favored_attacks: bool,
    /// Remaining trick budget below this node
    pub depth: u32,
    pub value: HandValue,
}

/// What a [`HandNode`] resolved to
#[derive(Debug, Clone, Copy)]
pub enum HandValue {
    /// A hand is empty; the game is over and the value exact
    Terminal(f64),
    /// Depth budget was exhausted; heuristic value, expandable later
    Heuristic(f64),
    /// Searched: root decision node of the trick
    Expanded(NodeId),
}

#[derive(Debug, Clone)]
pub enum Node {
    Hand(HandNode),
    Decision(DecisionNode),
    /// Game ended in the middle of a trick (a hand ran out while the
    /// table was live); exact value, never expandable
    Leaf(f64),
}

/// A built search tree for one position.
///
/// Created by [`build`](crate::build); extended in place by
/// [`deepen`](Tree::deepen). Node ids stay valid across deepening: the
/// arena only grows.
pub struct Tree {
    pub(crate) trump: Suit,
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
}

impl Tree {
    /// Trump suit this tree was searched under
    pub fn trump(&self) -> Suit {
        self.trump
    }

    /// Root node: the position the tree was built for
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Win probability of the favored side at the root
    pub fn estimate(&self) -> f64 {
        self.estimate_of(self.root)
    }

    /// Win probability of the favored side at any node
    pub fn estimate_of(&self, id: NodeId) -> f64 {
        estimate_of(&self.nodes, id)
    }

    /// Resolve a trick-boundary node to its root decision, if searched
    pub fn enter(&self, id: NodeId) -> NodeId {
        match &self.nodes[id] {
            Node::Hand(HandNode {
                value: HandValue::Expanded(root),
                ..
            }) => *root,
            _ => id,
        }
    }

    /// The recorded best move at a decision point (entering a searched
    /// trick-boundary node first). `None` on terminal and heuristic
    /// nodes.
    pub fn best_move(&self, id: NodeId) -> Option<Move> {
        match &self.nodes[self.enter(id)] {
            Node::Decision(d) => Some(d.best_move()),
            _ => None,
        }
    }

    /// Follow an observed move from a decision point. `None` when the
    /// move is not among the node's recorded children.
    pub fn advance(&self, id: NodeId, mv: Move) -> Option<NodeId> {
        match &self.nodes[self.enter(id)] {
            Node::Decision(d) => d.moves.iter().find(|(m, _)| *m == mv).map(|&(_, c)| c),
            _ => None,
        }
    }

    /// View a node as a trick boundary, if it is one
    pub fn hand_node(&self, id: NodeId) -> Option<&HandNode> {
        match &self.nodes[id] {
            Node::Hand(h) => Some(h),
            _ => None,
        }
    }
}

/// Value of a node, resolving trick boundaries through their root
pub(crate) fn estimate_of(nodes: &[Node], id: NodeId) -> f64 {
    match &nodes[id] {
        Node::Leaf(v) => *v,
        Node::Decision(d) => d.estimate,
        Node::Hand(h) => match h.value {
            HandValue::Terminal(v) | HandValue::Heuristic(v) => v,
            HandValue::Expanded(root) => estimate_of(nodes, root),
        },
    }
}

/// Pick the best child under the max/min rule. Ties keep the first
/// candidate, so selection is deterministic for a fixed move order.
pub(crate) fn pick_best(nodes: &[Node], moves: &[(Move, NodeId)], maximize: bool) -> (usize, f64) {
    debug_assert!(!moves.is_empty());
    let mut best = 0;
    let mut best_value = estimate_of(nodes, moves[0].1);
    for (i, &(_, child)) in moves.iter().enumerate().skip(1) {
        let value = estimate_of(nodes, child);
        let better = if maximize {
            value > best_value
        } else {
            value < best_value
        };
        if better {
            best = i;
            best_value = value;
        }
    }
    (best, best_value)
}
