//! Trick search and hand-level recursion.
//!
//! One [`TrickSearch`] instance covers exactly one trick: it owns the
//! transposition cache for that trick and nothing else. Wherever the
//! trick closes (stop or toss), the search recurses into a fresh
//! hand-level build with its own cache, because card ownership has
//! changed and cached values from another hand partition would be
//! wrong.

use rustc_hash::FxHashMap;
use tracing::debug;

use durak_core::{beating_cards, matching_by_rank, Card, CardSet, Suit, Table};

use crate::relation::hand_relation;
use crate::tree::{pick_best, DecisionNode, HandNode, HandValue, Move, Node, NodeId, Tree};

/// Default trick budget for a fresh endgame tree
pub const MAX_DEPTH: u32 = 3;

/// Exact game value when a hand is already empty, else `None`.
///
/// Running out of cards wins: the returned probability is for the
/// favored side, which is the attacker iff `favored_attacks`.
pub(crate) fn terminal_value(
    attacker: CardSet,
    defender: CardSet,
    favored_attacks: bool,
) -> Option<f64> {
    match (attacker.is_empty(), defender.is_empty()) {
        (false, false) => None,
        (true, true) => Some(0.5),
        (true, false) => Some(if favored_attacks { 1.0 } else { 0.0 }),
        (false, true) => Some(if favored_attacks { 0.0 } else { 1.0 }),
    }
}

/// Build a search tree for one position.
///
/// `attacker` leads the first trick; `favored_attacks` fixes which of
/// the two sides every estimate in the tree is a win probability for.
/// `depth` is the trick budget: at zero the position is valued by
/// [`hand_relation`] instead of search. The result is deterministic in
/// its arguments.
pub fn build(
    attacker: CardSet,
    defender: CardSet,
    favored_attacks: bool,
    depth: u32,
    trump: Suit,
) -> Tree {
    assert!(
        attacker.is_disjoint(defender),
        "hands overlap: {attacker} vs {defender}"
    );
    let mut nodes = Vec::new();
    let root = build_hand(&mut nodes, trump, attacker, defender, favored_attacks, depth);
    let tree = Tree { trump, nodes, root };
    debug!(
        nodes = tree.len(),
        depth,
        estimate = tree.estimate(),
        "built search tree"
    );
    tree
}

/// Add one trick-boundary node (and, unless terminal or out of budget,
/// the whole trick search below it) to the arena.
pub(crate) fn build_hand(
    nodes: &mut Vec<Node>,
    trump: Suit,
    attacker: CardSet,
    defender: CardSet,
    favored_attacks: bool,
    depth: u32,
) -> NodeId {
    let value = if let Some(v) = terminal_value(attacker, defender, favored_attacks) {
        HandValue::Terminal(v)
    } else if depth == 0 {
        let (p_attacker, p_defender) = hand_relation(attacker, defender, trump);
        HandValue::Heuristic(if favored_attacks {
            p_attacker
        } else {
            p_defender
        })
    } else {
        let mut trick = TrickSearch::new(nodes, trump, favored_attacks, depth);
        let root = trick.attacker_turn(attacker, defender, Table::EMPTY);
        HandValue::Expanded(root)
    };
    nodes.push(Node::Hand(HandNode {
        attacker,
        defender,
        favored_attacks,
        depth,
        value,
    }));
    nodes.len() - 1
}

/// Cache key: exact table state plus the decision stage. The stage tag
/// separates the attacker-to-move, toss and per-pending-card defense
/// states that can share one table.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct StageKey {
    attack: u64,
    defense: u64,
    stage: u8,
}

const STAGE_ATTACK: u8 = 0;
const STAGE_TOSS: u8 = 1;
const STAGE_DEFEND: u8 = 2; // plus the pending card's index

impl StageKey {
    fn new(table: Table, stage: u8) -> Self {
        StageKey {
            attack: table.attack.bits(),
            defense: table.defense.bits(),
            stage,
        }
    }
}

/// Alternating search over a single trick.
///
/// The hands passed through the methods always equal the trick's
/// starting hands minus what is on the table, so the table state (plus
/// stage) identifies a position completely and serves as the cache
/// key.
pub(crate) struct TrickSearch<'a> {
    nodes: &'a mut Vec<Node>,
    trump: Suit,
    /// Whether the side being optimized for attacks in this trick;
    /// fixed for the whole trick search, including toss decisions
    favored_attacks: bool,
    /// Remaining trick budget including the current trick
    depth: u32,
    cache: FxHashMap<StageKey, NodeId>,
}

impl<'a> TrickSearch<'a> {
    pub(crate) fn new(
        nodes: &'a mut Vec<Node>,
        trump: Suit,
        favored_attacks: bool,
        depth: u32,
    ) -> Self {
        TrickSearch {
            nodes,
            trump,
            favored_attacks,
            depth,
            cache: FxHashMap::default(),
        }
    }

    /// Attacker to move: play any card on an empty table, or a
    /// rank-matching card (or stop) on a nonempty one.
    pub(crate) fn attacker_turn(
        &mut self,
        attacker: CardSet,
        defender: CardSet,
        table: Table,
    ) -> NodeId {
        table.debug_check();
        let key = StageKey::new(table, STAGE_ATTACK);
        if let Some(&id) = self.cache.get(&key) {
            return id;
        }

        // End of game is decided by hand sizes alone, before any move
        // generation; the table does not matter.
        if let Some(v) = terminal_value(attacker, defender, self.favored_attacks) {
            let id = self.push(Node::Leaf(v));
            self.cache.insert(key, id);
            return id;
        }

        let candidates = if table.is_empty() {
            attacker
        } else {
            matching_by_rank(attacker, table.ranks())
        };

        let mut moves: Vec<(Move, NodeId)> = Vec::with_capacity(candidates.len() + 1);
        for card in candidates {
            let child =
                self.defender_turn(attacker.without(card), defender, table.with_attack(card), card);
            moves.push((Move::Attack(card), child));
        }
        if !table.is_empty() {
            // Stopping closes the trick in the defender's favor: the
            // table leaves play, roles swap for the next trick.
            let child = build_hand(
                self.nodes,
                self.trump,
                defender,
                attacker,
                !self.favored_attacks,
                self.depth - 1,
            );
            moves.push((Move::Stop, child));
        }

        let id = self.decide(table, true, moves);
        self.cache.insert(key, id);
        id
    }

    /// Defender to respond to `pending`: cover it or take.
    fn defender_turn(
        &mut self,
        attacker: CardSet,
        defender: CardSet,
        table: Table,
        pending: Card,
    ) -> NodeId {
        assert!(!defender.is_empty(), "defender has no cards to respond with");
        debug_assert!(table.attack.contains(pending));
        debug_assert_eq!(table.attack.len(), table.defense.len() + 1);

        let key = StageKey::new(table, STAGE_DEFEND + pending.index());
        if let Some(&id) = self.cache.get(&key) {
            return id;
        }

        let mut moves: Vec<(Move, NodeId)> = Vec::new();
        for card in beating_cards(defender, pending, self.trump) {
            let child = self.attacker_turn(attacker, defender.without(card), table.with_defense(card));
            moves.push((Move::Defend(card), child));
        }
        let child = self.toss_turn(attacker, defender, table);
        moves.push((Move::Take, child));

        let id = self.decide(table, false, moves);
        self.cache.insert(key, id);
        id
    }

    /// Attacker to toss extra matching cards after the defender gave
    /// up. Every subset of the eligible cards up to the cap is its own
    /// move; the defender then takes the whole table plus the toss.
    fn toss_turn(&mut self, attacker: CardSet, defender: CardSet, table: Table) -> NodeId {
        assert!(!defender.is_empty());
        let key = StageKey::new(table, STAGE_TOSS);
        if let Some(&id) = self.cache.get(&key) {
            return id;
        }

        let eligible: Vec<Card> = matching_by_rank(attacker, table.ranks()).iter().collect();
        // The defender already absorbs the failed card, so at most
        // hand-size-minus-one extras may be added.
        let limit = (defender.len() - 1).min(eligible.len());

        let subsets = toss_subsets(&eligible, limit);
        let mut moves: Vec<(Move, NodeId)> = Vec::with_capacity(subsets.len());
        for subset in subsets {
            let child = build_hand(
                self.nodes,
                self.trump,
                attacker.difference(subset),
                defender.union(table.all_cards()).union(subset),
                self.favored_attacks,
                self.depth - 1,
            );
            moves.push((Move::Toss(subset), child));
        }

        let id = self.decide(table, true, moves);
        self.cache.insert(key, id);
        id
    }

    /// Push a decision node, choosing the move that maximizes the
    /// estimate when the mover is the favored side and minimizes it
    /// otherwise.
    fn decide(&mut self, table: Table, mover_attacks: bool, moves: Vec<(Move, NodeId)>) -> NodeId {
        let maximize = mover_attacks == self.favored_attacks;
        let (best, estimate) = pick_best(self.nodes, &moves, maximize);
        self.push(Node::Decision(DecisionNode {
            table,
            mover_attacks,
            maximize,
            moves,
            best,
            estimate,
        }))
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}

/// All subsets of `cards` with at most `limit` elements, smallest
/// first, in a deterministic order.
fn toss_subsets(cards: &[Card], limit: usize) -> Vec<CardSet> {
    fn combinations(cards: &[Card], start: usize, left: usize, acc: CardSet, out: &mut Vec<CardSet>) {
        if left == 0 {
            out.push(acc);
            return;
        }
        for i in start..cards.len() {
            if cards.len() - i < left {
                break;
            }
            combinations(cards, i + 1, left - 1, acc.with(cards[i]), out);
        }
    }

    let mut subsets = Vec::new();
    for size in 0..=limit {
        combinations(cards, 0, size, CardSet::new(), &mut subsets);
    }
    subsets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(list: &[&str]) -> Vec<Card> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_toss_subsets_counts() {
        let eligible = cards(&["6C", "6D", "6S"]);
        // Sizes 0..=2: 1 + 3 + 3 subsets
        assert_eq!(toss_subsets(&eligible, 2).len(), 7);
        // Unlimited: the full power set
        assert_eq!(toss_subsets(&eligible, 3).len(), 8);
        // Cap zero: only the empty toss
        let only_empty = toss_subsets(&eligible, 0);
        assert_eq!(only_empty.len(), 1);
        assert!(only_empty[0].is_empty());
    }

    #[test]
    fn test_toss_subsets_are_distinct() {
        let eligible = cards(&["6C", "6D", "6S", "6H"]);
        let subsets = toss_subsets(&eligible, 4);
        assert_eq!(subsets.len(), 16);
        for (i, a) in subsets.iter().enumerate() {
            for b in subsets.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_terminal_value_rule() {
        let hand = CardSet::from_cards(&cards(&["6C"]));
        let other = CardSet::from_cards(&cards(&["7D"]));
        assert_eq!(terminal_value(hand, other, true), None);
        assert_eq!(terminal_value(CardSet::new(), CardSet::new(), true), Some(0.5));
        // Whoever empties their hand first wins
        assert_eq!(terminal_value(CardSet::new(), hand, true), Some(1.0));
        assert_eq!(terminal_value(CardSet::new(), hand, false), Some(0.0));
        assert_eq!(terminal_value(hand, CardSet::new(), true), Some(0.0));
        assert_eq!(terminal_value(hand, CardSet::new(), false), Some(1.0));
    }
}
