//! Card-tracking strategy with exact endgame search.
//!
//! Remembers every card shown and therefore knows, once the stock runs
//! dry, exactly which cards the rival holds. From that point on it
//! plays from a [`durak_solver`] tree: builds one at the first endgame
//! decision, follows its recorded best moves, steps it through both
//! sides' observed moves and deepens it between tricks while it stays
//! small enough. Before the endgame it plays a strength heuristic with
//! a hypergeometric bonus for cards the rival probably cannot beat.

use tracing::debug;

use durak_core::{
    beating_cards, beats, matching_by_rank_skipping_trump, strength, weakest, Card, CardSet, Suit,
    Table, DECK_SIZE, HAND_SIZE,
};
use durak_solver::{build, HandValue, Move, NodeId, Tree, MAX_DEPTH};

use crate::player::Player;

/// Node-count budget above which a tree is no longer deepened
const DEEPEN_BUDGET: usize = 5000;

enum Endgame {
    /// Stock still has cards: play heuristically
    Early,
    /// Stock just ran dry: build a tree at the next decision
    Ready,
    /// Navigating a built tree
    Active { tree: Tree, cursor: NodeId },
}

pub struct TrackingPlayer {
    trump: Suit,
    hand: CardSet,
    /// Cards certainly in the rival's hand (observed picked up)
    rival_known: CardSet,
    /// Cards not yet seen anywhere: in the stock or among the rival's
    /// unknowns
    unseen: CardSet,
    /// How many of the rival's cards come from `unseen`
    rival_unknown: usize,
    /// Cards left in the stock
    stock: usize,
    /// Trick budget for a fresh endgame tree
    depth: u32,
    endgame: Endgame,
}

impl TrackingPlayer {
    pub fn new(hand: CardSet, trump: Suit) -> Self {
        assert_eq!(hand.len(), HAND_SIZE, "a fresh hand holds six cards");
        TrackingPlayer {
            trump,
            hand,
            rival_known: CardSet::new(),
            unseen: CardSet::full_deck().difference(hand),
            rival_unknown: HAND_SIZE,
            stock: DECK_SIZE - 2 * HAND_SIZE,
            depth: MAX_DEPTH,
            endgame: Endgame::Early,
        }
    }

    /// Override the trick budget used for fresh endgame trees
    pub fn with_depth(mut self, depth: u32) -> Self {
        assert!(depth > 0);
        self.depth = depth;
        self
    }

    /// Account for a card leaving the rival's hand.
    fn rival_played(&mut self, card: Card) {
        if self.rival_known.contains(card) {
            self.rival_known.remove(card);
        } else {
            debug_assert!(self.unseen.contains(card), "card {card} shown twice");
            self.unseen.remove(card);
            self.rival_unknown -= 1;
        }
    }

    /// Once the last stock card is drawn the rival's hand is exactly
    /// the unseen remainder.
    fn on_stock_emptied(&mut self) {
        if self.stock == 0 && matches!(self.endgame, Endgame::Early) {
            self.rival_known = self.rival_known.union(self.unseen);
            self.unseen = CardSet::new();
            self.rival_unknown = 0;
            self.endgame = Endgame::Ready;
            debug!(rival = %self.rival_known, "stock exhausted, rival hand known");
        }
    }

    /// Step the tree through an observed or own move. A cursor that
    /// cannot advance (frontier reached without budget to deepen)
    /// drops back to `Ready` and a fresh tree is built at the next
    /// decision.
    fn advance_cursor(&mut self, mv: Move, deepen_after: bool) {
        let stale = match &mut self.endgame {
            Endgame::Active { tree, cursor } => match tree.advance(*cursor, mv) {
                Some(next) => {
                    *cursor = next;
                    if deepen_after && tree.len() < DEEPEN_BUDGET {
                        tree.deepen_from(next);
                    }
                    false
                }
                None => true,
            },
            _ => false,
        };
        if stale {
            self.endgame = Endgame::Ready;
        }
    }

    /// At the start of an own-lead trick: build, validate or deepen
    /// the tree.
    fn prepare_attack_tree(&mut self) {
        if matches!(self.endgame, Endgame::Ready) {
            let tree = build(self.hand, self.rival_known, true, self.depth, self.trump);
            debug!(
                nodes = tree.len(),
                estimate = tree.estimate(),
                "built endgame tree to lead"
            );
            let cursor = tree.root();
            self.endgame = Endgame::Active { tree, cursor };
            return;
        }

        let mut rebuild = false;
        if let Endgame::Active { tree, cursor } = &mut self.endgame {
            let stale = match tree.hand_node(*cursor) {
                Some(node) => {
                    debug_assert!(node.favored_attacks, "cursor says the rival leads");
                    debug_assert_eq!(node.attacker, self.hand, "tree lost track of our hand");
                    debug_assert_eq!(node.defender, self.rival_known);
                    !node.favored_attacks
                        || node.attacker != self.hand
                        || node.defender != self.rival_known
                        || matches!(node.value, HandValue::Heuristic(_))
                }
                None => true,
            };
            if stale {
                rebuild = true;
            } else if tree.len() < DEEPEN_BUDGET {
                tree.deepen_from(*cursor);
            }
        }
        if rebuild {
            let tree = build(self.hand, self.rival_known, true, self.depth, self.trump);
            let cursor = tree.root();
            self.endgame = Endgame::Active { tree, cursor };
        }
    }

    /// First endgame decision while defending: the trick already
    /// carries the rival's first card, so build from the trick start
    /// and step through it.
    fn prepare_defense_tree(&mut self, table: &Table) {
        debug_assert!(table.defense.is_empty() && table.attack.len() == 1);
        let rival_at_lead = self.rival_known.union(table.attack);
        let tree = build(rival_at_lead, self.hand, false, self.depth, self.trump);
        debug!(
            nodes = tree.len(),
            estimate = tree.estimate(),
            "built endgame tree to defend"
        );
        let pending = table.attack.iter().next().unwrap();
        let cursor = tree
            .advance(tree.root(), Move::Attack(pending))
            .expect("observed attack is a legal move of the fresh tree");
        self.endgame = Endgame::Active { tree, cursor };
    }

    /// Opening-card score: prefer weak cards, bumped by the chance the
    /// rival cannot beat them.
    fn choose_opening(&self) -> Option<Card> {
        if self.hand.is_empty() {
            return None;
        }
        let mut strengths: Vec<u8> = self.hand.iter().map(|c| strength(c, self.trump)).collect();
        strengths.sort_unstable();
        strengths.dedup();

        let goodness = |card: Card| -> f64 {
            if strengths.len() == 1 {
                return 0.0;
            }
            let granularity = 1.0 / (strengths.len() - 1) as f64;
            let rank = strengths
                .iter()
                .rev()
                .position(|&s| s == strength(card, self.trump))
                .unwrap();
            granularity * rank as f64
        };

        let mut best: Option<(Card, f64)> = None;
        for card in self.hand {
            let score = goodness(card) + self.unbeatable_bonus(card);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((card, score));
            }
        }
        best.map(|(card, _)| card)
    }

    /// Probability that no unseen card able to beat `card` has reached
    /// the rival's hand, counted only when the stock is nearly gone.
    fn unbeatable_bonus(&self, card: Card) -> f64 {
        if self
            .rival_known
            .iter()
            .any(|c| beats(c, card, self.trump))
        {
            return 0.0;
        }
        let blockers = self
            .unseen
            .iter()
            .filter(|&c| beats(c, card, self.trump))
            .count();
        if self.stock < blockers {
            return 0.0;
        }
        let mut p = 1.0;
        for i in 0..blockers {
            p *= (self.stock - i) as f64 / (self.rival_unknown + self.stock - i) as f64;
        }
        if self.stock <= 3 {
            2.0 * p
        } else {
            0.0
        }
    }

    fn debug_invariants(&self) {
        debug_assert!(self.hand.is_disjoint(self.rival_known));
        debug_assert!(self.hand.is_disjoint(self.unseen));
        debug_assert!(self.rival_known.is_disjoint(self.unseen));
        debug_assert_eq!(self.rival_unknown + self.stock, self.unseen.len());
    }
}

impl Player for TrackingPlayer {
    fn attack(&mut self, table: &Table) -> Option<Card> {
        self.debug_invariants();
        if table.is_empty() {
            self.prepare_attack_tree();
        }

        let mut planned: Option<Option<Card>> = None;
        if let Endgame::Active { tree, cursor } = &mut self.endgame {
            match tree.best_move(*cursor) {
                Some(mv @ Move::Attack(_)) | Some(mv @ Move::Stop) => {
                    let next = tree.advance(*cursor, mv).expect("best move has a child");
                    *cursor = next;
                    planned = Some(match mv {
                        Move::Attack(card) => Some(card),
                        _ => None,
                    });
                }
                other => debug_assert!(other.is_none(), "attack cursor out of sync: {other:?}"),
            }
        }
        if let Some(choice) = planned {
            if let Some(card) = choice {
                self.hand.remove(card);
            }
            return choice;
        }

        // Heuristic play: pick an opener, or continue with the weakest
        // matching non-trump card
        let card = if table.is_empty() {
            self.choose_opening()
        } else {
            weakest(
                matching_by_rank_skipping_trump(self.hand, table.ranks(), self.trump),
                self.trump,
            )
        };
        if let Some(card) = card {
            self.hand.remove(card);
        }
        card
    }

    fn defend(&mut self, attack: Card, table: &Table) -> Option<Card> {
        self.debug_invariants();
        if matches!(self.endgame, Endgame::Ready) {
            self.prepare_defense_tree(table);
        }

        let mut planned: Option<Option<Card>> = None;
        if let Endgame::Active { tree, cursor } = &mut self.endgame {
            match tree.best_move(*cursor) {
                Some(mv @ Move::Defend(_)) | Some(mv @ Move::Take) => {
                    let next = tree.advance(*cursor, mv).expect("best move has a child");
                    *cursor = next;
                    planned = Some(match mv {
                        Move::Defend(card) => Some(card),
                        _ => None,
                    });
                }
                other => debug_assert!(false, "defense cursor out of sync: {other:?}"),
            }
        }
        if let Some(choice) = planned {
            if let Some(card) = choice {
                self.hand.remove(card);
            }
            return choice;
        }

        let cover = weakest(beating_cards(self.hand, attack, self.trump), self.trump);
        if let Some(card) = cover {
            self.hand.remove(card);
        }
        cover
    }

    fn toss(&mut self, table: &Table, limit: usize) -> CardSet {
        self.debug_invariants();

        let mut planned: Option<CardSet> = None;
        if let Endgame::Active { tree, cursor } = &mut self.endgame {
            match tree.best_move(*cursor) {
                Some(mv @ Move::Toss(_)) => {
                    let next = tree.advance(*cursor, mv).expect("best move has a child");
                    *cursor = next;
                    if let Move::Toss(cards) = mv {
                        debug_assert!(cards.len() <= limit);
                        planned = Some(cards);
                    }
                }
                other => debug_assert!(false, "toss cursor out of sync: {other:?}"),
            }
        }
        if let Some(cards) = planned {
            self.hand = self.hand.difference(cards);
            return cards;
        }

        let eligible = matching_by_rank_skipping_trump(self.hand, table.ranks(), self.trump);
        let mut cards: Vec<Card> = eligible.iter().collect();
        cards.sort_by_key(|&c| strength(c, self.trump));
        cards.truncate(limit);
        let chosen: CardSet = cards.into_iter().collect();
        self.hand = self.hand.difference(chosen);
        chosen
    }

    fn rival_attacked(&mut self, card: Option<Card>, table: &Table) {
        self.debug_invariants();
        if let Some(card) = card {
            self.rival_played(card);
        }
        let mv = match card {
            Some(card) => Move::Attack(card),
            None => Move::Stop,
        };
        // A trick-opening attack is where the tree gets one trick
        // deeper, like on our own leads
        self.advance_cursor(mv, table.is_empty());
    }

    fn rival_defended(&mut self, card: Option<Card>, _table: &Table) {
        self.debug_invariants();
        if let Some(card) = card {
            self.rival_played(card);
        }
        let mv = match card {
            Some(card) => Move::Defend(card),
            None => Move::Take,
        };
        self.advance_cursor(mv, false);
    }

    fn rival_tossed(&mut self, cards: CardSet, _table: &Table) {
        self.debug_invariants();
        for card in cards {
            self.rival_played(card);
        }
        self.advance_cursor(Move::Toss(cards), false);
    }

    fn rival_took(&mut self, cards: CardSet) {
        self.debug_invariants();
        debug_assert!(cards.is_disjoint(self.hand));
        debug_assert!(cards.is_disjoint(self.unseen));
        self.rival_known = self.rival_known.union(cards);
    }

    fn rival_drew(&mut self, count: usize) {
        self.debug_invariants();
        debug_assert!(count <= self.stock);
        self.rival_unknown += count;
        self.stock -= count;
        self.on_stock_emptied();
    }

    fn take(&mut self, cards: CardSet) {
        self.debug_invariants();
        debug_assert!(cards.is_disjoint(self.hand));
        self.hand = self.hand.union(cards);
    }

    fn draw(&mut self, cards: &[Card]) {
        self.debug_invariants();
        for &card in cards {
            debug_assert!(self.unseen.contains(card), "drew a seen card {card}");
            self.unseen.remove(card);
            self.hand.insert(card);
        }
        self.stock -= cards.len();
        self.on_stock_emptied();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(cards: &[&str]) -> CardSet {
        cards.iter().map(|s| s.parse::<Card>().unwrap()).collect()
    }

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    #[test]
    fn test_opens_with_weakest_card_early() {
        // The unbeatable bonus is gated on a nearly-empty stock, so a
        // fresh player leads its weakest card
        let mut player =
            TrackingPlayer::new(set(&["AC", "7D", "6H", "KS", "9S", "7C"]), Suit::Hearts);
        assert_eq!(player.attack(&Table::EMPTY), Some(card("7C")));
    }

    #[test]
    fn test_tracks_rival_cards_through_take() {
        let mut player =
            TrackingPlayer::new(set(&["AC", "7D", "6H", "KS", "9S", "7C"]), Suit::Hearts);
        let taken = set(&["TC", "TS"]);
        player.rival_took(taken);
        assert_eq!(player.rival_known, taken);

        // Rival later plays one of those cards: it leaves the tracked
        // hand, not the unseen pool
        let unseen_before = player.unseen.len();
        player.rival_played(card("TC"));
        assert_eq!(player.rival_known, set(&["TS"]));
        assert_eq!(player.unseen.len(), unseen_before);
    }

    #[test]
    fn test_rival_hand_is_exact_when_stock_empties() {
        let mut player =
            TrackingPlayer::new(set(&["AC", "7D", "6H", "KS", "9S", "7C"]), Suit::Hearts);

        // Everything but the two hands flows through the stock
        let mut drawn = 0;
        while drawn < DECK_SIZE - 2 * HAND_SIZE {
            player.rival_drew(1);
            drawn += 1;
        }

        assert_eq!(player.rival_unknown, 0);
        assert_eq!(player.unseen, CardSet::new());
        // Rival holds the whole rest of the deck
        assert_eq!(player.rival_known.len(), DECK_SIZE - HAND_SIZE);
        assert!(player.rival_known.is_disjoint(player.hand));
    }
}
