//! Baseline strategy: always spend the weakest card that works.

use durak_core::{
    beating_cards, matching_by_rank, matching_by_rank_skipping_trump, strength, weakest, Card,
    CardSet, Suit, Table,
};

use crate::player::Player;

/// Plays the weakest legal card everywhere, beats with the weakest
/// beating card, and tosses weakest-first. No memory of anything.
#[derive(Debug, Clone)]
pub struct GreedyPlayer {
    trump: Suit,
    hand: CardSet,
    /// Whether trump cards may be thrown in after a failed defense
    toss_trumps: bool,
}

impl GreedyPlayer {
    pub fn new(hand: CardSet, trump: Suit) -> Self {
        GreedyPlayer {
            trump,
            hand,
            toss_trumps: false,
        }
    }

    /// Allow spending trumps as toss-in cards
    pub fn tossing_trumps(mut self) -> Self {
        self.toss_trumps = true;
        self
    }

    fn play(&mut self, candidates: CardSet) -> Option<Card> {
        let card = weakest(candidates, self.trump)?;
        self.hand.remove(card);
        Some(card)
    }
}

impl Player for GreedyPlayer {
    fn attack(&mut self, table: &Table) -> Option<Card> {
        if table.is_empty() {
            self.play(self.hand)
        } else {
            self.play(matching_by_rank(self.hand, table.ranks()))
        }
    }

    fn defend(&mut self, attack: Card, _table: &Table) -> Option<Card> {
        self.play(beating_cards(self.hand, attack, self.trump))
    }

    fn toss(&mut self, table: &Table, limit: usize) -> CardSet {
        let eligible = if self.toss_trumps {
            matching_by_rank(self.hand, table.ranks())
        } else {
            matching_by_rank_skipping_trump(self.hand, table.ranks(), self.trump)
        };
        let mut cards: Vec<Card> = eligible.iter().collect();
        cards.sort_by_key(|&c| strength(c, self.trump));
        cards.truncate(limit);
        let chosen: CardSet = cards.into_iter().collect();
        self.hand = self.hand.difference(chosen);
        chosen
    }

    fn take(&mut self, cards: CardSet) {
        self.hand = self.hand.union(cards);
    }

    fn draw(&mut self, cards: &[Card]) {
        for &card in cards {
            self.hand.insert(card);
        }
    }
}
