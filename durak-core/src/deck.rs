//! Deck shuffling and the initial deal.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::card::{Card, Suit};
use crate::cardset::CardSet;

/// Cards each player holds up to between tricks
pub const HAND_SIZE: usize = 6;

/// The draw pile, face down; cards are drawn from the back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Full 36-card deck in index order
    pub fn standard() -> Self {
        let cards = (0..36).map(|i| Card::from_index(i).unwrap()).collect();
        Deck { cards }
    }

    /// Full deck in random order
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.cards.shuffle(rng);
        deck
    }

    /// Draw up to `n` cards
    pub fn draw(&mut self, n: usize) -> Vec<Card> {
        let n = n.min(self.cards.len());
        self.cards.split_off(self.cards.len() - n)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

/// Immutable snapshot of a fresh game: two disjoint hands, the rest of
/// the deck, and the trump suit fixed for the whole game.
#[derive(Debug, Clone)]
pub struct GameSetup {
    pub hands: [CardSet; 2],
    pub stock: Deck,
    pub trump: Suit,
}

impl GameSetup {
    /// Shuffle, pick a random trump and deal both starting hands.
    pub fn deal<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let trump = Suit::ALL[rng.gen_range(0..Suit::ALL.len())];
        Self::deal_with_trump(rng, trump)
    }

    /// Deal with a fixed trump suit.
    pub fn deal_with_trump<R: Rng + ?Sized>(rng: &mut R, trump: Suit) -> Self {
        let mut stock = Deck::shuffled(rng);
        let first: CardSet = stock.draw(HAND_SIZE).into_iter().collect();
        let second: CardSet = stock.draw(HAND_SIZE).into_iter().collect();
        GameSetup {
            hands: [first, second],
            stock,
            trump,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_standard_deck_has_36_unique_cards() {
        let deck = Deck::standard();
        let set: CardSet = deck.cards().iter().copied().collect();
        assert_eq!(set.len(), 36);
    }

    #[test]
    fn test_seeded_shuffle_is_deterministic() {
        let a = Deck::shuffled(&mut StdRng::seed_from_u64(42));
        let b = Deck::shuffled(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        let c = Deck::shuffled(&mut StdRng::seed_from_u64(43));
        assert_ne!(a, c);
    }

    #[test]
    fn test_draw_exhausts() {
        let mut deck = Deck::standard();
        let drawn = deck.draw(30);
        assert_eq!(drawn.len(), 30);
        assert_eq!(deck.len(), 6);
        let rest = deck.draw(10);
        assert_eq!(rest.len(), 6);
        assert!(deck.is_empty());
    }

    #[test]
    fn test_deal_is_consistent() {
        let setup = GameSetup::deal(&mut StdRng::seed_from_u64(7));
        assert_eq!(setup.hands[0].len(), HAND_SIZE);
        assert_eq!(setup.hands[1].len(), HAND_SIZE);
        assert!(setup.hands[0].is_disjoint(setup.hands[1]));
        assert_eq!(setup.stock.len(), 36 - 2 * HAND_SIZE);

        // No card dealt twice
        let mut seen: CardSet = setup.hands[0].union(setup.hands[1]);
        for &card in setup.stock.cards() {
            assert!(!seen.contains(card));
            seen.insert(card);
        }
        assert_eq!(seen.len(), 36);
    }
}
