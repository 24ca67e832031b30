//! Beating and strength rules
//!
//! All functions take the trump suit explicitly; nothing here reads
//! ambient state. `beats` only answers for a specific ordered pair of
//! cards and does not induce a total order across suits.

use crate::card::{Card, Suit, NUM_RANKS, NUM_SUITS};
use crate::cardset::{CardSet, RankSet};

/// Check whether `a` beats `b` under the given trump suit.
///
/// Same suit: higher rank wins. Different suits: only a trump beats a
/// non-trump; two non-trump cards of different suits never beat each
/// other in either direction.
#[inline]
pub fn beats(a: Card, b: Card, trump: Suit) -> bool {
    if a.suit == b.suit {
        a.rank > b.rank
    } else {
        a.suit == trump
    }
}

/// Ordinal strength of a card: how many distinct cards could beat it.
///
/// Non-trump cards of equal rank share a strength; trump strengths sit
/// above every non-trump strength. Used as a sort and selection key
/// only, never for legality.
#[inline]
pub fn strength(card: Card, trump: Suit) -> u8 {
    let offset = card.rank.offset();
    if card.suit != trump {
        offset * (NUM_SUITS as u8 - 1)
    } else {
        NUM_RANKS as u8 * (NUM_SUITS as u8 - 1) + offset
    }
}

/// Cards from `cards` whose rank appears in `ranks`
#[inline]
pub fn matching_by_rank(cards: CardSet, ranks: RankSet) -> CardSet {
    cards.matching_ranks(ranks)
}

/// Like [`matching_by_rank`], with trump-suited cards removed first.
/// Used by heuristic players that refuse to throw trumps away.
#[inline]
pub fn matching_by_rank_skipping_trump(cards: CardSet, ranks: RankSet, trump: Suit) -> CardSet {
    cards.without_suit(trump).matching_ranks(ranks)
}

/// Cards in `cards` that beat `target`
pub fn beating_cards(cards: CardSet, target: Card, trump: Suit) -> CardSet {
    cards
        .iter()
        .filter(|&c| beats(c, target, trump))
        .collect()
}

/// The weakest card of a set by strength, if any
pub fn weakest(cards: CardSet, trump: Suit) -> Option<Card> {
    cards.iter().min_by_key(|&c| strength(c, trump))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Rank;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    #[test]
    fn test_beats_same_suit() {
        assert!(beats(card("TC"), card("9C"), Suit::Hearts));
        assert!(!beats(card("9C"), card("TC"), Suit::Hearts));
        assert!(!beats(card("TC"), card("TC"), Suit::Hearts));
    }

    #[test]
    fn test_beats_trump() {
        // The lone six of trumps beats any non-trump ace
        assert!(beats(card("6H"), card("AC"), Suit::Hearts));
        assert!(!beats(card("AC"), card("6H"), Suit::Hearts));
        // Within the trump suit, rank still decides
        assert!(beats(card("7H"), card("6H"), Suit::Hearts));
    }

    #[test]
    fn test_beats_is_not_total() {
        // Two non-trump cards of different suits: neither beats the other
        assert!(!beats(card("AC"), card("6D"), Suit::Hearts));
        assert!(!beats(card("6D"), card("AC"), Suit::Hearts));
    }

    #[test]
    fn test_strength_values() {
        // Lowest non-trump card: nothing weaker
        assert_eq!(strength(card("6C"), Suit::Hearts), 0);
        // Non-trump cards of equal rank share a strength
        assert_eq!(
            strength(card("TC"), Suit::Hearts),
            strength(card("TS"), Suit::Hearts)
        );
        // Trump strengths sit above every non-trump strength
        assert_eq!(strength(card("6H"), Suit::Hearts), 27);
        assert_eq!(strength(card("AH"), Suit::Hearts), 35);
        assert!(strength(card("6H"), Suit::Hearts) > strength(card("AC"), Suit::Hearts));
    }

    #[test]
    fn test_matching_skips_trump() {
        let cards = CardSet::from_cards(&[card("TC"), card("TH"), card("6S")]);
        let mut ranks = RankSet::new();
        ranks.insert(Rank::Ten);
        assert_eq!(matching_by_rank(cards, ranks).len(), 2);
        let no_trump = matching_by_rank_skipping_trump(cards, ranks, Suit::Hearts);
        assert_eq!(no_trump.len(), 1);
        assert!(no_trump.contains(card("TC")));
    }

    #[test]
    fn test_beating_cards() {
        let hand = CardSet::from_cards(&[card("9C"), card("JC"), card("6H"), card("8D")]);
        let beating = beating_cards(hand, card("TC"), Suit::Hearts);
        assert_eq!(beating.len(), 2);
        assert!(beating.contains(card("JC")));
        assert!(beating.contains(card("6H")));
    }

    #[test]
    fn test_weakest() {
        let hand = CardSet::from_cards(&[card("AC"), card("7D"), card("6H")]);
        // The trump six is stronger than the non-trump ace
        assert_eq!(weakest(hand, Suit::Hearts), Some(card("7D")));
        assert_eq!(weakest(CardSet::new(), Suit::Hearts), None);
    }
}
