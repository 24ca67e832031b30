//! Closed-form estimate of how two hands relate.

use durak_core::{strength, CardSet, Suit, DECK_SIZE};

/// Estimate the winning chances of two disjoint hands without search.
///
/// Returns `(p_a, p_b)` with `p_a + p_b == 1.0`. Cards from both hands
/// are grouped by strength and walked from strongest to weakest; each
/// pair of opposing cards contributes to the side whose card was
/// already seen when the other side's card first appears. Two empty or
/// perfectly matched hands come out as `(0.5, 0.5)`.
pub fn hand_relation(a: CardSet, b: CardSet, trump: Suit) -> (f64, f64) {
    debug_assert!(a.is_disjoint(b), "hands overlap: {a} vs {b}");

    // Non-trump cards of equal rank share a strength, so a group can
    // hold cards from both sides at once.
    let mut groups = [(0u32, 0u32); DECK_SIZE];
    for card in a {
        groups[strength(card, trump) as usize].0 += 1;
    }
    for card in b {
        groups[strength(card, trump) as usize].1 += 1;
    }

    let (mut seen_a, mut seen_b) = (0u32, 0u32);
    let (mut p_a, mut p_b) = (0u32, 0u32);
    for s in (0..DECK_SIZE).rev() {
        let (new_a, new_b) = groups[s];
        p_a += seen_a * new_b;
        p_b += seen_b * new_a;
        seen_a += new_a;
        seen_b += new_b;
    }

    if p_a + p_b == 0 {
        (0.5, 0.5)
    } else {
        let total = (p_a + p_b) as f64;
        (p_a as f64 / total, p_b as f64 / total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use durak_core::Card;

    fn set(cards: &[&str]) -> CardSet {
        cards.iter().map(|s| s.parse::<Card>().unwrap()).collect()
    }

    #[test]
    fn test_empty_hands_are_even() {
        assert_eq!(
            hand_relation(CardSet::new(), CardSet::new(), Suit::Spades),
            (0.5, 0.5)
        );
    }

    #[test]
    fn test_dominant_hand() {
        let (p1, p2) = hand_relation(set(&["TH"]), set(&["9H"]), Suit::Spades);
        assert_eq!((p1, p2), (1.0, 0.0));

        let (p1, p2) = hand_relation(set(&["AH", "QH"]), set(&["8D"]), Suit::Spades);
        assert_eq!((p1, p2), (1.0, 0.0));
    }

    #[test]
    fn test_interleaved_hands() {
        let (p1, p2) = hand_relation(set(&["AH", "QH"]), set(&["KD", "JD"]), Suit::Spades);
        assert_eq!((p1, p2), (0.75, 0.25));

        let (p1, p2) = hand_relation(set(&["AH", "QH"]), set(&["KD"]), Suit::Spades);
        assert_eq!((p1, p2), (0.5, 0.5));
    }

    #[test]
    fn test_sums_to_one_and_symmetric() {
        let a = set(&["AH", "7C", "9D", "6S"]);
        let b = set(&["KH", "TC", "QD"]);
        let (p1, p2) = hand_relation(a, b, Suit::Clubs);
        assert!(p1 >= 0.0 && p2 >= 0.0);
        assert!((p1 + p2 - 1.0).abs() < 1e-12);

        let (q1, q2) = hand_relation(b, a, Suit::Clubs);
        assert_eq!((p1, p2), (q2, q1));
    }

    #[test]
    fn test_equal_rank_cards_cancel() {
        // Same strength on both sides: neither dominates
        let (p1, p2) = hand_relation(set(&["TC"]), set(&["TD"]), Suit::Hearts);
        assert_eq!((p1, p2), (0.5, 0.5));
    }
}
