//! Trick table state: the cards already placed in the current trick.

use std::fmt;

use crate::card::Card;
use crate::cardset::{CardSet, RankSet};

/// Cards on the table during one trick: attack cards and the defense
/// cards that covered them.
///
/// Invariant: the two sets are disjoint and `attack.len()` equals
/// `defense.len()` (balanced, attacker to move) or `defense.len() + 1`
/// (one attack card awaiting a response).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Table {
    pub attack: CardSet,
    pub defense: CardSet,
}

impl Table {
    /// Empty table at the start of a trick
    pub const EMPTY: Table = Table {
        attack: CardSet::new(),
        defense: CardSet::new(),
    };

    /// Check if no card has been placed yet
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attack.is_empty() && self.defense.is_empty()
    }

    /// Every attack card has been covered
    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.attack.len() == self.defense.len()
    }

    /// All cards on the table
    #[inline]
    pub fn all_cards(&self) -> CardSet {
        self.attack.union(self.defense)
    }

    /// Ranks present anywhere on the table
    #[inline]
    pub fn ranks(&self) -> RankSet {
        self.all_cards().ranks()
    }

    /// Table after one more attack card
    #[inline]
    pub fn with_attack(&self, card: Card) -> Table {
        Table {
            attack: self.attack.with(card),
            defense: self.defense,
        }
    }

    /// Table after one more defense card
    #[inline]
    pub fn with_defense(&self, card: Card) -> Table {
        Table {
            attack: self.attack,
            defense: self.defense.with(card),
        }
    }

    /// Assert the size and disjointness invariants (debug builds)
    #[inline]
    pub fn debug_check(&self) {
        debug_assert!(self.attack.is_disjoint(self.defense));
        debug_assert!(
            self.attack.len() == self.defense.len()
                || self.attack.len() == self.defense.len() + 1,
            "table shape violated: {} attack vs {} defense",
            self.attack.len(),
            self.defense.len()
        );
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Table[{:?} / {:?}]", self.attack, self.defense)
    }
}
