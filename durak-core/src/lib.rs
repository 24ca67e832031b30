mod card;
mod cardset;
mod deck;
mod rules;
mod table;

pub use card::{Card, ParseCardError, Rank, Suit, DECK_SIZE, NUM_RANKS, NUM_SUITS};
pub use cardset::{CardSet, CardSetIter, RankSet};
pub use deck::{Deck, GameSetup, HAND_SIZE};
pub use rules::{
    beating_cards, beats, matching_by_rank, matching_by_rank_skipping_trump, strength, weakest,
};
pub use table::Table;
