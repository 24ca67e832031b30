//! The interface the match engine drives strategies through.

use durak_core::{Card, CardSet, Table};

/// One side of a match.
///
/// Decision methods are called when it is this player's turn; the
/// `rival_*` callbacks report every opponent action so a strategy can
/// track cards. Implementations own their hand state: the engine
/// validates moves against its authoritative copy and panics on
/// disagreement rather than repairing it.
pub trait Player {
    /// Choose the next attack card, or `None` to stop the trick.
    /// Stopping is only legal on a nonempty table.
    fn attack(&mut self, table: &Table) -> Option<Card>;

    /// Respond to `attack` (already on the table as the pending card):
    /// a beating card, or `None` to take.
    fn defend(&mut self, attack: Card, table: &Table) -> Option<Card>;

    /// After the defender gave up: extra cards to toss in, at most
    /// `limit` of them, all matching a rank on the table.
    fn toss(&mut self, table: &Table, limit: usize) -> CardSet;

    /// The rival placed an attack card, or stopped the trick (`None`).
    /// `table` is the state before the card lands.
    fn rival_attacked(&mut self, _card: Option<Card>, _table: &Table) {}

    /// The rival covered the pending card, or gave up (`None`).
    fn rival_defended(&mut self, _card: Option<Card>, _table: &Table) {}

    /// The rival tossed extra cards after our failed defense.
    fn rival_tossed(&mut self, _cards: CardSet, _table: &Table) {}

    /// The rival picked up the whole table (plus toss).
    fn rival_took(&mut self, _cards: CardSet) {}

    /// The rival drew from the stock.
    fn rival_drew(&mut self, _count: usize) {}

    /// We picked up the whole table (plus toss).
    fn take(&mut self, cards: CardSet);

    /// We drew from the stock.
    fn draw(&mut self, cards: &[Card]);
}
