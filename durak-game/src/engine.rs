//! Turn-by-turn match engine.
//!
//! Drives two [`Player`]s through a full game: trick loop, toss-in
//! after a failed defense, replenishment from the stock and role
//! swapping. The engine owns the authoritative hands and validates
//! every returned move; an illegal move is a programming error in the
//! strategy and panics.

use tracing::{debug, trace};

use durak_core::{beats, CardSet, Deck, GameSetup, Suit, Table, HAND_SIZE};

use crate::player::Player;

/// Result of one match, from the first player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    FirstWins,
    SecondWins,
    Draw,
}

/// One running match between two players.
pub struct MatchRunner {
    players: [Box<dyn Player>; 2],
    hands: [CardSet; 2],
    stock: Deck,
    trump: Suit,
    /// Index of the player currently attacking
    attacker: usize,
    /// Cards that left play through survived tricks
    discarded: CardSet,
}

impl MatchRunner {
    /// Set up a match; the first player of `setup.hands[0]` leads.
    pub fn new(setup: GameSetup, first: Box<dyn Player>, second: Box<dyn Player>) -> Self {
        assert!(
            setup.hands[0].is_disjoint(setup.hands[1]),
            "dealt hands overlap"
        );
        MatchRunner {
            players: [first, second],
            hands: setup.hands,
            stock: setup.stock,
            trump: setup.trump,
            attacker: 0,
            discarded: CardSet::new(),
        }
    }

    /// Play the match to its end.
    pub fn run(mut self) -> MatchOutcome {
        loop {
            let survived = self.play_trick();
            self.replenish();
            self.debug_conservation();

            let defender = 1 - self.attacker;
            let attacker_out = self.hands[self.attacker].is_empty();
            let defender_out = self.hands[defender].is_empty();
            if attacker_out || defender_out {
                let outcome = if attacker_out && defender_out {
                    MatchOutcome::Draw
                } else {
                    // Emptying your hand first wins
                    let winner = if attacker_out { self.attacker } else { defender };
                    if winner == 0 {
                        MatchOutcome::FirstWins
                    } else {
                        MatchOutcome::SecondWins
                    }
                };
                debug!(?outcome, "match over");
                return outcome;
            }

            if survived {
                self.attacker = defender;
            }
        }
    }

    /// Play one trick. Returns true if the defender survived it.
    fn play_trick(&mut self) -> bool {
        let attacker = self.attacker;
        let defender = 1 - attacker;
        let mut table = Table::EMPTY;

        loop {
            if self.hands[defender].is_empty() {
                // Nothing left to attack; every card was covered
                self.discarded = self.discarded.union(table.all_cards());
                return true;
            }

            let card = self.players[attacker].attack(&table);
            self.players[defender].rival_attacked(card, &table);
            let card = match card {
                None => {
                    assert!(!table.is_empty(), "cannot stop an empty trick");
                    self.discarded = self.discarded.union(table.all_cards());
                    return true;
                }
                Some(card) => card,
            };

            assert!(
                self.hands[attacker].contains(card),
                "attacked with unheld card {card}"
            );
            assert!(
                table.is_empty() || table.ranks().contains(card.rank),
                "attack card {card} matches no rank on the table"
            );
            self.hands[attacker].remove(card);
            table = table.with_attack(card);
            trace!(%card, "attack");

            let response = self.players[defender].defend(card, &table);
            self.players[attacker].rival_defended(response, &table);
            match response {
                Some(cover) => {
                    assert!(
                        self.hands[defender].contains(cover),
                        "defended with unheld card {cover}"
                    );
                    assert!(
                        beats(cover, card, self.trump),
                        "{cover} does not beat {card}"
                    );
                    self.hands[defender].remove(cover);
                    table = table.with_defense(cover);
                    trace!(%cover, "defense");

                    if self.hands[attacker].is_empty() {
                        // Attacker spent their last card and it was
                        // covered; the trick is over
                        self.discarded = self.discarded.union(table.all_cards());
                        return true;
                    }
                }
                None => {
                    // Defender takes; the attacker may toss in extras
                    let limit = self.hands[defender].len() - 1;
                    let extra = self.players[attacker].toss(&table, limit);
                    assert!(
                        self.hands[attacker].includes(extra),
                        "tossed unheld cards {extra}"
                    );
                    assert!(extra.len() <= limit, "tossed more than the cap allows");
                    let ranks = table.ranks();
                    for tossed in extra {
                        assert!(
                            ranks.contains(tossed.rank),
                            "toss card {tossed} matches no rank on the table"
                        );
                    }
                    self.hands[attacker] = self.hands[attacker].difference(extra);
                    self.players[defender].rival_tossed(extra, &table);

                    let taken = table.all_cards().union(extra);
                    self.hands[defender] = self.hands[defender].union(taken);
                    self.players[defender].take(taken);
                    self.players[attacker].rival_took(taken);
                    trace!(cards = %taken, "defender takes");
                    return false;
                }
            }
        }
    }

    /// Refill both hands to six, attacker first.
    fn replenish(&mut self) {
        for index in [self.attacker, 1 - self.attacker] {
            let need = HAND_SIZE.saturating_sub(self.hands[index].len());
            let drawn = self.stock.draw(need);
            if drawn.is_empty() {
                continue;
            }
            for &card in &drawn {
                self.hands[index].insert(card);
            }
            self.players[index].draw(&drawn);
            self.players[1 - index].rival_drew(drawn.len());
        }
    }

    /// Every card is in exactly one place at all times.
    fn debug_conservation(&self) {
        debug_assert!(self.hands[0].is_disjoint(self.hands[1]));
        debug_assert!(self.discarded.is_disjoint(self.hands[0].union(self.hands[1])));
        debug_assert_eq!(
            self.hands[0].len() + self.hands[1].len() + self.discarded.len() + self.stock.len(),
            36,
            "cards leaked"
        );
    }
}
