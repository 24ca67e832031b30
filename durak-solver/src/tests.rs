//! Endgame scenarios with known game values, determinism and
//! deepening properties.

use durak_core::{Card, CardSet, Suit};

use crate::tree::{HandValue, Node};
use crate::{build, Move};

fn set(cards: &[&str]) -> CardSet {
    cards.iter().map(|s| s.parse::<Card>().unwrap()).collect()
}

struct Scenario {
    name: &'static str,
    attacker: &'static [&'static str],
    defender: &'static [&'static str],
    favored_attacks: bool,
    depth: u32,
    expected: f64,
}

// Trump is hearts throughout.
const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "lone trump always defends",
        attacker: &["TC", "8D"],
        defender: &["6H"],
        favored_attacks: true,
        depth: 3,
        expected: 0.0,
    },
    Scenario {
        name: "single equal exchange is a draw",
        attacker: &["TC"],
        defender: &["JC"],
        favored_attacks: true,
        depth: 3,
        expected: 0.5,
    },
    Scenario {
        name: "ace against lone trump is a draw",
        attacker: &["AC"],
        defender: &["6H"],
        favored_attacks: true,
        depth: 3,
        expected: 0.5,
    },
    Scenario {
        name: "higher club grinds the nine down",
        attacker: &["TC"],
        defender: &["9C"],
        favored_attacks: true,
        depth: 4,
        expected: 1.0,
    },
    Scenario {
        name: "attacker unloads through a lone seven",
        attacker: &["6C", "8C", "9C", "8H"],
        defender: &["7C"],
        favored_attacks: true,
        depth: 4,
        expected: 1.0,
    },
    Scenario {
        name: "unfavored attacker empties out first",
        attacker: &["TS"],
        defender: &["9C"],
        favored_attacks: false,
        depth: 3,
        expected: 0.0,
    },
    Scenario {
        name: "favored defender spends its cover and exits",
        attacker: &["9C", "6C"],
        defender: &["TC"],
        favored_attacks: false,
        depth: 3,
        expected: 1.0,
    },
    Scenario {
        name: "unfavored attacker unloads through a lone seven",
        attacker: &["7C"],
        defender: &["6C", "8C", "9C", "8H"],
        favored_attacks: false,
        depth: 4,
        expected: 0.0,
    },
];

#[test]
fn test_known_endgames() {
    for scenario in SCENARIOS {
        let tree = build(
            set(scenario.attacker),
            set(scenario.defender),
            scenario.favored_attacks,
            scenario.depth,
            Suit::Hearts,
        );
        assert_eq!(
            tree.estimate(),
            scenario.expected,
            "{}: expected {}, got {}",
            scenario.name,
            scenario.expected,
            tree.estimate()
        );
    }
}

#[test]
fn test_terminal_positions_need_no_search() {
    let empty = CardSet::new();
    let hand = set(&["AC", "7D"]);

    assert_eq!(build(empty, empty, true, 3, Suit::Hearts).estimate(), 0.5);
    assert_eq!(build(empty, hand, true, 3, Suit::Hearts).estimate(), 1.0);
    assert_eq!(build(hand, empty, true, 3, Suit::Hearts).estimate(), 0.0);
    assert_eq!(build(empty, hand, false, 3, Suit::Hearts).estimate(), 0.0);
    assert_eq!(build(hand, empty, false, 3, Suit::Hearts).estimate(), 1.0);

    // Terminal trees are a single node regardless of budget
    assert_eq!(build(empty, hand, true, 0, Suit::Hearts).len(), 1);
}

#[test]
fn test_build_is_deterministic() {
    let attacker = set(&["TC", "8D", "6H", "KS"]);
    let defender = set(&["JC", "9D", "QH", "7S"]);

    let a = build(attacker, defender, true, 2, Suit::Hearts);
    let b = build(attacker, defender, true, 2, Suit::Hearts);

    assert_eq!(a.estimate(), b.estimate());
    assert_eq!(a.len(), b.len());
    assert_eq!(a.best_move(a.root()), b.best_move(b.root()));
}

#[test]
fn test_estimates_stay_probabilities() {
    let attacker = set(&["TC", "8D", "6H", "KS", "9S", "7C"]);
    let defender = set(&["JC", "9D", "QH", "7S", "AD", "8C"]);
    let tree = build(attacker, defender, true, 2, Suit::Hearts);
    let p = tree.estimate();
    assert!((0.0..=1.0).contains(&p), "estimate out of range: {p}");
}

#[test]
fn test_deepen_keeps_exact_values() {
    // Two cards resolve within the budget: every leaf is terminal, so
    // deepening must be a no-op on the estimate.
    let mut tree = build(set(&["TC"]), set(&["9C"]), true, 4, Suit::Hearts);
    assert_eq!(tree.estimate(), 1.0);
    let nodes_before = tree.len();
    tree.deepen();
    assert_eq!(tree.estimate(), 1.0);
    assert_eq!(tree.len(), nodes_before);
}

#[test]
fn test_deepen_matches_deeper_build() {
    // Expanding the frontier one trick at a time must agree with a
    // tree built deeper from the start.
    let attacker = set(&["TC", "8D", "KS"]);
    let defender = set(&["JC", "9D", "7S"]);

    let mut shallow = build(attacker, defender, true, 1, Suit::Hearts);
    shallow.deepen();
    shallow.deepen();
    let deep = build(attacker, defender, true, 3, Suit::Hearts);

    assert_eq!(shallow.estimate(), deep.estimate());
}

#[test]
fn test_deepen_expands_only_frontier_leaves() {
    let attacker = set(&["TC", "8D", "KS"]);
    let defender = set(&["JC", "9D", "7S"]);
    let mut tree = build(attacker, defender, true, 1, Suit::Hearts);

    let heuristic_leaves = |tree: &crate::Tree| {
        (0..tree.len())
            .filter(|&id| {
                matches!(
                    tree.node(id),
                    Node::Hand(h) if matches!(h.value, HandValue::Heuristic(_))
                )
            })
            .count()
    };

    let frontier_before = heuristic_leaves(&tree);
    assert!(frontier_before > 0, "depth-1 tree should have a frontier");

    let nodes_before = tree.len();
    tree.deepen();
    assert!(tree.len() > nodes_before);

    // Every old frontier leaf is now expanded or, if it could not be
    // (that never happens here), still heuristic; terminal leaves are
    // untouched either way.
    for id in 0..nodes_before {
        if let Node::Hand(h) = tree.node(id) {
            assert!(
                !matches!(h.value, HandValue::Heuristic(_)),
                "frontier leaf {id} survived deepening"
            );
        }
    }
}

#[test]
fn test_tree_navigation_follows_recorded_moves() {
    let tree = build(set(&["TC", "8D"]), set(&["6H"]), true, 3, Suit::Hearts);

    let root = tree.root();
    let best = tree.best_move(root).expect("searched root has a best move");
    assert!(matches!(best, Move::Attack(_)));

    // Following the recorded move reaches the defender's decision
    let after_attack = tree.advance(root, best).expect("child exists");
    let defense = tree.best_move(after_attack).expect("defender decides");
    assert_eq!(defense, Move::Defend("6H".parse().unwrap()));

    // A move that was never legal has no child
    let bogus = Move::Attack("AS".parse().unwrap());
    assert_eq!(tree.advance(root, bogus), None);
}

#[test]
fn test_attacker_may_stop_only_on_nonempty_table() {
    // Root decision of any searched trick is over an empty table, so
    // no Stop can be among its moves.
    let tree = build(set(&["TC", "TS"]), set(&["JC", "JS"]), true, 2, Suit::Hearts);
    match tree.node(tree.enter(tree.root())) {
        Node::Decision(d) => {
            assert!(d.moves.iter().all(|(m, _)| !matches!(m, Move::Stop)));
            assert_eq!(d.moves.len(), 2, "one move per attack card, no stop");
        }
        other => panic!("root should be a decision, got {other:?}"),
    }
}

#[test]
fn test_toss_cap_respects_defender_hand() {
    // Defender holds two cards and fails to cover a six; the attacker
    // holds three more sixes but may toss at most one extra card.
    let tree = build(
        set(&["6C", "6D", "6S", "6H"]),
        set(&["7C", "7D"]),
        true,
        1,
        Suit::Hearts,
    );

    let root = tree.enter(tree.root());
    let moves = match tree.node(root) {
        Node::Decision(d) => d.moves.clone(),
        other => panic!("expected decision, got {other:?}"),
    };

    for (mv, child) in moves {
        assert!(matches!(mv, Move::Attack(_)), "unexpected root move {mv:?}");
        let take = tree
            .advance(child, Move::Take)
            .expect("defender can always take");
        if let Node::Decision(d) = tree.node(take) {
            // Empty toss plus one single-card toss per remaining six
            for (mv, _) in &d.moves {
                match mv {
                    Move::Toss(cards) => assert!(cards.len() <= 1),
                    other => panic!("unexpected toss-stage move {other:?}"),
                }
            }
        } else {
            panic!("take should lead to the toss decision");
        }
    }
}
