//! Batch simulator: run many durak matches and tally the outcomes.
//!
//! Matches are independent, so they fan out over a rayon pool; each
//! match derives its own RNG seed from the base seed and its index,
//! which keeps every tally reproducible at any thread count.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use durak_core::GameSetup;
use durak_game::{GreedyPlayer, MatchOutcome, MatchRunner, Player, TrackingPlayer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Weakest-card baseline
    Greedy,
    /// Card counting plus exact endgame search
    Tracking,
}

impl Strategy {
    fn create(self, hand: durak_core::CardSet, trump: durak_core::Suit) -> Box<dyn Player> {
        match self {
            Strategy::Greedy => Box::new(GreedyPlayer::new(hand, trump)),
            Strategy::Tracking => Box::new(TrackingPlayer::new(hand, trump)),
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "durak-sim",
    about = "Deterministic batch simulator for durak strategies"
)]
struct Args {
    /// Number of matches to play
    #[arg(short = 'n', long, default_value = "100")]
    matches: u64,

    /// Base RNG seed; match i uses seed + i
    #[arg(short, long, default_value = "212")]
    seed: u64,

    /// Strategy leading the first trick
    #[arg(long, value_enum, default_value = "greedy")]
    first: Strategy,

    /// Strategy of the second player
    #[arg(long, value_enum, default_value = "tracking")]
    second: Strategy,

    /// Worker threads (0 = one per core)
    #[arg(short, long, default_value = "0")]
    threads: usize,

    /// Emit the summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    matches: u64,
    seed: u64,
    first: String,
    second: String,
    first_wins: u64,
    draws: u64,
    second_wins: u64,
    elapsed_secs: f64,
}

fn play_match(seed: u64, first: Strategy, second: Strategy) -> MatchOutcome {
    let setup = GameSetup::deal(&mut StdRng::seed_from_u64(seed));
    let p1 = first.create(setup.hands[0], setup.trump);
    let p2 = second.create(setup.hands[1], setup.trump);
    MatchRunner::new(setup, p1, p2).run()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .ok();
    }

    let start = std::time::Instant::now();
    let outcomes: Vec<MatchOutcome> = (0..args.matches)
        .into_par_iter()
        .map(|i| play_match(args.seed.wrapping_add(i), args.first, args.second))
        .collect();
    let elapsed = start.elapsed();

    let first_wins = outcomes
        .iter()
        .filter(|o| **o == MatchOutcome::FirstWins)
        .count() as u64;
    let draws = outcomes
        .iter()
        .filter(|o| **o == MatchOutcome::Draw)
        .count() as u64;
    let second_wins = args.matches - first_wins - draws;

    info!(first_wins, draws, second_wins, "simulation finished");

    let summary = Summary {
        matches: args.matches,
        seed: args.seed,
        first: format!("{:?}", args.first).to_lowercase(),
        second: format!("{:?}", args.second).to_lowercase(),
        first_wins,
        draws,
        second_wins,
        elapsed_secs: elapsed.as_secs_f64(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} vs {}: {} matches in {:.2}s",
            summary.first, summary.second, summary.matches, summary.elapsed_secs
        );
        println!(
            "first wins {}  draws {}  second wins {}",
            summary.first_wins, summary.draws, summary.second_wins
        );
    }

    Ok(())
}
