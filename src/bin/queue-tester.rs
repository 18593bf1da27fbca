//! Queue Tester CLI Tool
//!
//! Command-line harness for driving the matchmaking engine with batches of
//! groups and inspecting the pairs it produces.
//!
//! Usage:
//!   cargo run --bin queue-tester -- --help
//!   cargo run --bin queue-tester run --input groups.json --policy policies/default.toml
//!   cargo run --bin queue-tester demo --groups 12
//!
//! Input files are JSON arrays of group specs; player ids are assigned
//! sequentially in file order:
//!   [{"players": [{"slot": 0, "rank": "gold", "score": 120.0}, ...]}, ...]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rift_queue::config::{EngineConfig, PairingFairness};
use rift_queue::policy::{DecisionPolicy, RulePolicy, UniformPolicy};
use rift_queue::queue::Matchmaker;
use rift_queue::types::{Group, Player, PlayerId, Rank, Roles};
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "queue-tester")]
#[command(about = "Batch testing tool for the rift-queue matchmaking engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Target team size (group capacity)
    #[arg(long, default_value = "5")]
    team_size: usize,

    /// Ready-pool size above which merge search is skipped
    #[arg(long, default_value = "32")]
    backpressure: usize,

    /// Pairing scan order (newest_first or oldest_first)
    #[arg(long, default_value = "newest_first")]
    fairness: String,

    /// Optional TOML policy definition; accepts everything when omitted
    #[arg(long)]
    policy: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Push groups from a JSON file and drain all matches
    Run {
        /// Path to the JSON group batch
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Push a synthetic batch of groups and drain all matches
    Demo {
        /// Number of groups to generate
        #[arg(short, long, default_value = "10")]
        groups: usize,
    },
}

/// One player slot in a JSON group spec
#[derive(Debug, Deserialize)]
struct PlayerSpec {
    slot: usize,
    rank: Rank,
    score: f64,
}

/// One group in a JSON batch
#[derive(Debug, Deserialize)]
struct GroupSpec {
    players: Vec<PlayerSpec>,
}

fn slot_name(slot: usize) -> String {
    match slot {
        0 => "TOP".to_string(),
        1 => "BOT".to_string(),
        2 => "MID".to_string(),
        3 => "JG".to_string(),
        4 => "SUP".to_string(),
        other => format!("S{}", other),
    }
}

fn load_groups(path: &PathBuf, team_size: usize, next_id: &mut PlayerId) -> Result<Vec<Group>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let specs: Vec<GroupSpec> =
        serde_json::from_str(&raw).with_context(|| format!("cannot parse {}", path.display()))?;

    let mut groups = Vec::with_capacity(specs.len());
    for spec in specs {
        let mut group = Group::new(team_size)?;
        for p in spec.players {
            *next_id += 1;
            group.place(
                p.slot,
                Player {
                    id: *next_id,
                    rank: p.rank,
                    score: p.score,
                    roles: Roles::for_slot(p.slot),
                },
            )?;
        }
        groups.push(group);
    }
    Ok(groups)
}

fn synthetic_groups(count: usize, team_size: usize, next_id: &mut PlayerId) -> Result<Vec<Group>> {
    // Deterministic size/rank rotation so repeated runs are comparable
    let sizes = [2usize, 3, 1, 4, 5];
    let mut groups = Vec::with_capacity(count);
    for i in 0..count {
        let size = sizes[i % sizes.len()].min(team_size);
        let rank = Rank::ALL[i % Rank::ALL.len()];
        let mut group = Group::new(team_size)?;
        for slot in 0..size {
            *next_id += 1;
            group.place(
                slot,
                Player {
                    id: *next_id,
                    rank,
                    score: 1000.0 + (*next_id % 100) as f64 * 10.0,
                    roles: Roles::for_slot(slot),
                },
            )?;
        }
        groups.push(group);
    }
    Ok(groups)
}

fn print_pair(
    policy: &dyn DecisionPolicy,
    team_size: usize,
    blue: &Group,
    red: &Group,
) -> Result<()> {
    println!("\tBLUE\tRED");
    for slot in 0..team_size {
        println!(
            "{}\t{}\t{}",
            slot_name(slot),
            blue.players()[slot].id,
            red.players()[slot].id
        );
    }
    println!(
        "SCORE\t{:.1}\t{:.1}",
        policy.score(blue)?,
        policy.score(red)?
    );
    let elo = policy.win_probability(blue, red)?;
    println!("ELO\t{:.2}\t{:.2}", elo, 1.0 - elo);
    Ok(())
}

fn run_batch(cli: &Cli, groups: Vec<Group>) -> Result<()> {
    let fairness: PairingFairness = cli.fairness.parse()?;
    let config = EngineConfig {
        team_size: cli.team_size,
        backpressure_threshold: cli.backpressure,
        fairness,
    };
    let policy: Box<dyn DecisionPolicy> = match &cli.policy {
        Some(path) => Box::new(RulePolicy::from_file(path)?),
        None => Box::new(UniformPolicy::new()),
    };

    let mut engine = Matchmaker::open(config, policy)?;
    for group in groups {
        let outcome = engine.push(group)?;
        println!("push -> {}", outcome);
    }

    let mut count = 0usize;
    while let Some(paired) = engine.find_match()? {
        print_pair(engine.policy(), cli.team_size, &paired.blue, &paired.red)?;
        count += 1;
    }
    println!("{} pair(s) of groups matched", count);
    println!(
        "{} group(s) still ready, {} partial size classes waiting",
        engine.ready_len(),
        (1..cli.team_size)
            .filter(|&s| engine.waiting_len(s) > 0)
            .count()
    );
    Ok(())
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut next_id: PlayerId = 0;

    let groups = match &cli.command {
        Commands::Run { input } => load_groups(input, cli.team_size, &mut next_id)?,
        Commands::Demo { groups } => synthetic_groups(*groups, cli.team_size, &mut next_id)?,
    };

    println!("loaded {} group(s)", groups.len());
    run_batch(&cli, groups)
}
