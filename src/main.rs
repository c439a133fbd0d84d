//! Headless simulator (default binary).
//!
//! Plays seeded games with an automated placement policy and prints one summary
//! per game, as text or JSON lines.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use gridblocks::core::{LevelLayout, ModeConfig};
use gridblocks::engine::{run_game, GameSummary, PolicyKind};
use gridblocks::types::GameMode;

#[derive(Parser)]
#[command(name = "gridblocks-sim")]
#[command(about = "Headless simulator for the grid block puzzle")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Seed of the first game; game N uses seed + N - 1
    #[arg(long, default_value = "1")]
    seed: u64,

    /// Game mode (ignored when --config is given)
    #[arg(long, default_value = "classic")]
    mode: ModeArg,

    /// Placement policy
    #[arg(long, default_value = "greedy")]
    policy: PolicyArg,

    /// JSON mode config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop each game after this many placements (0 = no cap)
    #[arg(long, default_value = "0")]
    max_moves: u32,

    /// Print one JSON object per game
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show progress and the final summary
    #[arg(long)]
    show_output: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Classic,
    Story,
    Chaos,
}

impl ModeArg {
    fn config(self) -> ModeConfig {
        match self {
            ModeArg::Classic => ModeConfig::for_mode(GameMode::Classic),
            ModeArg::Story => ModeConfig::story(LevelLayout::demo()),
            ModeArg::Chaos => ModeConfig::for_mode(GameMode::Chaos),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    FirstFit,
    Random,
    Greedy,
}

impl From<PolicyArg> for PolicyKind {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::FirstFit => PolicyKind::FirstFit,
            PolicyArg::Random => PolicyKind::Random,
            PolicyArg::Greedy => PolicyKind::Greedy,
        }
    }
}

fn load_config(args: &Args) -> Result<ModeConfig> {
    let Some(path) = &args.config else {
        return Ok(args.mode.config());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: ModeConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

fn print_summary(summary: &GameSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(summary)?);
    } else {
        println!(
            "game {:>4}  seed {:>6}  score {:>7}  lines {:>4}  pieces {:>5}  stars {:>2}  max combo {:>3}  ({:?})",
            summary.game,
            summary.seed,
            summary.score,
            summary.lines,
            summary.pieces,
            summary.stars,
            summary.max_combo,
            summary.reason
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Silent by default, only warnings and errors
    let filter = if args.verbose {
        "debug"
    } else if args.show_output {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&args)?;
    let kind = PolicyKind::from(args.policy);
    if args.show_output {
        info!(
            games = args.games,
            mode = config.mode.as_str(),
            policy = kind.as_str(),
            "starting simulator"
        );
    }

    let mut total_score = 0u64;
    let mut best = 0u64;
    for game in 1..=args.games {
        let seed = args.seed.wrapping_add(u64::from(game - 1));
        let mut policy = kind.build(seed);
        let summary = run_game(game, seed, config.clone(), policy.as_mut(), args.max_moves)?;
        total_score += summary.score;
        best = best.max(summary.score);
        print_summary(&summary, args.json)?;
    }

    if args.show_output && args.games > 0 {
        info!(
            games = args.games,
            mean_score = total_score as f64 / f64::from(args.games),
            best_score = best,
            "simulation complete"
        );
    }
    Ok(())
}
