//! Simulate command - run greedy-bot battles in parallel
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_configs(), simulate_games(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use runestone_battle::{BattleConfig, GreedyBot, Session, SessionSummary};
use runestone_core::BoardConfig;

use crate::generate_cmd::load_board_config;

/// Base seed when none is given on the command line
const DEFAULT_BASE_SEED: u64 = 42;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of battles to run
    #[arg(long, default_value = "100")]
    pub games: usize,

    /// Gesture limit per battle
    #[arg(long, default_value = "500")]
    pub max_turns: u32,

    /// Board config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Battle config JSON file (enemy roster, damage per tile)
    #[arg(long, value_name = "FILE")]
    pub battle: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// One finished battle
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    seed: u64,
    #[serde(flatten)]
    summary: SessionSummary,
}

/// Aggregated simulation results
#[derive(Clone, Debug, Serialize)]
struct SimulationResults {
    total_games: usize,
    victories: usize,
    victory_rate: f32,
    avg_turns: f32,
    avg_score: f32,
    games: Vec<GameRecord>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
///
/// 1. Load board and battle configs
/// 2. Play every battle in parallel
/// 3. Report statistics
pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    let (board, battle) = load_configs(&args)?;

    tracing::info!(
        games = args.games,
        max_turns = args.max_turns,
        enemies = battle.enemies.len(),
        "Starting simulation"
    );

    let base_seed = seed.or(board.seed).unwrap_or(DEFAULT_BASE_SEED);
    let progress = create_progress(args.games, args.json);
    let results = simulate_games(&board, &battle, args.games, args.max_turns, base_seed, &progress)?;
    progress.finish_and_clear();

    report_results(&results, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_configs(args: &SimulateArgs) -> Result<(BoardConfig, BattleConfig)> {
    let board = load_board_config(args.config.as_deref())?;
    let battle = match &args.battle {
        Some(path) => BattleConfig::load(path)?,
        None => BattleConfig::default(),
    };
    Ok((board, battle))
}

/// Play `games` battles; game `i` uses seed `base_seed + i` for both the
/// board and the bot
fn simulate_games(
    board: &BoardConfig,
    battle: &BattleConfig,
    games: usize,
    max_turns: u32,
    base_seed: u64,
    progress: &ProgressBar,
) -> Result<SimulationResults> {
    let records = (0..games)
        .into_par_iter()
        .map(|i| {
            let seed = base_seed.wrapping_add(i as u64);
            let record = play_single_game(board, battle, i + 1, seed, max_turns);
            progress.inc(1);
            record
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(compute_statistics(records))
}

fn report_results(results: &SimulationResults, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn play_single_game(
    board: &BoardConfig,
    battle: &BattleConfig,
    game_number: usize,
    seed: u64,
    max_turns: u32,
) -> Result<GameRecord> {
    let board = board.clone().with_seed(seed);
    let mut session = Session::new(&board, battle.clone())
        .with_context(|| format!("Failed to create board for game {}", game_number))?;
    let mut bot = GreedyBot::new(seed);
    let summary = session.autoplay(&mut bot, max_turns);

    tracing::debug!(
        game_number,
        outcome = ?summary.outcome,
        turns = summary.turns,
        score = summary.score,
        "Game finished"
    );

    Ok(GameRecord {
        game_number,
        seed,
        summary,
    })
}

fn compute_statistics(games: Vec<GameRecord>) -> SimulationResults {
    let total = games.len();
    let victories = games.iter().filter(|g| g.summary.is_victory()).count();
    let total_turns: u64 = games.iter().map(|g| u64::from(g.summary.turns)).sum();
    let total_score: u64 = games.iter().map(|g| g.summary.score).sum();

    let mean = |sum: f32| if total == 0 { 0.0 } else { sum / total as f32 };

    SimulationResults {
        total_games: total,
        victories,
        victory_rate: mean(victories as f32),
        avg_turns: mean(total_turns as f32),
        avg_score: mean(total_score as f32),
        games,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Progress bar on stderr, hidden for JSON output
fn create_progress(games: usize, json: bool) -> ProgressBar {
    if json {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(games as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} battles") {
        bar.set_style(style);
    }
    bar
}

fn print_text_results(results: &SimulationResults) {
    println!("\n=== Simulation Results ===");
    println!("Total games:  {}", results.total_games);
    println!(
        "Victories:    {} ({:.1}%)",
        results.victories,
        results.victory_rate * 100.0
    );
    println!("Avg turns:    {:.1}", results.avg_turns);
    println!("Avg score:    {:.1}", results.avg_score);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulate(games: usize, battle: &BattleConfig, max_turns: u32, seed: u64) -> SimulationResults {
        simulate_games(
            &BoardConfig::default(),
            battle,
            games,
            max_turns,
            seed,
            &ProgressBar::hidden(),
        )
        .unwrap()
    }

    #[test]
    fn test_easy_battles_are_won() {
        let results = simulate(8, &BattleConfig::single("dummy", 30), 500, 7);
        assert_eq!(results.total_games, 8);
        assert_eq!(results.victories, 8);
        assert!((results.victory_rate - 1.0).abs() < f32::EPSILON);
        assert!(results.avg_score >= 30.0);
    }

    #[test]
    fn test_turn_limit_caps_every_game() {
        let results = simulate(4, &BattleConfig::single("wall", 1_000_000), 3, 1);
        assert_eq!(results.victories, 0);
        assert!(results.games.iter().all(|g| g.summary.turns == 3));
        assert!((results.avg_turns - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_seeds_are_offsets_of_base() {
        let results = simulate(3, &BattleConfig::single("dummy", 30), 50, 100);
        let mut seeds: Vec<u64> = results.games.iter().map(|g| g.seed).collect();
        seeds.sort_unstable();
        assert_eq!(seeds, vec![100, 101, 102]);
    }

    #[test]
    fn test_simulation_is_reproducible() {
        let battle = BattleConfig::default();
        let a = simulate(4, &battle, 40, 9);
        let b = simulate(4, &battle, 40, 9);
        let key = |r: &SimulationResults| {
            r.games
                .iter()
                .map(|g| (g.game_number, g.summary.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(key(&a), key(&b));
    }

    #[test]
    fn test_empty_simulation() {
        let results = compute_statistics(Vec::new());
        assert_eq!(results.total_games, 0);
        assert_eq!(results.victory_rate, 0.0);
    }
}
