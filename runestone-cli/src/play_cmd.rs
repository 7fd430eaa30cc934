//! Play command - drive a battle from drag paths on stdin
//!
//! Each input line is one gesture: whitespace-separated `row,col` cells,
//! visited in order. `quit` ends the game early.
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: create_session(), play_lines(), report_summary()
//! - Level 3: parse_path(), print_status()

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use runestone_battle::{BattleConfig, Session, SessionSummary, TurnReport};
use runestone_core::Pos;

use crate::generate_cmd::load_board_config;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Board config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Battle config JSON file (enemy roster, damage per tile)
    #[arg(long, value_name = "FILE")]
    pub battle: Option<PathBuf>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let mut session = create_session(&args, seed)?;

    tracing::info!(
        enemy = session.battle().enemy().map_or("-", |e| e.name.as_str()),
        "Battle started"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary = play_lines(&mut session, stdin.lock(), &mut stdout.lock())?;

    report_summary(&summary);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn create_session(args: &PlayArgs, seed: Option<u64>) -> Result<Session> {
    let mut board = load_board_config(args.config.as_deref())?;
    if seed.is_some() {
        board.seed = seed;
    }

    let battle = match &args.battle {
        Some(path) => BattleConfig::load(path)?,
        None => BattleConfig::default(),
    };

    Session::new(&board, battle).context("Failed to create board")
}

/// Play gestures until input ends, the player quits, or the battle is won
pub(crate) fn play_lines<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
) -> Result<SessionSummary> {
    print_status(session, None, out)?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") {
            break;
        }

        let path = match parse_path(line) {
            Ok(path) => path,
            Err(err) => {
                writeln!(out, "Invalid path: {}", err)?;
                continue;
            }
        };

        let report = session.play_path(&path);
        print_status(session, Some(&report), out)?;

        if session.battle().is_over() {
            break;
        }
    }

    Ok(session.summary())
}

fn report_summary(summary: &SessionSummary) {
    println!("\n=== Summary ===");
    println!("Outcome:         {:?}", summary.outcome);
    println!("Turns:           {}", summary.turns);
    println!("Combo:           {}", summary.combo);
    println!("Traffic tickets: {}", summary.score);
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Parse `row,col row,col ...`
pub(crate) fn parse_path(line: &str) -> Result<Vec<Pos>> {
    line.split_whitespace()
        .map(|cell| {
            let (row, col) = cell
                .split_once(',')
                .with_context(|| format!("expected row,col but got '{}'", cell))?;
            let row: usize = row.trim().parse().with_context(|| format!("bad row in '{}'", cell))?;
            let col: usize = col.trim().parse().with_context(|| format!("bad column in '{}'", cell))?;
            Ok(Pos::new(row, col))
        })
        .collect()
}

fn print_status<W: Write>(session: &Session, report: Option<&TurnReport>, out: &mut W) -> Result<()> {
    let battle = session.battle();

    if let Some(report) = report {
        if report.cleared > 0 {
            writeln!(out, "Cleared {} tiles for {} damage", report.cleared, report.damage)?;
        } else {
            writeln!(out, "No match")?;
        }
        if let Some(name) = &report.defeated {
            writeln!(out, "Defeated {}!", name)?;
        }
    }

    write!(out, "{}", session.engine().grid())?;
    writeln!(
        out,
        "Enemy: {} {}/{} | Traffic Tickets: {} | Combo: {} | Level: {}",
        battle.enemy().map_or("-", |e| e.name.as_str()),
        battle.health(),
        battle.max_health(),
        battle.score(),
        battle.combo(),
        battle.level()
    )?;
    Ok(())
}
