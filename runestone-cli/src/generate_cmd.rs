//! Generate command - print a run-free starting board
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), load_board_config(), report_board()
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use runestone_core::{BoardConfig, BoardEngine, Grid};

/// Generation attempt cap applied when neither the config file nor the
/// command line sets one; past it the generator builds the board cell by cell
pub(crate) const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct GenerateArgs {
    /// Board config JSON file (defaults apply when omitted)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of rows (overrides config)
    #[arg(long)]
    pub rows: Option<usize>,

    /// Number of columns (overrides config)
    #[arg(long)]
    pub cols: Option<usize>,

    /// Random boards to try before building one cell by cell
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Output the board as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run generate command
pub fn run(args: GenerateArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args, seed)?;

    tracing::debug!(rows = config.rows, cols = config.cols, seed = ?config.seed, "Generating board");

    let engine = BoardEngine::new(&config).context("Failed to create board")?;
    report_board(engine.grid(), args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Merge config file, command-line overrides and the global seed
pub(crate) fn build_config(args: &GenerateArgs, seed: Option<u64>) -> Result<BoardConfig> {
    let mut config = load_board_config(args.config.as_deref())?;

    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(cols) = args.cols {
        config.cols = cols;
    }
    if args.max_attempts.is_some() {
        config.max_generation_attempts = args.max_attempts;
    }
    if seed.is_some() {
        config.seed = seed;
    }

    config.validate()?;
    Ok(config)
}

/// Load a board config file (or defaults) and cap generation attempts
/// unless the file sets its own cap
pub(crate) fn load_board_config(path: Option<&Path>) -> Result<BoardConfig> {
    let mut config = match path {
        Some(path) => BoardConfig::load(path)
            .with_context(|| format!("Failed to load board config: {}", path.display()))?,
        None => BoardConfig::default(),
    };
    if config.max_generation_attempts.is_none() {
        config.max_generation_attempts = Some(DEFAULT_MAX_ATTEMPTS);
    }
    Ok(config)
}

fn report_board(grid: &Grid, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(grid)?);
    } else {
        print!("{}", grid);
    }
    Ok(())
}
