//! Runestone CLI - Command-line interface
//!
//! Commands:
//! - generate: Print a run-free starting board
//! - play: Play a battle from drag paths read on stdin
//! - simulate: Run greedy-bot battles in parallel and report statistics

mod generate_cmd;
mod play_cmd;
mod simulate_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "runestone")]
#[command(about = "Runestone tile-matching battle engine")]
struct Cli {
    /// Random seed for reproducible boards
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a run-free starting board
    Generate(generate_cmd::GenerateArgs),
    /// Play a battle, one drag path per stdin line
    Play(play_cmd::PlayArgs),
    /// Run greedy-bot battles and report statistics
    Simulate(simulate_cmd::SimulateArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so board output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => generate_cmd::run(args, cli.seed),
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Simulate(args) => simulate_cmd::run(args, cli.seed),
    }
}
