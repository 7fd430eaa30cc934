//! Runestone Battle - Game loop around the board engine
//!
//! This crate provides the orchestration layer:
//! - Enemy roster and battle configuration
//! - Combo, level and score tracking from cleared tile counts
//! - Headless sessions that feed pointer events to the board
//! - A greedy autoplay bot
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: Session::autoplay (orchestration)
//! - Level 2: Battle::apply_clear, pointer events (phases)
//! - Level 3: play_path, GreedyBot::choose_path (steps)
//! - Level 4: configuration

mod battle;
mod bot;
mod config;
mod session;

pub use battle::{Battle, Outcome, TurnReport};
pub use bot::GreedyBot;
pub use config::{BattleConfig, EnemySpec, DEFAULT_DAMAGE_PER_TILE};
pub use session::{Session, SessionSummary};
