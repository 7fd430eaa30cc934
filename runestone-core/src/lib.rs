//! Runestone Core - Board engine
//!
//! This crate provides the tile-matching board logic:
//! - Token kinds and grid cells
//! - Run-free starting grid generation
//! - Drag gestures that swap cells along the pointer path
//! - Run detection and clearing
//! - Gravity and refill

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod gravity;
pub mod grid;
pub mod matcher;
pub mod token;

// Re-exports for convenient access
pub use board::{Layout, Point, Pos, DEFAULT_COLS, DEFAULT_ROWS};
pub use config::BoardConfig;
pub use engine::{BoardEngine, GestureState};
pub use error::BoardError;
pub use generator::{generate, Generator};
pub use gravity::apply_gravity;
pub use grid::Grid;
pub use matcher::{detect_and_clear, find_matches, has_run, MatchSet, RUN_LENGTH};
pub use token::{Cell, Token, TokenKind};
