//! Greedy autoplay bot
//!
//! Level 3 - Step-level implementation

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use runestone_core::{find_matches, Grid, Pos};

/// Picks the adjacent swap that clears the most tiles right away
pub struct GreedyBot {
    rng: ChaCha8Rng,
}

impl GreedyBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Choose a two-cell drag path.
    ///
    /// Ties are broken at random; when no swap clears anything a random
    /// adjacent swap is returned. `None` only for a 1x1 grid.
    pub fn choose_path(&mut self, grid: &Grid) -> Option<Vec<Pos>> {
        let swaps = adjacent_swaps(grid.rows(), grid.cols());
        if swaps.is_empty() {
            return None;
        }

        let mut best_score = 0;
        let mut best: Vec<(Pos, Pos)> = Vec::new();
        for &(a, b) in &swaps {
            let score = score_swap(grid, a, b);
            if score > best_score {
                best_score = score;
                best.clear();
            }
            if score == best_score && score > 0 {
                best.push((a, b));
            }
        }

        let candidates = if best.is_empty() { &swaps } else { &best };
        let &(a, b) = candidates.choose(&mut self.rng)?;
        Some(vec![a, b])
    }
}

/// Every pair of orthogonally adjacent cells, each pair once
fn adjacent_swaps(rows: usize, cols: usize) -> Vec<(Pos, Pos)> {
    let mut swaps = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            let here = Pos::new(row, col);
            if col + 1 < cols {
                swaps.push((here, Pos::new(row, col + 1)));
            }
            if row + 1 < rows {
                swaps.push((here, Pos::new(row + 1, col)));
            }
        }
    }
    swaps
}

/// Tiles that would be cleared after swapping `a` and `b`
fn score_swap(grid: &Grid, a: Pos, b: Pos) -> usize {
    let mut trial = grid.clone();
    if trial.swap(a, b).is_err() {
        return 0;
    }
    find_matches(&trial).len()
}
