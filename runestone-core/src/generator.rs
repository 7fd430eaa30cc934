//! Starting-grid generation
//!
//! Grids are rolled cell-by-cell and rejected whole if any run exists. An
//! optional attempt cap switches to a constructive fill that never places a
//! token completing a run.

use rand::Rng;

use crate::board::Pos;
use crate::error::BoardError;
use crate::grid::Grid;
use crate::matcher::has_run;
use crate::token::{Token, TokenKind};

/// Run-free grid generator
#[derive(Clone, Debug)]
pub struct Generator {
    blank: Grid,
    /// Rejection attempts before constructive fill (`None` = unbounded)
    max_attempts: Option<u32>,
}

impl Generator {
    pub fn new(rows: usize, cols: usize) -> Result<Self, BoardError> {
        Ok(Self {
            blank: Grid::empty(rows, cols)?,
            max_attempts: None,
        })
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn rows(&self) -> usize {
        self.blank.rows()
    }

    pub fn cols(&self) -> usize {
        self.blank.cols()
    }

    /// Produce a grid with no run of three
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Grid {
        let mut attempts: u32 = 0;
        loop {
            if self.max_attempts.is_some_and(|max| attempts >= max) {
                tracing::warn!(
                    attempts,
                    rows = self.rows(),
                    cols = self.cols(),
                    "Rejection sampling exhausted, using constructive fill"
                );
                return self.constructive(rng);
            }
            attempts += 1;

            let grid = self.roll(rng);
            if !has_run(&grid) {
                tracing::debug!(attempts, "Generated run-free grid");
                return grid;
            }
        }
    }

    /// Fill every cell independently at random
    fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Grid {
        let mut grid = self.blank.clone();
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                grid[Pos::new(row, col)] = Some(Token::random(rng));
            }
        }
        grid
    }

    /// Fill left-to-right, top-to-bottom, skipping kinds that would
    /// complete a run with the two cells to the left or the two above
    fn constructive<R: Rng + ?Sized>(&self, rng: &mut R) -> Grid {
        let mut grid = self.blank.clone();
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                let left = if col >= 2 {
                    pair_kind(&grid, Pos::new(row, col - 1), Pos::new(row, col - 2))
                } else {
                    None
                };
                let above = if row >= 2 {
                    pair_kind(&grid, Pos::new(row - 1, col), Pos::new(row - 2, col))
                } else {
                    None
                };

                let allowed: Vec<TokenKind> = TokenKind::ALL
                    .into_iter()
                    .filter(|&k| Some(k) != left && Some(k) != above)
                    .collect();
                let kind = allowed[rng.gen_range(0..allowed.len())];
                grid[Pos::new(row, col)] = Some(Token::new(kind));
            }
        }
        grid
    }
}

/// Kind shared by two already-filled cells, if they match
fn pair_kind(grid: &Grid, a: Pos, b: Pos) -> Option<TokenKind> {
    match (grid.kind_at(a), grid.kind_at(b)) {
        (Some(x), Some(y)) if x == y => Some(x),
        _ => None,
    }
}

/// Generate a run-free grid by unbounded rejection sampling
pub fn generate<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Result<Grid, BoardError> {
    Ok(Generator::new(rows, cols)?.generate(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::find_matches;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generated_grids_are_run_free() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..200 {
            let grid = generate(5, 6, &mut rng).unwrap();
            assert!(grid.is_full());
            assert!(!has_run(&grid));
            assert!(find_matches(&grid).is_empty(), "independent re-scan found a run:\n{}", grid);
        }
    }

    #[test]
    fn test_same_seed_same_grid() {
        let a = generate(5, 6, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let b = generate(5, 6, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_constructive_fallback_is_run_free() {
        // A zero cap goes straight to constructive fill
        let generator = Generator::new(12, 12).unwrap().with_max_attempts(Some(0));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let grid = generator.generate(&mut rng);
            assert!(grid.is_full());
            assert!(find_matches(&grid).is_empty());
        }
    }

    #[test]
    fn test_large_grid_with_cap_terminates() {
        let generator = Generator::new(30, 30).unwrap().with_max_attempts(Some(5));
        let grid = generator.generate(&mut ChaCha8Rng::seed_from_u64(11));
        assert_eq!(grid.rows(), 30);
        assert!(!has_run(&grid));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(Generator::new(0, 6).is_err());
        assert!(generate(5, 0, &mut ChaCha8Rng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn test_tiny_grids() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let grid = generate(1, 1, &mut rng).unwrap();
        assert!(grid.is_full());
        let grid = generate(1, 2, &mut rng).unwrap();
        assert!(grid.is_full());
    }
}
