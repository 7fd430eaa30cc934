//! Gravity and refill

use rand::Rng;

use crate::board::Pos;
use crate::grid::Grid;
use crate::token::Token;

/// Drop tokens into empty cells below them and refill from the top.
///
/// Each column is processed bottom to top. An empty cell pulls down the
/// nearest token above it; when nothing is above, a fresh random token is
/// spawned. Order within a column is preserved. New runs formed by the
/// refill are left in place.
pub fn apply_gravity<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    for col in 0..grid.cols() {
        for row in (0..grid.rows()).rev() {
            let here = Pos::new(row, col);
            if grid[here].is_some() {
                continue;
            }

            let source = (0..row)
                .rev()
                .map(|upper| Pos::new(upper, col))
                .find(|&above| grid[above].is_some());

            grid[here] = match source {
                Some(above) => grid[above].take(),
                None => Some(Token::random(rng)),
            };
        }
    }
}
