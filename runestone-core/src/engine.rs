//! Board engine: grid ownership, drag gestures, clearing and refill

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::{Layout, Point, Pos};
use crate::config::BoardConfig;
use crate::error::BoardError;
use crate::generator::Generator;
use crate::gravity;
use crate::grid::Grid;
use crate::matcher::{self, MatchSet};

/// Gesture state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Dragging,
}

/// Board engine (one per board; not shared across threads)
#[derive(Clone, Debug)]
pub struct BoardEngine {
    /// Token grid
    grid: Grid,

    /// Cells visited by the active gesture, empty when idle
    drag_path: Vec<Pos>,

    /// Screen-to-grid mapping
    layout: Layout,

    /// Generator used for the initial grid and `regenerate`
    generator: Generator,

    /// Cells cleared by the last `detect_and_clear`
    last_cleared: MatchSet,

    rng: ChaCha8Rng,
}

impl BoardEngine {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Create an engine with a freshly generated run-free grid
    pub fn new(config: &BoardConfig) -> Result<Self, BoardError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let generator = Generator::new(config.rows, config.cols)?
            .with_max_attempts(config.max_generation_attempts);
        let grid = generator.generate(&mut rng);

        Ok(Self {
            grid,
            drag_path: Vec::new(),
            layout: config.layout,
            generator,
            last_cleared: MatchSet::default(),
            rng,
        })
    }

    /// Create an engine around an existing grid
    pub fn from_grid(grid: Grid, layout: Layout, seed: u64) -> Result<Self, BoardError> {
        layout.validate()?;
        let generator = Generator::new(grid.rows(), grid.cols())?;

        Ok(Self {
            grid,
            drag_path: Vec::new(),
            layout,
            generator,
            last_cleared: MatchSet::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn drag_path(&self) -> &[Pos] {
        &self.drag_path
    }

    pub fn gesture_state(&self) -> GestureState {
        if self.drag_path.is_empty() {
            GestureState::Idle
        } else {
            GestureState::Dragging
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture_state() == GestureState::Dragging
    }

    /// Positions cleared by the most recent `detect_and_clear`
    pub fn last_cleared(&self) -> &MatchSet {
        &self.last_cleared
    }

    // ========================================================================
    // GESTURES
    // ========================================================================

    /// Begin a drag at a screen point.
    ///
    /// Returns the starting cell, or `None` when the point is off the grid
    /// (the gesture is not started). Any gesture already in progress is
    /// abandoned.
    pub fn start(&mut self, point: Point) -> Option<Pos> {
        match self.locate(point) {
            Ok(pos) => self.begin(pos),
            Err(err) => {
                tracing::debug!(x = point.x, y = point.y, %err, "Drag start rejected");
                self.drag_path.clear();
                None
            }
        }
    }

    /// Begin a drag at a grid cell
    pub fn start_at(&mut self, pos: Pos) -> Option<Pos> {
        if !self.grid.contains(pos) {
            tracing::debug!(%pos, "Drag start rejected: outside grid");
            self.drag_path.clear();
            return None;
        }
        self.begin(pos)
    }

    /// Extend the drag to a screen point, swapping with the last visited cell.
    ///
    /// Returns `true` if a swap happened. Ignored while idle, off the grid,
    /// or when the point maps to the cell already under the pointer.
    pub fn continue_drag(&mut self, point: Point) -> bool {
        match self.locate(point) {
            Ok(pos) => self.step(pos),
            Err(_) => false,
        }
    }

    /// Extend the drag to a grid cell
    pub fn continue_at(&mut self, pos: Pos) -> bool {
        if !self.grid.contains(pos) {
            return false;
        }
        self.step(pos)
    }

    /// Finish the gesture; does not run match detection
    pub fn end(&mut self) {
        self.drag_path.clear();
    }

    fn begin(&mut self, pos: Pos) -> Option<Pos> {
        self.drag_path.clear();
        self.drag_path.push(pos);
        Some(pos)
    }

    fn step(&mut self, pos: Pos) -> bool {
        let last = match self.drag_path.last() {
            Some(&last) => last,
            None => return false,
        };
        if last == pos {
            return false;
        }

        // Both positions are on the grid: `last` was checked when pushed
        if self.grid.swap(last, pos).is_err() {
            return false;
        }
        self.drag_path.push(pos);
        true
    }

    fn locate(&self, point: Point) -> Result<Pos, BoardError> {
        self.layout.locate(point, self.grid.rows(), self.grid.cols())
    }

    // ========================================================================
    // RESOLUTION
    // ========================================================================

    /// Clear every run of three or more; the result is also kept as `last_cleared`
    pub fn detect_and_clear(&mut self) -> MatchSet {
        let matched = matcher::detect_and_clear(&mut self.grid);
        if !matched.is_empty() {
            tracing::debug!(cleared = matched.len(), "Cleared matched tokens");
        }
        self.last_cleared = matched.clone();
        matched
    }

    /// Drop tokens into gaps and refill from the top
    pub fn apply_gravity(&mut self) {
        gravity::apply_gravity(&mut self.grid, &mut self.rng);
    }

    /// Pointer-up sequence: end the gesture, clear matches, and refill if
    /// anything was cleared
    pub fn finish_gesture(&mut self) -> MatchSet {
        self.end();
        let matched = self.detect_and_clear();
        if !matched.is_empty() {
            self.apply_gravity();
        }
        matched
    }

    /// Repeat clear-and-refill until the board settles or `max_waves` passes
    /// have run. Returns the number of tiles cleared by each wave.
    pub fn resolve_cascades(&mut self, max_waves: usize) -> Vec<usize> {
        let mut waves = Vec::new();
        for _ in 0..max_waves {
            let matched = self.detect_and_clear();
            if matched.is_empty() {
                break;
            }
            self.apply_gravity();
            waves.push(matched.len());
        }
        waves
    }

    /// Replace the grid with a new run-free one and drop any gesture
    pub fn regenerate(&mut self) {
        self.grid = self.generator.generate(&mut self.rng);
        self.drag_path.clear();
        self.last_cleared.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind::*;

    fn fixture() -> BoardEngine {
        let grid = Grid::parse(
            "C B K S T C
             B K S T C B
             K S T C B K
             S T C B K S
             T C B K S T",
        )
        .unwrap();
        BoardEngine::from_grid(grid, Layout::default(), 1).unwrap()
    }

    fn center(engine: &BoardEngine, row: usize, col: usize) -> Point {
        engine.layout().center_of(Pos::new(row, col))
    }

    #[test]
    fn test_new_engine_is_run_free_and_idle() {
        let engine = BoardEngine::new(&BoardConfig::default().with_seed(5)).unwrap();
        assert_eq!(engine.grid().rows(), 5);
        assert_eq!(engine.grid().cols(), 6);
        assert!(matcher::find_matches(engine.grid()).is_empty());
        assert_eq!(engine.gesture_state(), GestureState::Idle);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(BoardEngine::new(&BoardConfig::new(0, 3)).is_err());
    }

    #[test]
    fn test_start_in_bounds() {
        let mut engine = fixture();
        let p = center(&engine, 2, 3);
        assert_eq!(engine.start(p), Some(Pos::new(2, 3)));
        assert!(engine.is_dragging());
        assert_eq!(engine.drag_path(), &[Pos::new(2, 3)]);
    }

    #[test]
    fn test_start_out_of_bounds_leaves_state_untouched() {
        let mut engine = fixture();
        let before = engine.grid().clone();
        assert_eq!(engine.start(Point::new(10, 10)), None);
        assert!(engine.drag_path().is_empty());
        assert_eq!(engine.grid(), &before);
        assert_eq!(engine.start_at(Pos::new(5, 0)), None);
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_continue_swaps_once_per_new_cell() {
        let mut engine = fixture();
        engine.start(center(&engine, 0, 0));
        let p = center(&engine, 0, 1);

        assert!(engine.continue_drag(p));
        assert!(!engine.continue_drag(p));
        assert_eq!(engine.grid().kind_at(Pos::new(0, 0)), Some(Bus));
        assert_eq!(engine.grid().kind_at(Pos::new(0, 1)), Some(Car));
        assert_eq!(engine.drag_path().len(), 2);
    }

    #[test]
    fn test_jitter_within_cell_is_noop() {
        let mut engine = fixture();
        let before = engine.grid().clone();
        engine.start(Point::new(60, 310));
        assert!(!engine.continue_drag(Point::new(140, 390)));
        assert_eq!(engine.grid(), &before);
    }

    #[test]
    fn test_continue_while_idle_is_ignored() {
        let mut engine = fixture();
        let before = engine.grid().clone();
        assert!(!engine.continue_drag(center(&engine, 1, 1)));
        assert_eq!(engine.grid(), &before);
    }

    #[test]
    fn test_continue_out_of_bounds_is_ignored() {
        let mut engine = fixture();
        engine.start(center(&engine, 0, 0));
        assert!(!engine.continue_drag(Point::new(-500, -500)));
        assert_eq!(engine.drag_path(), &[Pos::new(0, 0)]);
    }

    #[test]
    fn test_long_drag_rotates_path() {
        let mut engine = fixture();
        engine.start_at(Pos::new(0, 0));
        engine.continue_at(Pos::new(0, 1));
        engine.continue_at(Pos::new(0, 2));
        engine.continue_at(Pos::new(0, 3));

        // The dragged Car travels along the path, the others shift back by one
        let row: Vec<_> = (0..4).map(|c| engine.grid().kind_at(Pos::new(0, c))).collect();
        assert_eq!(row, vec![Some(Bus), Some(Bike), Some(Scooter), Some(Car)]);
    }

    #[test]
    fn test_end_clears_path_without_matching() {
        let mut engine = fixture();
        engine.start_at(Pos::new(0, 0));
        engine.continue_at(Pos::new(1, 0));
        engine.end();
        assert!(engine.drag_path().is_empty());
        assert!(engine.last_cleared().is_empty());
    }

    #[test]
    fn test_restart_abandons_previous_path() {
        let mut engine = fixture();
        engine.start_at(Pos::new(0, 0));
        engine.continue_at(Pos::new(0, 1));
        engine.start_at(Pos::new(3, 3));
        assert_eq!(engine.drag_path(), &[Pos::new(3, 3)]);
    }

    #[test]
    fn test_finish_gesture_clears_and_refills() {
        let grid = Grid::parse(
            "C B K S T C
             B K S T C B
             C C B C B K",
        )
        .unwrap();
        let mut engine = BoardEngine::from_grid(grid, Layout::default(), 3).unwrap();

        // Bring the Car at (2,3) to (2,2): row 2 becomes C C C B B K
        engine.start_at(Pos::new(2, 3));
        assert!(engine.continue_at(Pos::new(2, 2)));
        let cleared = engine.finish_gesture();

        assert_eq!(cleared.len(), 3);
        assert_eq!(engine.last_cleared(), &cleared);
        assert!(engine.grid().is_full());
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_finish_gesture_without_match_leaves_grid() {
        let mut engine = fixture();
        let before = engine.grid().clone();
        engine.start_at(Pos::new(0, 0));
        let cleared = engine.finish_gesture();
        assert!(cleared.is_empty());
        assert_eq!(engine.grid(), &before);
    }

    #[test]
    fn test_resolve_cascades_settles() {
        let mut engine = BoardEngine::new(&BoardConfig::default().with_seed(21)).unwrap();
        engine.regenerate();
        // A run-free board has nothing to resolve
        assert!(engine.resolve_cascades(10).is_empty());
        assert!(engine.grid().is_full());
    }

    #[test]
    fn test_resolve_cascades_reports_waves() {
        let grid = Grid::parse(
            "K S T C
             T T T B",
        )
        .unwrap();
        let mut engine = BoardEngine::from_grid(grid, Layout::default(), 8).unwrap();
        let max_waves = 64;
        let waves = engine.resolve_cascades(max_waves);
        assert_eq!(waves[0], 3);
        assert!(waves.iter().all(|&n| n >= 3));
        assert!(waves.len() < max_waves, "cascades never settled: {:?}", waves);

        // Settled: nothing left to clear, and another pass is a no-op
        assert!(engine.grid().is_full());
        assert!(matcher::find_matches(engine.grid()).is_empty());
        let settled = engine.grid().clone();
        assert!(engine.resolve_cascades(max_waves).is_empty());
        assert_eq!(engine.grid(), &settled);
    }
}
