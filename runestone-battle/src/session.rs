//! Session - headless game loop wiring pointer events to the board
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: autoplay() - orchestration
//! - Level 2: pointer_down(), pointer_move(), pointer_up() - turn phases
//! - Level 3: play_path() - one scripted gesture
//! - Level 4: SessionSummary

use runestone_core::{BoardConfig, BoardEngine, BoardError, Point, Pos};
use serde::Serialize;

use crate::battle::{Battle, Outcome, TurnReport};
use crate::bot::GreedyBot;
use crate::config::BattleConfig;

/// Final state of a finished or abandoned session
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub outcome: Outcome,
    /// Gestures played
    pub turns: u32,
    /// Gestures that cleared tiles
    pub combo: u32,
    pub level: u32,
    /// Total damage dealt
    pub score: u64,
}

impl SessionSummary {
    pub fn is_victory(&self) -> bool {
        self.outcome == Outcome::Victory
    }
}

/// A board plus the battle it drives
pub struct Session {
    engine: BoardEngine,
    battle: Battle,
    turns: u32,
}

impl Session {
    pub fn new(board: &BoardConfig, battle: BattleConfig) -> Result<Self, BoardError> {
        Ok(Self::from_parts(BoardEngine::new(board)?, Battle::new(battle)))
    }

    pub fn from_parts(engine: BoardEngine, battle: Battle) -> Self {
        Self {
            engine,
            battle,
            turns: 0,
        }
    }

    pub fn engine(&self) -> &BoardEngine {
        &self.engine
    }

    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    // ========================================================================
    // LEVEL 2 - POINTER EVENTS
    // ========================================================================

    /// Pointer pressed
    pub fn pointer_down(&mut self, point: Point) -> Option<Pos> {
        self.engine.start(point)
    }

    /// Pointer moved while pressed
    pub fn pointer_move(&mut self, point: Point) -> bool {
        self.engine.continue_drag(point)
    }

    /// Pointer released: resolve the board and score the turn
    pub fn pointer_up(&mut self) -> TurnReport {
        let was_dragging = self.engine.is_dragging();
        let cleared = self.engine.finish_gesture();
        if was_dragging {
            self.turns += 1;
        }
        self.battle.apply_clear(cleared.len())
    }

    // ========================================================================
    // LEVEL 3 - SCRIPTED GESTURES
    // ========================================================================

    /// Play one gesture along grid cells in order.
    ///
    /// Cells off the grid are ignored the same way off-grid pointer events
    /// are; an off-grid first cell means no gesture and no turn.
    pub fn play_path(&mut self, path: &[Pos]) -> TurnReport {
        if let Some((&first, rest)) = path.split_first() {
            self.engine.start_at(first);
            for &pos in rest {
                self.engine.continue_at(pos);
            }
        }
        self.pointer_up()
    }

    // ========================================================================
    // LEVEL 1 - ORCHESTRATION
    // ========================================================================

    /// Let a bot play until victory or `max_turns` gestures
    pub fn autoplay(&mut self, bot: &mut GreedyBot, max_turns: u32) -> SessionSummary {
        while !self.battle.is_over() && self.turns < max_turns {
            let path = match bot.choose_path(self.engine.grid()) {
                Some(path) => path,
                None => break,
            };
            self.play_path(&path);
        }
        self.summary()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            outcome: self.battle.outcome(),
            turns: self.turns,
            combo: self.battle.combo(),
            level: self.battle.level(),
            score: self.battle.score(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runestone_core::{Grid, Layout};

    fn scripted() -> Session {
        let grid = Grid::parse(
            "C B K S T C
             B K S T C B
             C C B C B K",
        )
        .unwrap();
        let engine = BoardEngine::from_grid(grid, Layout::default(), 4).unwrap();
        Session::from_parts(engine, Battle::new(BattleConfig::single("man", 150)))
    }

    #[test]
    fn test_matching_gesture_scores() {
        let mut session = scripted();
        let report = session.play_path(&[Pos::new(2, 3), Pos::new(2, 2)]);
        assert_eq!(report.cleared, 3);
        assert_eq!(report.damage, 30);
        assert_eq!(session.battle().health(), 120);
        assert_eq!(session.turns(), 1);
        assert!(session.engine().grid().is_full());
    }

    #[test]
    fn test_pointer_events_map_through_layout() {
        let mut session = scripted();
        // Cell (2,3) centre is (400, 550); cell (2,2) is (300, 550)
        assert_eq!(session.pointer_down(Point::new(400, 550)), Some(Pos::new(2, 3)));
        assert!(session.pointer_move(Point::new(300, 550)));
        let report = session.pointer_up();
        assert_eq!(report.cleared, 3);
    }

    #[test]
    fn test_off_board_press_is_not_a_turn() {
        let mut session = scripted();
        assert_eq!(session.pointer_down(Point::new(0, 0)), None);
        let report = session.pointer_up();
        assert_eq!(report.cleared, 0);
        assert_eq!(session.turns(), 0);
        assert_eq!(session.battle().combo(), 0);
    }

    #[test]
    fn test_far_off_grid_path_is_ignored() {
        let mut session = scripted();
        let before = session.engine().grid().clone();

        let report = session.play_path(&[Pos::new(30_000_000, 0), Pos::new(0, 0)]);
        assert_eq!(report.cleared, 0);
        assert_eq!(session.turns(), 0);
        assert_eq!(session.engine().grid(), &before);

        // A stray cell mid-path is skipped; the rest of the drag still swaps
        let report = session.play_path(&[Pos::new(2, 3), Pos::new(usize::MAX, 2), Pos::new(2, 2)]);
        assert_eq!(report.cleared, 3);
        assert_eq!(session.turns(), 1);
    }

    #[test]
    fn test_autoplay_reaches_victory() {
        let board = BoardConfig::default().with_seed(17);
        let mut session = Session::new(&board, BattleConfig::single("dummy", 30)).unwrap();
        let mut bot = GreedyBot::new(17);
        let summary = session.autoplay(&mut bot, 500);
        assert!(summary.is_victory(), "summary: {:?}", summary);
        assert!(summary.score >= 30);
        assert!(summary.turns <= 500);
    }

    #[test]
    fn test_autoplay_respects_turn_limit() {
        let board = BoardConfig::default().with_seed(3);
        let mut session = Session::new(&board, BattleConfig::single("wall", 1_000_000)).unwrap();
        let mut bot = GreedyBot::new(3);
        let summary = session.autoplay(&mut bot, 5);
        assert_eq!(summary.turns, 5);
        assert!(!summary.is_victory());
    }
}
