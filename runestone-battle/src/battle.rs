//! Battle state - enemies, combo, level and score
//!
//! Level 2 - Turn phases

use serde::Serialize;

use crate::config::{BattleConfig, EnemySpec};

/// Battle outcome
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Ongoing,
    Victory,
}

/// What a single turn did
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    /// Tiles cleared this turn
    pub cleared: usize,
    /// Damage dealt this turn
    pub damage: u32,
    /// Name of the enemy defeated this turn, if any
    pub defeated: Option<String>,
    /// Outcome after the turn
    pub outcome: Outcome,
}

impl TurnReport {
    fn idle(outcome: Outcome) -> Self {
        Self {
            cleared: 0,
            damage: 0,
            defeated: None,
            outcome,
        }
    }
}

/// Game-loop state wrapped around a board
#[derive(Clone, Debug)]
pub struct Battle {
    config: BattleConfig,
    /// Index of the current enemy
    enemy_index: usize,
    /// Remaining health of the current enemy
    health: i64,
    /// Turns that cleared at least one tile
    combo: u32,
    /// 1-based level (enemy number)
    level: u32,
    /// Accumulated damage ("traffic tickets")
    score: u64,
    outcome: Outcome,
}

impl Battle {
    /// Start a battle against the first enemy of the roster.
    ///
    /// The roster must be non-empty; use `BattleConfig::validate` first for
    /// untrusted input.
    pub fn new(config: BattleConfig) -> Self {
        let health = config.enemies.first().map_or(0, |e| i64::from(e.max_health));
        let outcome = if config.enemies.is_empty() {
            Outcome::Victory
        } else {
            Outcome::Ongoing
        };
        Self {
            config,
            enemy_index: 0,
            health,
            combo: 0,
            level: 1,
            score: 0,
            outcome,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Current enemy (the last one stays current after victory)
    pub fn enemy(&self) -> Option<&EnemySpec> {
        self.config.enemies.get(self.enemy_index)
    }

    /// Remaining health of the current enemy, floored at zero
    pub fn health(&self) -> u32 {
        self.health.clamp(0, i64::from(u32::MAX)) as u32
    }

    pub fn max_health(&self) -> u32 {
        self.enemy().map_or(0, |e| e.max_health)
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome == Outcome::Victory
    }

    // ========================================================================
    // TURNS
    // ========================================================================

    /// Apply the tiles cleared by one gesture.
    ///
    /// A turn that clears nothing changes nothing. Overflow damage on a
    /// defeated enemy is discarded.
    pub fn apply_clear(&mut self, tiles: usize) -> TurnReport {
        if tiles == 0 || self.is_over() {
            return TurnReport::idle(self.outcome);
        }

        let damage = (tiles as u32).saturating_mul(self.config.damage_per_tile);
        self.combo += 1;
        self.health -= i64::from(damage);
        self.score += u64::from(damage);

        tracing::debug!(
            tiles,
            damage,
            combo = self.combo,
            health = self.health,
            "Damage dealt"
        );

        let defeated = if self.health <= 0 {
            self.defeat_current()
        } else {
            None
        };

        TurnReport {
            cleared: tiles,
            damage,
            defeated,
            outcome: self.outcome,
        }
    }

    /// Advance past the current enemy, returning its name
    fn defeat_current(&mut self) -> Option<String> {
        let name = self.enemy().map(|e| e.name.clone());
        self.level += 1;

        if self.level as usize > self.config.enemies.len() {
            self.health = 0;
            self.outcome = Outcome::Victory;
            tracing::info!(score = self.score, combo = self.combo, "All enemies defeated");
        } else {
            self.enemy_index = self.level as usize - 1;
            self.health = i64::from(self.config.enemies[self.enemy_index].max_health);
            tracing::info!(
                level = self.level,
                enemy = %self.config.enemies[self.enemy_index].name,
                "Next enemy"
            );
        }
        name
    }
}
