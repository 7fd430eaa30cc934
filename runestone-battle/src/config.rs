//! Configuration types for battles
//!
//! Level 4 - Utilities and configuration

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Damage dealt per cleared tile
pub const DEFAULT_DAMAGE_PER_TILE: u32 = 10;

/// One enemy in the roster
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpec {
    /// Name, also the asset key for renderers
    pub name: String,
    /// Health at spawn
    pub max_health: u32,
}

impl EnemySpec {
    pub fn new(name: impl Into<String>, max_health: u32) -> Self {
        Self {
            name: name.into(),
            max_health,
        }
    }
}

/// Battle configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Enemies fought in order
    pub enemies: Vec<EnemySpec>,
    /// Damage per cleared tile
    pub damage_per_tile: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            enemies: vec![
                EnemySpec::new("man", 150),
                EnemySpec::new("old_woman", 250),
                EnemySpec::new("kid_and_dog", 500),
            ],
            damage_per_tile: DEFAULT_DAMAGE_PER_TILE,
        }
    }
}

impl BattleConfig {
    /// Single-enemy config, handy for quick games
    pub fn single(name: &str, max_health: u32) -> Self {
        Self {
            enemies: vec![EnemySpec::new(name, max_health)],
            ..Default::default()
        }
    }

    /// Set damage per tile
    pub fn with_damage_per_tile(mut self, damage: u32) -> Self {
        self.damage_per_tile = damage;
        self
    }

    /// Total health across the roster
    pub fn total_health(&self) -> u64 {
        self.enemies.iter().map(|e| u64::from(e.max_health)).sum()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.enemies.is_empty() {
            anyhow::bail!("Battle needs at least one enemy");
        }
        if let Some(enemy) = self.enemies.iter().find(|e| e.max_health == 0) {
            anyhow::bail!("Enemy {} has zero health", enemy.name);
        }
        if self.damage_per_tile == 0 {
            anyhow::bail!("Damage per tile must be positive");
        }
        Ok(())
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read battle config: {}", path.display()))?;
        let config: BattleConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid battle config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
