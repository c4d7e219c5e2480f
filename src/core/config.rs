//! Simulation configuration with documented constants
//!
//! Every tunable number of a run lives here. A config is validated once when a
//! simulation is built; a config that fails validation never starts a run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{BadlandsError, Result};
use crate::core::types::GridPos;
use crate::entity::hunter::HunterMind;
use crate::reputation::rank::RankThresholds;
use crate::spatial::grid::BoundaryMode;

/// Top-level configuration for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the run's random number generator
    pub seed: u64,
    /// Tick ceiling; reaching it ends the run as a timeout
    pub max_ticks: u64,
    pub grid: GridConfig,
    pub hunter: HunterConfig,
    pub support: SupportConfig,
    pub boss: BossConfig,
    pub wildlife: WildlifeConfig,
    pub learning: LearningConfig,
    pub discretization: DiscretizationConfig,
    pub ranks: RankThresholds,
    pub hazards: HazardConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_ticks: 500,
            grid: GridConfig::default(),
            hunter: HunterConfig::default(),
            support: SupportConfig::default(),
            boss: BossConfig::default(),
            wildlife: WildlifeConfig::default(),
            learning: LearningConfig::default(),
            discretization: DiscretizationConfig::default(),
            ranks: RankThresholds::default(),
            hazards: HazardConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
    /// Wrap or clamp at the edges, fixed for the whole run
    pub boundary: BoundaryMode,
    /// Number of impassable cells scattered at world creation
    pub obstacles: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 30,
            boundary: BoundaryMode::Wrap,
            obstacles: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HunterConfig {
    pub position: GridPos,
    pub health: i32,
    pub stamina: i32,
    pub reputation: u32,
    /// Learning hunter or the fixed rule-based baseline
    pub mind: HunterMind,
    /// Scripted clan members that issue challenges when close to the hunter
    pub clan_rivals: usize,
    /// Reputation each clan rival starts with
    pub rival_reputation: u32,
}

impl Default for HunterConfig {
    fn default() -> Self {
        Self {
            position: GridPos::new(2, 2),
            health: 100,
            stamina: 100,
            reputation: 0,
            mind: HunterMind::Learning,
            clan_rivals: 0,
            rival_reputation: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportConfig {
    pub enabled: bool,
    pub position: GridPos,
    pub health: i32,
    /// Damaged support units cannot move on their own
    pub damaged: bool,
    /// Ticks between scheduled advice broadcasts
    pub advice_interval: u64,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            position: GridPos::new(3, 2),
            health: 50,
            damaged: true,
            advice_interval: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    pub position: GridPos,
    pub health: i32,
    /// Distance at which the boss starts chasing
    pub threat_radius: i32,
    /// Adaptive bosses detect patterns and unlock abilities
    pub adaptive: bool,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            position: GridPos::new(20, 20),
            health: 500,
            threat_radius: 5,
            adaptive: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WildlifeConfig {
    pub count: usize,
    pub health: i32,
    /// Threat tiers are drawn uniformly from [min_tier, max_tier]
    pub min_tier: u8,
    pub max_tier: u8,
}

impl Default for WildlifeConfig {
    fn default() -> Self {
        Self {
            count: 10,
            health: 30,
            min_tier: 1,
            max_tier: 3,
        }
    }
}

/// Parameters of the tabular learner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Step size of the temporal-difference update (α)
    pub learning_rate: f64,
    /// Weight of the best future estimate (γ)
    pub discount_factor: f64,
    /// Initial exploration rate (ε₀)
    pub epsilon: f64,
    /// Multiplicative decay applied once per decay cycle
    pub epsilon_decay: f64,
    /// Exploration never drops below this
    pub epsilon_floor: f64,
    /// Ticks between decay cycles
    pub decay_interval: u64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.15,
            discount_factor: 0.9,
            epsilon: 0.4,
            epsilon_decay: 0.995,
            epsilon_floor: 0.05,
            decay_interval: 50,
        }
    }
}

/// Bucket boundaries for turning hunter readings into a state key
///
/// Each "low"/"close" bound is inclusive: health 40 is low, 41 is medium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscretizationConfig {
    pub health_low: i32,
    pub health_medium: i32,
    pub stamina_low: i32,
    pub stamina_medium: i32,
    /// Reputation below this is "low"
    pub reputation_blooded: u32,
    /// Reputation below this is "blooded"
    pub reputation_ready: u32,
    /// Reputation below this is "ready", at or above is "elite"
    pub reputation_elite: u32,
    /// Radius for counting huntable wildlife
    pub density_radius: i32,
    /// Wildlife count at which density reads "many"
    pub density_many: usize,
    pub boss_close: i32,
    pub boss_near: i32,
}

impl Default for DiscretizationConfig {
    fn default() -> Self {
        Self {
            health_low: 40,
            health_medium: 70,
            stamina_low: 30,
            stamina_medium: 60,
            reputation_blooded: 30,
            reputation_ready: 50,
            reputation_elite: 80,
            density_radius: 5,
            density_many: 3,
            boss_close: 3,
            boss_near: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardConfig {
    /// Single-use traps scattered at world creation
    pub traps: usize,
    /// Patches of stamina-draining terrain
    pub hostile_terrain: usize,
    /// Whether random weather events can start
    pub weather: bool,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            traps: 10,
            hostile_terrain: 0,
            weather: true,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config with a different seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse a config from TOML; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_ticks == 0 {
            return Err("max_ticks must be at least one tick".into());
        }

        let grid = &self.grid;
        if grid.width <= 0 || grid.height <= 0 {
            return Err(BadlandsError::Config(format!(
                "grid dimensions must be positive, got {}x{}",
                grid.width, grid.height
            )));
        }

        let in_bounds =
            |pos: &GridPos| pos.x >= 0 && pos.y >= 0 && pos.x < grid.width && pos.y < grid.height;
        if !in_bounds(&self.hunter.position) {
            return Err(BadlandsError::Config(format!(
                "hunter start {} is outside the grid",
                self.hunter.position
            )));
        }
        if !in_bounds(&self.boss.position) {
            return Err(BadlandsError::Config(format!(
                "boss start {} is outside the grid",
                self.boss.position
            )));
        }
        if self.support.enabled && !in_bounds(&self.support.position) {
            return Err(BadlandsError::Config(format!(
                "support start {} is outside the grid",
                self.support.position
            )));
        }

        if self.hunter.health <= 0 || self.hunter.stamina <= 0 || self.boss.health <= 0 {
            return Err("starting health and stamina must be positive".into());
        }
        if self.wildlife.count > 0 && self.wildlife.health <= 0 {
            return Err("wildlife health must be positive".into());
        }
        if self.wildlife.min_tier > self.wildlife.max_tier {
            return Err(BadlandsError::Config(format!(
                "wildlife min_tier ({}) exceeds max_tier ({})",
                self.wildlife.min_tier, self.wildlife.max_tier
            )));
        }
        if self.boss.threat_radius < 0 {
            return Err("boss threat_radius must not be negative".into());
        }

        let learning = &self.learning;
        if !(learning.learning_rate > 0.0 && learning.learning_rate <= 1.0) {
            return Err("learning_rate must be in (0, 1]".into());
        }
        if !(0.0..=1.0).contains(&learning.discount_factor) {
            return Err("discount_factor must be in [0, 1]".into());
        }
        if !(0.0..=1.0).contains(&learning.epsilon) || !(0.0..=1.0).contains(&learning.epsilon_floor)
        {
            return Err("epsilon and epsilon_floor must be in [0, 1]".into());
        }
        if !(learning.epsilon_decay > 0.0 && learning.epsilon_decay <= 1.0) {
            return Err("epsilon_decay must be in (0, 1]".into());
        }
        if learning.decay_interval == 0 {
            return Err("decay_interval must be at least one tick".into());
        }

        self.discretization.validate()?;
        self.ranks.validate()?;

        if self.support.advice_interval == 0 {
            return Err("support advice_interval must be at least one tick".into());
        }

        Ok(())
    }
}

impl DiscretizationConfig {
    /// Bucket bounds must be strictly ordered or some levels become unreachable
    pub fn validate(&self) -> Result<()> {
        if self.health_low >= self.health_medium {
            return Err(BadlandsError::Config(format!(
                "health_low ({}) must be < health_medium ({})",
                self.health_low, self.health_medium
            )));
        }
        if self.stamina_low >= self.stamina_medium {
            return Err(BadlandsError::Config(format!(
                "stamina_low ({}) must be < stamina_medium ({})",
                self.stamina_low, self.stamina_medium
            )));
        }
        if !(self.reputation_blooded < self.reputation_ready
            && self.reputation_ready < self.reputation_elite)
        {
            return Err(BadlandsError::Config(format!(
                "reputation bounds must ascend, got {} / {} / {}",
                self.reputation_blooded, self.reputation_ready, self.reputation_elite
            )));
        }
        if self.boss_close >= self.boss_near {
            return Err(BadlandsError::Config(format!(
                "boss_close ({}) must be < boss_near ({})",
                self.boss_close, self.boss_near
            )));
        }
        if self.density_radius < 0 || self.density_many == 0 {
            return Err("density bounds must be positive".into());
        }
        Ok(())
    }
}

impl From<&str> for BadlandsError {
    fn from(message: &str) -> Self {
        BadlandsError::Config(message.to_string())
    }
}
