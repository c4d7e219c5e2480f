//! What an adaptive boss remembers between decisions

use serde::{Deserialize, Serialize};

use crate::adversary::abilities::{Abilities, Ability};
use crate::adversary::history::RingBuffer;
use crate::core::types::GridPos;

/// Opponent positions kept for pattern detection
pub const POSITION_HISTORY_CAPACITY: usize = 30;
/// Attack outcomes kept for pattern detection
pub const OUTCOME_HISTORY_CAPACITY: usize = 20;

/// One hit the boss received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub damage: i32,
    pub health_after: i32,
    /// Whether the attacker backed off before the boss's next decision;
    /// `None` until that decision happens
    pub retreated: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveMemory {
    pub positions: RingBuffer<GridPos>,
    pub outcomes: RingBuffer<OutcomeRecord>,
    pub abilities: Abilities,
    pub chase_multiplier: f64,
    pub total_damage_received: i32,
    pub circle_detections: u32,
    pub hit_run_detections: u32,
    /// Temporary threat radius bonus while countering hit-and-run
    pub threat_bonus: i32,
    /// Attack power before the current berserker window, if one is open
    pub berserk_base_power: Option<i32>,
    pub combat_encounters: u32,
}

/// Snapshot of how far an adaptive boss has adapted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationStats {
    pub combat_encounters: u32,
    pub circle_detections: u32,
    pub hit_run_detections: u32,
    pub abilities: Vec<Ability>,
    pub chase_multiplier: f64,
    pub threat_radius: i32,
    pub total_damage_received: i32,
    pub adaptation_level: usize,
}

impl Default for AdaptiveMemory {
    fn default() -> Self {
        Self {
            positions: RingBuffer::new(POSITION_HISTORY_CAPACITY),
            outcomes: RingBuffer::new(OUTCOME_HISTORY_CAPACITY),
            abilities: Abilities::default(),
            chase_multiplier: 1.0,
            total_damage_received: 0,
            circle_detections: 0,
            hit_run_detections: 0,
            threat_bonus: 0,
            berserk_base_power: None,
            combat_encounters: 0,
        }
    }
}

impl AdaptiveMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self, threat_radius: i32) -> AdaptationStats {
        AdaptationStats {
            combat_encounters: self.combat_encounters,
            circle_detections: self.circle_detections,
            hit_run_detections: self.hit_run_detections,
            abilities: self.abilities.unlocked(),
            chase_multiplier: self.chase_multiplier,
            threat_radius,
            total_damage_received: self.total_damage_received,
            adaptation_level: self.abilities.level(),
        }
    }

    /// Settle every outcome still waiting on the attacker's reaction
    pub fn resolve_pending_outcomes(&mut self, opponent_distance: i32) {
        let retreated = opponent_distance > 1;
        for record in self.outcomes.iter_mut() {
            if record.retreated.is_none() {
                record.retreated = Some(retreated);
            }
        }
    }
}
