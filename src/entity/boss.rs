//! Boss creature state

use serde::{Deserialize, Serialize};

use crate::adversary::memory::{AdaptiveMemory, OutcomeRecord};
use crate::core::types::GridPos;

pub const BASE_AGGRESSION: i32 = 5;
pub const MAX_AGGRESSION: i32 = 10;
pub const BASE_ATTACK_POWER: i32 = 30;
/// Threat radius growth from being wounded stops here
pub const WOUNDED_THREAT_RADIUS_CAP: i32 = 10;
/// No bonus can push the effective threat radius past this
pub const MAX_THREAT_RADIUS: i32 = 15;
/// Half-width of the square patrol route around the spawn point
pub const PATROL_HALF_WIDTH: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementPattern {
    Patrol,
    Chase,
    Defend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossState {
    pub threat_radius: i32,
    pub aggression: i32,
    pub attack_power: i32,
    pub territory_center: GridPos,
    pub patrol_route: Vec<GridPos>,
    pub patrol_index: usize,
    pub movement: MovementPattern,
    pub times_attacked: u32,
    pub successful_defences: u32,
    /// Present only for the adaptive variant
    pub adaptive: Option<AdaptiveMemory>,
}

impl BossState {
    pub fn new(territory_center: GridPos, threat_radius: i32, adaptive: bool) -> Self {
        Self {
            threat_radius,
            aggression: BASE_AGGRESSION,
            attack_power: BASE_ATTACK_POWER,
            territory_center,
            patrol_route: square_route(territory_center),
            patrol_index: 0,
            movement: MovementPattern::Patrol,
            times_attacked: 0,
            successful_defences: 0,
            adaptive: adaptive.then(AdaptiveMemory::new),
        }
    }

    pub fn is_adaptive(&self) -> bool {
        self.adaptive.is_some()
    }

    /// Threat radius including any temporary zone-control bonus
    pub fn effective_threat_radius(&self) -> i32 {
        let bonus = self.adaptive.as_ref().map_or(0, |memory| memory.threat_bonus);
        if bonus > 0 {
            (self.threat_radius + bonus).min(MAX_THREAT_RADIUS)
        } else {
            self.threat_radius
        }
    }

    /// Radius at which the boss gives chase
    pub fn chase_radius(&self) -> f64 {
        let multiplier = self
            .adaptive
            .as_ref()
            .map_or(1.0, |memory| memory.chase_multiplier);
        self.effective_threat_radius() as f64 * multiplier
    }

    /// Bookkeeping after a hit landed on the boss.
    ///
    /// Returns the health to restore through adaptive armour (0 without it).
    pub fn on_damaged(&mut self, actual: i32, health_after: i32, alive: bool) -> i32 {
        self.times_attacked += 1;
        if alive {
            self.successful_defences += 1;
            self.aggression = (self.aggression + 1).min(MAX_AGGRESSION);
            if self.threat_radius < WOUNDED_THREAT_RADIUS_CAP {
                self.threat_radius += 1;
            }
        }

        let Some(memory) = self.adaptive.as_mut() else {
            return 0;
        };
        memory.total_damage_received += actual;
        memory.outcomes.push(OutcomeRecord {
            damage: actual,
            health_after,
            retreated: None,
        });

        if memory.abilities.adaptive_armour && alive {
            actual / 10
        } else {
            0
        }
    }
}

/// Square patrol route around a centre, clockwise from the top-left corner
pub fn square_route(center: GridPos) -> Vec<GridPos> {
    let d = PATROL_HALF_WIDTH;
    vec![
        GridPos::new(center.x - d, center.y - d),
        GridPos::new(center.x + d, center.y - d),
        GridPos::new(center.x + d, center.y + d),
        GridPos::new(center.x - d, center.y + d),
    ]
}
