//! Ability-unlock ladder and chase self-tuning
//!
//! Unlocks are driven by cumulative combat exposure and never revert.

use serde::{Deserialize, Serialize};

/// Times attacked before Berserker Rage becomes available
pub const BERSERKER_UNLOCK_ATTACKS: u32 = 10;
/// Times attacked before Predictive Movement becomes available
pub const PREDICTIVE_UNLOCK_ATTACKS: u32 = 15;
/// Times attacked before Area Denial becomes available
pub const AREA_DENIAL_UNLOCK_ATTACKS: u32 = 20;
/// Cumulative damage before Adaptive Armour becomes available
pub const ADAPTIVE_ARMOUR_UNLOCK_DAMAGE: i32 = 200;
/// Permanent threat radius gain from Area Denial
pub const AREA_DENIAL_RADIUS_BONUS: i32 = 3;

pub const CHASE_MULTIPLIER_FLOOR: f64 = 0.7;
pub const CHASE_MULTIPLIER_CEILING: f64 = 1.5;
pub const CHASE_MULTIPLIER_STEP: f64 = 0.1;
/// Chase tuning only starts after this many attacks
pub const CHASE_TUNING_MIN_ATTACKS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    BerserkerRage,
    PredictiveMovement,
    AreaDenial,
    AdaptiveArmour,
}

impl Ability {
    pub const ALL: [Ability; 4] = [
        Ability::BerserkerRage,
        Ability::PredictiveMovement,
        Ability::AreaDenial,
        Ability::AdaptiveArmour,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Ability::BerserkerRage => "Berserker Rage",
            Ability::PredictiveMovement => "Predictive Movement",
            Ability::AreaDenial => "Area Denial",
            Ability::AdaptiveArmour => "Adaptive Armour",
        }
    }
}

/// Unlock flags of an adaptive boss
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abilities {
    pub berserker_rage: bool,
    pub predictive_movement: bool,
    pub area_denial: bool,
    pub adaptive_armour: bool,
}

impl Abilities {
    pub fn has(&self, ability: Ability) -> bool {
        match ability {
            Ability::BerserkerRage => self.berserker_rage,
            Ability::PredictiveMovement => self.predictive_movement,
            Ability::AreaDenial => self.area_denial,
            Ability::AdaptiveArmour => self.adaptive_armour,
        }
    }

    pub fn unlocked(&self) -> Vec<Ability> {
        Ability::ALL
            .into_iter()
            .filter(|&ability| self.has(ability))
            .collect()
    }

    /// Number of abilities unlocked so far
    pub fn level(&self) -> usize {
        [
            self.berserker_rage,
            self.predictive_movement,
            self.area_denial,
            self.adaptive_armour,
        ]
        .iter()
        .filter(|&&flag| flag)
        .count()
    }

    /// Unlock everything the exposure counters qualify for.
    ///
    /// Returns only the abilities unlocked by this call. Flags are only ever
    /// set here, never cleared.
    pub fn unlock_ready(&mut self, times_attacked: u32, damage_received: i32) -> Vec<Ability> {
        let mut unlocked = Vec::new();

        if times_attacked >= BERSERKER_UNLOCK_ATTACKS && !self.berserker_rage {
            self.berserker_rage = true;
            unlocked.push(Ability::BerserkerRage);
        }
        if times_attacked >= PREDICTIVE_UNLOCK_ATTACKS && !self.predictive_movement {
            self.predictive_movement = true;
            unlocked.push(Ability::PredictiveMovement);
        }
        if times_attacked >= AREA_DENIAL_UNLOCK_ATTACKS && !self.area_denial {
            self.area_denial = true;
            unlocked.push(Ability::AreaDenial);
        }
        if damage_received >= ADAPTIVE_ARMOUR_UNLOCK_DAMAGE && !self.adaptive_armour {
            self.adaptive_armour = true;
            unlocked.push(Ability::AdaptiveArmour);
        }

        unlocked
    }
}

/// Next chase multiplier given the boss's defensive record
///
/// A boss that keeps surviving hits grows bolder; one that keeps losing
/// exchanges holds back.
pub fn tune_chase(multiplier: f64, times_attacked: u32, successful_defences: u32) -> f64 {
    if times_attacked <= CHASE_TUNING_MIN_ATTACKS {
        return multiplier;
    }
    let ratio = successful_defences as f64 / times_attacked as f64;
    if ratio > 0.7 {
        (multiplier + CHASE_MULTIPLIER_STEP).min(CHASE_MULTIPLIER_CEILING)
    } else if ratio < 0.3 {
        (multiplier - CHASE_MULTIPLIER_STEP).max(CHASE_MULTIPLIER_FLOOR)
    } else {
        multiplier
    }
}
