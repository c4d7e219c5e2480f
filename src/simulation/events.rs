//! Events generated during a simulation tick
//!
//! Returned by `Simulation::step` so callers can log or inspect what happened
//! without reaching into the world.

use serde::Serialize;

use crate::adversary::{Ability, AdversaryState, Pattern};
use crate::core::types::{EntityId, GridPos, Tick};
use crate::learning::{LearnerAction, SelectionMode};
use crate::reputation::Rank;
use crate::simulation::hazards::{HazardEffect, WeatherChange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Running,
    Defeat,
    Victory,
    Timeout,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunState::Running)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TickEvent {
    Moved {
        entity: EntityId,
        from: GridPos,
        to: GridPos,
    },
    Rested {
        entity: EntityId,
    },
    Attacked {
        attacker: EntityId,
        defender: EntityId,
        damage: i32,
        critical: bool,
    },
    Defeated {
        attacker: EntityId,
        defender: EntityId,
    },
    Challenged {
        winner: EntityId,
        loser: EntityId,
    },
    ReputationChanged {
        entity: EntityId,
        delta: i32,
        reputation: u32,
    },
    RankChanged {
        entity: EntityId,
        from: Rank,
        to: Rank,
    },
    TrophyCollected {
        entity: EntityId,
        trophy: String,
    },
    /// A precondition failed; nothing changed
    ActionFailed {
        entity: EntityId,
        action: &'static str,
        reason: &'static str,
    },
    LearnerDecision {
        entity: EntityId,
        action: LearnerAction,
        mode: SelectionMode,
    },
    ValueUpdated {
        entity: EntityId,
        reward: f64,
    },
    BossDecision {
        entity: EntityId,
        state: AdversaryState,
    },
    PatternCountered {
        entity: EntityId,
        pattern: Pattern,
    },
    AbilityUnlocked {
        entity: EntityId,
        ability: Ability,
    },
    Advice {
        support: EntityId,
        hunter: EntityId,
        text: String,
    },
    Scanned {
        support: EntityId,
        cells: usize,
        dangers: usize,
    },
    PickedUp {
        carrier: EntityId,
        support: EntityId,
    },
    PutDown {
        carrier: EntityId,
        support: EntityId,
    },
    Hazard {
        entity: EntityId,
        effect: HazardEffect,
    },
    Weather(WeatherChange),
    ExplorationDecayed {
        epsilon: f64,
    },
    Pruned {
        entity: EntityId,
    },
    Finished {
        tick: Tick,
        state: RunState,
    },
}
