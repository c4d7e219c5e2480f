//! Boss decision state machine
//!
//! Each decision first updates the boss's combat intelligence (unlock ladder,
//! chase tuning, opponent history), then walks the rules in priority order:
//!
//! 1. counter a detected circling pattern by intercepting
//! 2. counter detected hit-and-run with zone control
//! 3. berserker rage when wounded and unlocked
//! 4. predictive movement when unlocked and the prediction is close
//! 5. attack / chase / patrol
//!
//! A non-adaptive boss only ever runs rule 5.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adversary::abilities::{tune_chase, Ability, AREA_DENIAL_RADIUS_BONUS};
use crate::adversary::pattern::{self, Pattern};
use crate::core::types::{Direction, EntityId, GridPos};
use crate::entity::boss::{BossState, MovementPattern};

/// Circling detections needed before the boss commits to intercepting
pub const CIRCLE_DETECTIONS_TO_COUNTER: u32 = 3;
/// Hit-and-run detections needed before the boss enforces zone control
pub const HIT_RUN_DETECTIONS_TO_COUNTER: u32 = 2;
/// Temporary threat radius bonus while countering hit-and-run
pub const ZONE_CONTROL_BONUS: i32 = 2;
/// Health below which an unlocked berserker rage triggers
pub const BERSERKER_HEALTH: i32 = 200;
pub const BERSERKER_POWER_FACTOR: f64 = 1.5;
/// Predictions farther than this are ignored
pub const PREDICTIVE_REACH: i32 = 2;
/// Chance an adaptive boss jumps to a random waypoint on arrival
pub const PATROL_JITTER: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdversaryState {
    Patrol,
    Chase,
    CounterCircle,
    CounterHitRun,
    Berserker,
    Predictive,
    Attack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossAction {
    Attack(EntityId),
    Move(Direction),
    Hold,
}

/// The nearest living hunter as seen by the boss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpponentReading {
    pub id: EntityId,
    pub position: GridPos,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdversaryDecision {
    pub state: AdversaryState,
    pub action: BossAction,
    /// Abilities unlocked while preparing this decision
    pub unlocked: Vec<Ability>,
    /// Pattern whose counter drove this decision
    pub countered: Option<Pattern>,
}

/// Choose the boss's action for this tick
pub fn decide<R: Rng>(
    position: GridPos,
    health: i32,
    boss: &mut BossState,
    opponent: Option<OpponentReading>,
    rng: &mut R,
) -> AdversaryDecision {
    let unlocked = update_intelligence(boss);

    let (state, action, countered) = match opponent {
        Some(opponent) => {
            let distance = position.manhattan(&opponent.position);
            match adaptive_counter(position, health, boss, opponent, distance) {
                Some(choice) => choice,
                None => {
                    let (state, action) = standard_rule(position, boss, opponent, distance, rng);
                    (state, action, None)
                }
            }
        }
        None => (AdversaryState::Patrol, patrol_step(position, boss, rng), None),
    };
    let action = match opponent {
        Some(opponent) => sidestep_into_reach(position, action, opponent.position),
        None => action,
    };

    close_windows(boss, state);

    boss.movement = match state {
        AdversaryState::Patrol => MovementPattern::Patrol,
        AdversaryState::Attack => MovementPattern::Defend,
        _ => match action {
            BossAction::Attack(_) => MovementPattern::Defend,
            _ => MovementPattern::Chase,
        },
    };

    debug!(?state, ?action, "boss decision");

    AdversaryDecision {
        state,
        action,
        unlocked,
        countered,
    }
}

/// Unlock ladder and chase tuning; returns abilities unlocked this tick
fn update_intelligence(boss: &mut BossState) -> Vec<Ability> {
    let times_attacked = boss.times_attacked;
    let successes = boss.successful_defences;
    let Some(memory) = boss.adaptive.as_mut() else {
        return Vec::new();
    };

    let unlocked = memory
        .abilities
        .unlock_ready(times_attacked, memory.total_damage_received);
    memory.chase_multiplier = tune_chase(memory.chase_multiplier, times_attacked, successes);

    for ability in &unlocked {
        info!(ability = ability.label(), "boss unlocked ability");
        if *ability == Ability::AreaDenial {
            boss.threat_radius += AREA_DENIAL_RADIUS_BONUS;
        }
    }
    unlocked
}

/// Rules 1-4; `None` means fall through to the standard rule
fn adaptive_counter(
    position: GridPos,
    health: i32,
    boss: &mut BossState,
    opponent: OpponentReading,
    distance: i32,
) -> Option<(AdversaryState, BossAction, Option<Pattern>)> {
    let memory = boss.adaptive.as_mut()?;

    memory.resolve_pending_outcomes(distance);
    memory.positions.push(opponent.position);

    if pattern::is_circling(position, &memory.positions) {
        memory.circle_detections += 1;
        if memory.circle_detections >= CIRCLE_DETECTIONS_TO_COUNTER {
            let target = pattern::predict_next(&memory.positions, opponent.position)
                .unwrap_or(opponent.position);
            info!(predicted = %target, "boss intercepting circling pattern");
            return Some((
                AdversaryState::CounterCircle,
                move_toward(position, target),
                Some(Pattern::Circling),
            ));
        }
    }

    if pattern::is_hit_and_run(&memory.outcomes) {
        memory.hit_run_detections += 1;
        if memory.hit_run_detections >= HIT_RUN_DETECTIONS_TO_COUNTER {
            memory.threat_bonus = ZONE_CONTROL_BONUS;
            info!("boss enforcing zone control against hit-and-run");
            let action = if distance <= 1 {
                BossAction::Attack(opponent.id)
            } else {
                BossAction::Move(aggressive_direction(position, opponent.position))
            };
            return Some((AdversaryState::CounterHitRun, action, Some(Pattern::HitAndRun)));
        }
    }

    if memory.abilities.berserker_rage && health < BERSERKER_HEALTH {
        if memory.berserk_base_power.is_none() {
            memory.berserk_base_power = Some(boss.attack_power);
            boss.attack_power = (boss.attack_power as f64 * BERSERKER_POWER_FACTOR) as i32;
            info!(attack_power = boss.attack_power, "boss berserker rage");
        }
        let action = if distance <= 1 {
            BossAction::Attack(opponent.id)
        } else {
            move_toward(position, opponent.position)
        };
        return Some((AdversaryState::Berserker, action, None));
    }

    if memory.abilities.predictive_movement {
        if let Some(predicted) = pattern::predict_next(&memory.positions, opponent.position) {
            if predicted != position && position.manhattan(&predicted) <= PREDICTIVE_REACH {
                return Some((AdversaryState::Predictive, move_toward(position, predicted), None));
            }
        }
    }

    None
}

/// Rule 5: attack when adjacent, chase inside the chase radius, else patrol
fn standard_rule<R: Rng>(
    position: GridPos,
    boss: &mut BossState,
    opponent: OpponentReading,
    distance: i32,
    rng: &mut R,
) -> (AdversaryState, BossAction) {
    if distance <= 1 {
        if let Some(memory) = boss.adaptive.as_mut() {
            memory.combat_encounters += 1;
        }
        return (AdversaryState::Attack, BossAction::Attack(opponent.id));
    }
    if distance as f64 <= boss.chase_radius() {
        return (AdversaryState::Chase, move_toward(position, opponent.position));
    }
    (AdversaryState::Patrol, patrol_step(position, boss, rng))
}

/// Advance along the patrol route; adaptive bosses vary the order
fn patrol_step<R: Rng>(position: GridPos, boss: &mut BossState, rng: &mut R) -> BossAction {
    if boss.patrol_route.is_empty() {
        return Direction::CARDINALS
            .choose(rng)
            .map_or(BossAction::Hold, |&direction| BossAction::Move(direction));
    }

    let len = boss.patrol_route.len();
    boss.patrol_index %= len;
    if position == boss.patrol_route[boss.patrol_index] {
        boss.patrol_index = if boss.is_adaptive() && rng.gen_bool(PATROL_JITTER) {
            rng.gen_range(0..len)
        } else {
            (boss.patrol_index + 1) % len
        };
    }

    move_toward(position, boss.patrol_route[boss.patrol_index])
}

/// Restore temporary effects whose window ended with this decision
fn close_windows(boss: &mut BossState, state: AdversaryState) {
    let Some(memory) = boss.adaptive.as_mut() else {
        return;
    };
    if state != AdversaryState::CounterHitRun {
        memory.threat_bonus = 0;
    }
    if state != AdversaryState::Berserker {
        if let Some(base) = memory.berserk_base_power.take() {
            boss.attack_power = base;
        }
    }
}

fn move_toward(from: GridPos, to: GridPos) -> BossAction {
    if from == to {
        BossAction::Hold
    } else {
        BossAction::Move(from.octant_toward(&to))
    }
}

/// A diagonal step onto the opponent's own cell can never land. Take the
/// cardinal step that ends orthogonally adjacent instead, so the next decision
/// is in melee reach.
fn sidestep_into_reach(from: GridPos, action: BossAction, opponent: GridPos) -> BossAction {
    match action {
        BossAction::Move(direction) if direction.is_diagonal() && from.step(direction) == opponent => {
            BossAction::Move(from.cardinal_toward(&opponent))
        }
        other => other,
    }
}

/// Close the gap diagonally whenever both axes differ
fn aggressive_direction(from: GridPos, to: GridPos) -> Direction {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx != 0 && dy != 0 {
        Direction::diagonal(dx, dy)
    } else {
        from.octant_toward(&to)
    }
}
