//! Attack resolution
//!
//! One attack: preconditions, stamina cost, archetype damage table, defender
//! resistance, jitter, critical roll, then defeat handling and the reputation
//! trigger for hunters.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::combat::constants::*;
use crate::core::error::ActionFailure;
use crate::entity::{Archetype, Entity, Role};
use crate::reputation::{ReputationAction, ReputationChange, ReputationContext, ReputationEconomy};

/// Result of a landed attack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub damage: i32,
    pub critical: bool,
    pub defeated: bool,
    /// Reputation movement for a hunter that scored the kill
    pub reputation: Option<ReputationChange>,
    pub trophy: Option<String>,
}

/// Damage before resistance and randomness
pub fn base_damage(attacker: &Entity) -> i32 {
    match &attacker.role {
        Role::Hunter(hunter) => {
            let bonus = ((hunter.reputation / REPUTATION_PER_DAMAGE_POINT) as i32)
                .min(REPUTATION_DAMAGE_BONUS_CAP);
            let damage = LEARNER_BASE_DAMAGE + bonus;
            if hunter.encumbered {
                (damage as f64 * ENCUMBERED_DAMAGE_FACTOR) as i32
            } else {
                damage
            }
        }
        Role::Boss(boss) => {
            BOSS_BASE_DAMAGE
                + boss.aggression * DAMAGE_PER_AGGRESSION
                + (boss.attack_power - crate::entity::boss::BASE_ATTACK_POWER)
        }
        Role::Wildlife(wildlife) => WILDLIFE_DAMAGE_PER_TIER * wildlife.tier as i32,
        Role::Support(_) => SUPPORT_BASE_DAMAGE,
    }
}

/// Base damage after the defender's resistance
pub fn resisted_damage(attacker: &Entity, defender: &Entity) -> i32 {
    let base = base_damage(attacker);
    if defender.archetype() == Archetype::Boss {
        (base as f64 * BOSS_RESISTANCE) as i32
    } else {
        base
    }
}

/// Apply jitter, the damage floor and the critical roll
pub fn roll_damage<R: Rng>(base: i32, rng: &mut R) -> (i32, bool) {
    let variance = rng.gen_range(DAMAGE_VARIANCE_MIN..=DAMAGE_VARIANCE_MAX);
    let damage = ((base as f64 * variance) as i32).max(MIN_DAMAGE);
    if rng.gen_bool(CRITICAL_CHANCE) {
        (((damage as f64 * CRITICAL_MULTIPLIER) as i32).max(MIN_DAMAGE), true)
    } else {
        (damage, false)
    }
}

/// Check every precondition of an attack without changing anything
pub fn check_attack(attacker: &Entity, defender: &Entity, max_range: i32) -> Result<(), ActionFailure> {
    if !attacker.is_alive() {
        return Err(ActionFailure::AttackerDead);
    }
    if !defender.is_alive() {
        return Err(ActionFailure::TargetDead);
    }
    if !defender.archetype().is_combatant() {
        return Err(ActionFailure::InvalidTarget);
    }
    if attacker.position.manhattan(&defender.position) > max_range {
        return Err(ActionFailure::OutOfRange);
    }
    if let Some(stamina) = attacker.stamina() {
        if stamina < MIN_ATTACK_STAMINA {
            return Err(ActionFailure::Exhausted);
        }
    }
    Ok(())
}

pub fn can_attack(attacker: &Entity, defender: &Entity, max_range: i32) -> bool {
    check_attack(attacker, defender, max_range).is_ok()
}

/// Resolve one attack. Range is the caller's concern; see `check_attack`.
///
/// Failures leave both entities untouched.
pub fn resolve_attack<R: Rng>(
    attacker: &mut Entity,
    defender: &mut Entity,
    economy: &ReputationEconomy,
    rng: &mut R,
) -> Result<AttackOutcome, ActionFailure> {
    if !attacker.is_alive() {
        return Err(ActionFailure::AttackerDead);
    }
    if !defender.is_alive() {
        return Err(ActionFailure::TargetDead);
    }
    if let Some(stamina) = attacker.stamina() {
        if stamina < MIN_ATTACK_STAMINA {
            return Err(ActionFailure::Exhausted);
        }
    }

    attacker.drain_stamina(ATTACK_STAMINA_COST);

    let (damage, critical) = roll_damage(resisted_damage(attacker, defender), rng);
    defender.take_damage(damage);
    let defeated = !defender.is_alive();

    debug!(
        attacker = %attacker.name,
        defender = %defender.name,
        damage,
        critical,
        defender_health = defender.vitals.health,
        "attack landed"
    );

    let mut outcome = AttackOutcome {
        damage,
        critical,
        defeated,
        reputation: None,
        trophy: None,
    };

    if defeated {
        info!(attacker = %attacker.name, defender = %defender.name, "defeated");
        if attacker.archetype() == Archetype::Learner {
            award_defeat(attacker, defender, economy, &mut outcome);
        }
    }

    Ok(outcome)
}

/// Reputation trigger and trophy for a hunter's kill
fn award_defeat(
    attacker: &mut Entity,
    defender: &Entity,
    economy: &ReputationEconomy,
    outcome: &mut AttackOutcome,
) {
    let (action, context, trophy) = match &defender.role {
        Role::Wildlife(wildlife) if wildlife.is_worthy() => (
            ReputationAction::HuntWorthyPrey,
            ReputationContext::target(defender),
            Some(defender.name.clone()),
        ),
        Role::Wildlife(_) => (
            ReputationAction::HuntUnworthyPrey,
            ReputationContext::target(defender),
            None,
        ),
        Role::Boss(_) => (
            ReputationAction::DefeatBoss,
            ReputationContext::target(defender),
            Some(format!("ULTIMATE_TROPHY_{}", defender.name)),
        ),
        Role::Hunter(hunter) => (
            ReputationAction::SuccessfulChallenge,
            ReputationContext::opponent(hunter.reputation),
            None,
        ),
        Role::Support(_) => return,
    };

    outcome.reputation = Some(economy.apply(attacker, action, &context));

    if let Some(trophy) = trophy {
        if let Some(hunter) = attacker.hunter_mut() {
            hunter.trophies.push(trophy.clone());
        }
        info!(hunter = %attacker.name, trophy = %trophy, "trophy collected");
        outcome.trophy = Some(trophy);
    }
}
