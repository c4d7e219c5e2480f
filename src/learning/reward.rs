//! Reward shaping and the temporal-difference update

use crate::learning::policy::LearnerAction;
use crate::learning::state_key::Observation;

pub const REPUTATION_REWARD_SCALE: f64 = 10.0;
pub const SURVIVAL_BONUS: f64 = 1.0;
pub const DEATH_PENALTY: f64 = -200.0;
pub const CRITICAL_HEALTH: i32 = 20;
pub const CRITICAL_HEALTH_PENALTY: f64 = -10.0;
pub const HEALTHY: i32 = 70;
pub const HEALTHY_BONUS: f64 = 2.0;
pub const EXHAUSTED: i32 = 10;
pub const EXHAUSTION_PENALTY: f64 = -2.0;
/// Reputation and health at which closing on the boss is rewarded
pub const READY_REPUTATION: u32 = 50;
pub const READY_HEALTH: i32 = 50;
pub const CLOSE_TO_BOSS_BONUS: f64 = 15.0;
pub const NEAR_BOSS_BONUS: f64 = 8.0;
pub const UNREADY_PROXIMITY_PENALTY: f64 = -5.0;
pub const TROPHY_BONUS: f64 = 5.0;
pub const IDLE_PENALTY: f64 = -5.0;
/// Resting above this stamina counts as idling
pub const IDLE_STAMINA: i32 = 50;

/// Shaped reward for the hunter's situation after its last action.
///
/// `previous_reputation` is the reputation recorded when that action was
/// selected.
pub fn shaped_reward(
    observation: &Observation,
    previous_reputation: u32,
    last_action: LearnerAction,
) -> f64 {
    let mut reward = 0.0;

    let delta = observation.reputation as i64 - previous_reputation as i64;
    reward += delta as f64 * REPUTATION_REWARD_SCALE;

    reward += if observation.alive {
        SURVIVAL_BONUS
    } else {
        DEATH_PENALTY
    };

    if observation.health < CRITICAL_HEALTH {
        reward += CRITICAL_HEALTH_PENALTY;
    } else if observation.health > HEALTHY {
        reward += HEALTHY_BONUS;
    }

    if observation.stamina < EXHAUSTED {
        reward += EXHAUSTION_PENALTY;
    }

    if let Some(distance) = observation.boss_distance() {
        let ready = observation.reputation >= READY_REPUTATION && observation.health > READY_HEALTH;
        if ready {
            if distance < 5 {
                reward += CLOSE_TO_BOSS_BONUS;
            } else if distance < 10 {
                reward += NEAR_BOSS_BONUS;
            }
        } else if distance < 5 {
            reward += UNREADY_PROXIMITY_PENALTY;
        }
    }

    reward += observation.trophies as f64 * TROPHY_BONUS;

    if last_action == LearnerAction::Rest && observation.stamina > IDLE_STAMINA {
        reward += IDLE_PENALTY;
    }

    reward
}

/// `old + α (reward + γ max_future − old)`
#[inline]
pub fn td_update(old: f64, reward: f64, max_future: f64, alpha: f64, gamma: f64) -> f64 {
    old + alpha * (reward + gamma * max_future - old)
}
