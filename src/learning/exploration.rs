//! Exploration-rate schedule

use serde::{Deserialize, Serialize};

use crate::core::config::LearningConfig;
use crate::core::types::Tick;

/// ε after `cycles` decay steps: `max(floor, initial * rate^cycles)`.
///
/// Recomputed from the initial value each time rather than multiplied in
/// place, so the value after N cycles is exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationSchedule {
    initial: f64,
    rate: f64,
    floor: f64,
    interval: u64,
    cycles: u32,
    epsilon: f64,
}

impl ExplorationSchedule {
    pub fn new(initial: f64, rate: f64, floor: f64, interval: u64) -> Self {
        Self {
            initial,
            rate,
            floor,
            interval,
            cycles: 0,
            epsilon: initial.max(floor),
        }
    }

    pub fn from_config(config: &LearningConfig) -> Self {
        Self::new(
            config.epsilon,
            config.epsilon_decay,
            config.epsilon_floor,
            config.decay_interval,
        )
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Whether the schedule decays at the end of `tick`
    pub fn is_decay_tick(&self, tick: Tick) -> bool {
        self.interval > 0 && tick > 0 && tick % self.interval == 0
    }

    pub fn decay(&mut self) -> f64 {
        self.cycles += 1;
        self.epsilon = (self.initial * self.rate.powi(self.cycles as i32)).max(self.floor);
        self.epsilon
    }
}
