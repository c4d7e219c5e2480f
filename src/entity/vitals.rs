//! Health and stamina pools

use serde::{Deserialize, Serialize};

/// Health state of an entity
///
/// Health is clamped to [0, max]; reaching 0 clears the alive flag for good.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: i32,
    pub max_health: i32,
    pub alive: bool,
}

impl Vitals {
    pub fn new(max_health: i32) -> Self {
        Self {
            health: max_health,
            max_health,
            alive: max_health > 0,
        }
    }

    /// Apply damage, returning how much health was actually lost
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        if !self.alive || amount <= 0 {
            return 0;
        }
        let before = self.health;
        self.health = (self.health - amount).max(0);
        if self.health == 0 {
            self.alive = false;
        }
        before - self.health
    }

    /// Heal a living entity up to its maximum
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.alive || amount <= 0 {
            return 0;
        }
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        self.health - before
    }

    /// Current health as a fraction of maximum
    pub fn fraction(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health as f64 / self.max_health as f64
    }

    /// Below 20% of maximum, the "too wounded" line used by hunt validation
    pub fn is_critical(&self) -> bool {
        (self.health as f64) < self.max_health as f64 * 0.2
    }
}

/// Stamina pool, clamped to [0, max]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamina {
    pub current: i32,
    pub max: i32,
}

impl Stamina {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Drain stamina, flooring at zero
    pub fn drain(&mut self, amount: i32) {
        self.current = (self.current - amount).clamp(0, self.max);
    }

    pub fn recover(&mut self, amount: i32) {
        self.current = (self.current + amount).clamp(0, self.max);
    }

    pub fn has(&self, amount: i32) -> bool {
        self.current >= amount
    }
}
