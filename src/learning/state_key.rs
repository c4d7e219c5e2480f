//! Hunter observations and their discretization into value-table keys
//!
//! Five readings are bucketed and joined with underscores, e.g.
//! `high_medium_low_some_far`:
//! health, stamina, reputation, wildlife density, boss proximity.

use serde::{Deserialize, Serialize};

use crate::core::config::DiscretizationConfig;
use crate::core::types::{EntityId, GridPos};

/// Another entity as the hunter sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sighting {
    pub id: EntityId,
    pub position: GridPos,
}

/// Everything the learning policy reads about the world for one decision
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub position: GridPos,
    pub alive: bool,
    pub health: i32,
    pub stamina: i32,
    pub reputation: u32,
    pub trophies: usize,
    /// Living wildlife in registry order
    pub wildlife: Vec<Sighting>,
    /// The living boss, if any
    pub boss: Option<Sighting>,
}

impl Observation {
    pub fn boss_distance(&self) -> Option<i32> {
        self.boss.map(|boss| self.position.manhattan(&boss.position))
    }

    /// Wildlife within `radius`, in registry order
    pub fn wildlife_within(&self, radius: i32) -> impl Iterator<Item = &Sighting> + '_ {
        self.wildlife
            .iter()
            .filter(move |sighting| self.position.manhattan(&sighting.position) <= radius)
    }

    /// Closest wildlife within `radius`; the earliest registered wins ties
    pub fn closest_wildlife(&self, radius: i32) -> Option<Sighting> {
        self.wildlife_within(radius)
            .min_by_key(|sighting| self.position.manhattan(&sighting.position))
            .copied()
    }
}

/// Discretized state, e.g. `low_high_blooded_none_near`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl StateKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateKey {
    fn from(key: &str) -> Self {
        StateKey(key.to_string())
    }
}

pub fn health_level(health: i32, config: &DiscretizationConfig) -> &'static str {
    if health <= config.health_low {
        "low"
    } else if health <= config.health_medium {
        "medium"
    } else {
        "high"
    }
}

pub fn stamina_level(stamina: i32, config: &DiscretizationConfig) -> &'static str {
    if stamina <= config.stamina_low {
        "low"
    } else if stamina <= config.stamina_medium {
        "medium"
    } else {
        "high"
    }
}

pub fn reputation_level(reputation: u32, config: &DiscretizationConfig) -> &'static str {
    if reputation < config.reputation_blooded {
        "low"
    } else if reputation < config.reputation_ready {
        "blooded"
    } else if reputation < config.reputation_elite {
        "ready"
    } else {
        "elite"
    }
}

pub fn density_level(count: usize, config: &DiscretizationConfig) -> &'static str {
    if count == 0 {
        "none"
    } else if count < config.density_many {
        "some"
    } else {
        "many"
    }
}

pub fn boss_level(distance: Option<i32>, config: &DiscretizationConfig) -> &'static str {
    match distance {
        None => "none",
        Some(d) if d <= config.boss_close => "close",
        Some(d) if d <= config.boss_near => "near",
        Some(_) => "far",
    }
}

pub fn discretize(observation: &Observation, config: &DiscretizationConfig) -> StateKey {
    let density = observation.wildlife_within(config.density_radius).count();
    StateKey(format!(
        "{}_{}_{}_{}_{}",
        health_level(observation.health, config),
        stamina_level(observation.stamina, config),
        reputation_level(observation.reputation, config),
        density_level(density, config),
        boss_level(observation.boss_distance(), config),
    ))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn observation(health: i32, stamina: i32, reputation: u32) -> Observation {
        Observation {
            position: GridPos::new(10, 10),
            alive: true,
            health,
            stamina,
            reputation,
            trophies: 0,
            wildlife: Vec::new(),
            boss: None,
        }
    }

    pub(crate) fn sighting(id: u32, x: i32, y: i32) -> Sighting {
        Sighting {
            id: EntityId(id),
            position: GridPos::new(x, y),
        }
    }

    #[test]
    fn test_bucket_boundaries_are_inclusive() {
        let config = DiscretizationConfig::default();
        assert_eq!(health_level(40, &config), "low");
        assert_eq!(health_level(41, &config), "medium");
        assert_eq!(health_level(70, &config), "medium");
        assert_eq!(health_level(71, &config), "high");
        assert_eq!(stamina_level(30, &config), "low");
        assert_eq!(stamina_level(61, &config), "high");
        assert_eq!(reputation_level(29, &config), "low");
        assert_eq!(reputation_level(30, &config), "blooded");
        assert_eq!(reputation_level(50, &config), "ready");
        assert_eq!(reputation_level(80, &config), "elite");
        assert_eq!(boss_level(Some(3), &config), "close");
        assert_eq!(boss_level(Some(8), &config), "near");
        assert_eq!(boss_level(Some(9), &config), "far");
    }

    #[test]
    fn test_key_joins_all_readings() {
        let config = DiscretizationConfig::default();
        let mut obs = observation(100, 50, 35);
        obs.wildlife = vec![sighting(2, 12, 10), sighting(3, 10, 20)];
        obs.boss = Some(sighting(4, 15, 15));
        assert_eq!(discretize(&obs, &config).as_str(), "high_medium_blooded_some_far");
    }

    #[test]
    fn test_closest_wildlife_prefers_first_registered_on_ties() {
        let mut obs = observation(100, 100, 0);
        obs.wildlife = vec![sighting(5, 12, 10), sighting(3, 8, 10), sighting(7, 11, 10)];
        assert_eq!(obs.closest_wildlife(5).map(|s| s.id), Some(EntityId(7)));
        obs.wildlife.pop();
        assert_eq!(obs.closest_wildlife(5).map(|s| s.id), Some(EntityId(5)));
        assert_eq!(obs.closest_wildlife(1), None);
    }
}
