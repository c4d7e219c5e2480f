//! Environmental hazards: traps, hostile terrain and weather
//!
//! Traps and terrain fire when an entity ends its turn on their cell.
//! Weather is global and drains stamina from every hunter while it lasts.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::config::HazardConfig;
use crate::core::types::GridPos;
use crate::entity::Entity;
use crate::spatial::Grid;

/// Chance per tick that a new weather event starts when the sky is calm
pub const WEATHER_CHANCE: f64 = 0.1;
pub const WEATHER_MIN_DURATION: u32 = 10;
pub const WEATHER_MAX_DURATION: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrapKind {
    Spike,
    Net,
    Pit,
}

impl TrapKind {
    pub const ALL: [TrapKind; 3] = [TrapKind::Spike, TrapKind::Net, TrapKind::Pit];

    pub fn damage(&self) -> i32 {
        match self {
            Self::Spike => 15,
            Self::Net => 5,
            Self::Pit => 25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainKind {
    Rough,
    Marsh,
    Lava,
}

impl TerrainKind {
    pub const ALL: [TerrainKind; 3] = [TerrainKind::Rough, TerrainKind::Marsh, TerrainKind::Lava];

    pub fn stamina_cost(&self) -> i32 {
        match self {
            Self::Rough => 3,
            Self::Marsh => 5,
            Self::Lava => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    /// Single use
    Trap(TrapKind),
    /// Permanent
    Terrain(TerrainKind),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hazard {
    pub position: GridPos,
    pub kind: HazardKind,
    pub active: bool,
}

impl Hazard {
    pub fn trap(position: GridPos, kind: TrapKind) -> Self {
        Self {
            position,
            kind: HazardKind::Trap(kind),
            active: true,
        }
    }

    pub fn terrain(position: GridPos, kind: TerrainKind) -> Self {
        Self {
            position,
            kind: HazardKind::Terrain(kind),
            active: true,
        }
    }
}

/// What a hazard did to the entity that triggered it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardEffect {
    Trap { kind: TrapKind, damage: i32 },
    Terrain { kind: TerrainKind, stamina: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherKind {
    Storm,
    Heat,
    Fog,
    Clear,
}

impl WeatherKind {
    pub const ALL: [WeatherKind; 4] = [
        WeatherKind::Storm,
        WeatherKind::Heat,
        WeatherKind::Fog,
        WeatherKind::Clear,
    ];

    /// Stamina lost per tick by every hunter
    pub fn stamina_drain(&self) -> i32 {
        match self {
            Self::Storm => 1,
            Self::Heat => 2,
            Self::Fog => 0,
            Self::Clear => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weather {
    pub kind: WeatherKind,
    pub remaining: u32,
}

/// Weather transitions reported to the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeatherChange {
    Started { kind: WeatherKind, duration: u32 },
    Ended { kind: WeatherKind },
}

#[derive(Debug, Clone, Default)]
pub struct HazardField {
    hazards: Vec<Hazard>,
    weather: Option<Weather>,
}

impl HazardField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scatter traps and terrain over random valid cells.
    ///
    /// Draws landing on obstacles are skipped, so fewer hazards than
    /// configured may be placed.
    pub fn generate<R: Rng>(grid: &Grid, config: &HazardConfig, rng: &mut R) -> Self {
        let mut field = Self::new();
        for _ in 0..config.traps {
            let cell = grid.random_cell(rng);
            if grid.is_valid_position(cell) {
                if let Some(&kind) = TrapKind::ALL.choose(rng) {
                    field.add(Hazard::trap(cell, kind));
                }
            }
        }
        for _ in 0..config.hostile_terrain {
            let cell = grid.random_cell(rng);
            if grid.is_valid_position(cell) {
                if let Some(&kind) = TerrainKind::ALL.choose(rng) {
                    field.add(Hazard::terrain(cell, kind));
                }
            }
        }
        debug!(hazards = field.hazards.len(), "hazards placed");
        field
    }

    pub fn add(&mut self, hazard: Hazard) {
        self.hazards.push(hazard);
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn weather(&self) -> Option<Weather> {
        self.weather
    }

    /// Fire every active hazard on the entity's cell
    pub fn check_hazards(&mut self, entity: &mut Entity) -> Vec<HazardEffect> {
        let mut effects = Vec::new();
        for hazard in self.hazards.iter_mut() {
            if !hazard.active || hazard.position != entity.position {
                continue;
            }
            match hazard.kind {
                HazardKind::Trap(kind) => {
                    let damage = entity.take_damage(kind.damage());
                    hazard.active = false;
                    info!(entity = %entity.name, ?kind, damage, "trap sprung");
                    effects.push(HazardEffect::Trap { kind, damage });
                }
                HazardKind::Terrain(kind) => {
                    if entity.stamina().is_some() {
                        let cost = kind.stamina_cost();
                        entity.drain_stamina(cost);
                        debug!(entity = %entity.name, ?kind, cost, "hostile terrain");
                        effects.push(HazardEffect::Terrain { kind, stamina: cost });
                    }
                }
            }
        }
        effects
    }

    /// Advance the active weather one tick and apply it while it lasts
    pub fn update_weather(&mut self, entities: &mut [Entity]) -> Option<WeatherChange> {
        let weather = self.weather.as_mut()?;
        weather.remaining = weather.remaining.saturating_sub(1);
        if weather.remaining == 0 {
            let kind = weather.kind;
            self.weather = None;
            info!(?kind, "weather ended");
            return Some(WeatherChange::Ended { kind });
        }

        let drain = weather.kind.stamina_drain();
        if drain > 0 {
            for entity in entities.iter_mut().filter(|entity| entity.is_alive()) {
                entity.drain_stamina(drain);
            }
        }
        None
    }

    /// Maybe start a new weather event when none is active
    pub fn trigger_random_weather<R: Rng>(&mut self, rng: &mut R) -> Option<WeatherChange> {
        if self.weather.is_some() || !rng.gen_bool(WEATHER_CHANCE) {
            return None;
        }
        let kind = *WeatherKind::ALL.choose(rng)?;
        let duration = rng.gen_range(WEATHER_MIN_DURATION..=WEATHER_MAX_DURATION);
        self.start_weather(kind, duration);
        Some(WeatherChange::Started { kind, duration })
    }

    pub fn start_weather(&mut self, kind: WeatherKind, duration: u32) {
        info!(?kind, duration, "weather changed");
        self.weather = Some(Weather {
            kind,
            remaining: duration,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EntityId;
    use crate::entity::{HunterMind, HunterState, Role};
    use crate::reputation::RankThresholds;
    use crate::spatial::BoundaryMode;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn hunter_at(x: i32, y: i32) -> Entity {
        let state = HunterState::new(100, 0, HunterMind::Learning, &RankThresholds::default());
        Entity::new(EntityId(1), "Dek", GridPos::new(x, y), 100, Role::Hunter(state))
    }

    #[test]
    fn test_trap_fires_once() {
        let mut field = HazardField::new();
        field.add(Hazard::trap(GridPos::new(4, 4), TrapKind::Pit));
        let mut hunter = hunter_at(4, 4);

        let effects = field.check_hazards(&mut hunter);
        assert_eq!(effects, vec![HazardEffect::Trap { kind: TrapKind::Pit, damage: 25 }]);
        assert_eq!(hunter.vitals.health, 75);

        assert!(field.check_hazards(&mut hunter).is_empty());
        assert_eq!(hunter.vitals.health, 75);
    }

    #[test]
    fn test_terrain_is_permanent() {
        let mut field = HazardField::new();
        field.add(Hazard::terrain(GridPos::new(1, 1), TerrainKind::Marsh));
        let mut hunter = hunter_at(1, 1);
        field.check_hazards(&mut hunter);
        field.check_hazards(&mut hunter);
        assert_eq!(hunter.stamina(), Some(90));
    }

    #[test]
    fn test_heat_drains_until_it_ends() {
        let mut field = HazardField::new();
        field.start_weather(WeatherKind::Heat, 3);
        let mut entities = vec![hunter_at(0, 0)];

        assert_eq!(field.update_weather(&mut entities), None);
        assert_eq!(field.update_weather(&mut entities), None);
        assert_eq!(
            field.update_weather(&mut entities),
            Some(WeatherChange::Ended { kind: WeatherKind::Heat })
        );
        assert_eq!(entities[0].stamina(), Some(96));
        assert!(field.weather().is_none());
    }

    #[test]
    fn test_random_weather_durations_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut field = HazardField::new();
        let mut started = 0;
        for _ in 0..500 {
            if let Some(WeatherChange::Started { duration, .. }) = field.trigger_random_weather(&mut rng) {
                assert!((WEATHER_MIN_DURATION..=WEATHER_MAX_DURATION).contains(&duration));
                started += 1;
                field.weather = None;
            }
        }
        assert!(started > 0);
    }

    #[test]
    fn test_generate_skips_obstacles() {
        let mut grid = Grid::new(2, 1, BoundaryMode::Wrap);
        grid.set_obstacle(GridPos::new(0, 0));
        let config = HazardConfig {
            traps: 20,
            hostile_terrain: 0,
            weather: true,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let field = HazardField::generate(&grid, &config, &mut rng);
        assert!(!field.hazards().is_empty());
        assert!(field.hazards().iter().all(|hazard| hazard.position == GridPos::new(1, 0)));
    }
}
