//! World construction from a validated config
//!
//! Registration order is turn order: the hunter, the support unit, the boss,
//! clan rivals, then wildlife.

use rand::Rng;
use tracing::{debug, warn};

use crate::core::config::SimulationConfig;
use crate::core::types::{EntityId, GridPos};
use crate::ecs::World;
use crate::entity::{BossState, HunterMind, HunterState, MovementStyle, Role, SupportState, WildlifeState};
use crate::simulation::hazards::HazardField;
use crate::spatial::Grid;

pub const HUNTER_NAME: &str = "Dek";
pub const SUPPORT_NAME: &str = "Thia";
pub const BOSS_NAME: &str = "The Great Beast";

/// Ids of the named participants of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cast {
    pub protagonist: EntityId,
    pub support: Option<EntityId>,
    pub boss: EntityId,
    pub rivals: Vec<EntityId>,
    pub wildlife: Vec<EntityId>,
}

fn scatter_obstacles<R: Rng>(grid: &mut Grid, count: usize, reserved: &[GridPos], rng: &mut R) {
    for _ in 0..count {
        let cell = grid.random_cell(rng);
        if !reserved.contains(&cell) {
            grid.set_obstacle(cell);
        }
    }
}

/// Build the world, its cast and the hazard field for one run
pub fn build_world<R: Rng>(config: &SimulationConfig, rng: &mut R) -> (World, Cast, HazardField) {
    let mut grid = Grid::new(config.grid.width, config.grid.height, config.grid.boundary);
    let mut reserved = vec![config.hunter.position, config.boss.position];
    if config.support.enabled {
        reserved.push(config.support.position);
    }
    scatter_obstacles(&mut grid, config.grid.obstacles, &reserved, rng);

    let mut world = World::new(grid);

    let hunter = &config.hunter;
    let protagonist = world.spawn(
        HUNTER_NAME,
        hunter.position,
        hunter.health,
        Role::Hunter(HunterState::new(hunter.stamina, hunter.reputation, hunter.mind, &config.ranks)),
    );

    let support = config.support.enabled.then(|| {
        world.spawn(
            SUPPORT_NAME,
            config.support.position,
            config.support.health,
            Role::Support(SupportState::new(config.support.damaged)),
        )
    });

    let mut boss_state = BossState::new(config.boss.position, config.boss.threat_radius, config.boss.adaptive);
    // Waypoints wrap or clamp like any other cell; blocked ones are dropped
    boss_state.patrol_route = boss_state
        .patrol_route
        .iter()
        .map(|&waypoint| world.grid.resolve(waypoint))
        .filter(|&waypoint| world.grid.is_valid_position(waypoint))
        .collect();
    let boss = world.spawn(BOSS_NAME, config.boss.position, config.boss.health, Role::Boss(boss_state));

    let mut rivals = Vec::with_capacity(hunter.clan_rivals);
    for i in 0..hunter.clan_rivals {
        let Some(cell) = world.grid.random_free_cell(rng) else {
            warn!(rival = i + 1, "no free cell for clan rival");
            continue;
        };
        let state = HunterState::new(hunter.stamina, hunter.rival_reputation, HunterMind::ClanRival, &config.ranks);
        rivals.push(world.spawn(format!("Clan_{}", i + 1), cell, hunter.health, Role::Hunter(state)));
    }

    let wildlife_config = &config.wildlife;
    let mut wildlife = Vec::with_capacity(wildlife_config.count);
    for i in 0..wildlife_config.count {
        let Some(cell) = world.grid.random_free_cell(rng) else {
            warn!(creature = i + 1, "no free cell for wildlife");
            continue;
        };
        let tier = rng.gen_range(wildlife_config.min_tier..=wildlife_config.max_tier);
        let style = MovementStyle::random(rng);
        wildlife.push(world.spawn(
            format!("Creature_{}", i + 1),
            cell,
            wildlife_config.health,
            Role::Wildlife(WildlifeState::new(tier, cell, style)),
        ));
    }

    let hazards = HazardField::generate(&world.grid, &config.hazards, rng);

    debug!(
        entities = world.len(),
        rivals = rivals.len(),
        wildlife = wildlife.len(),
        "world built"
    );

    let cast = Cast {
        protagonist,
        support,
        boss,
        rivals,
        wildlife,
    };
    (world, cast, hazards)
}
