//! Rule-based policies for every non-learning entity
//!
//! Each policy reads the world and returns one [`Action`]; applying it is the
//! executor's job. Rules are checked in order and the first match wins.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::actions::Action;
use crate::combat::constants::{MELEE_RANGE, MIN_ATTACK_STAMINA};
use crate::core::types::{Direction, EntityId, GridPos};
use crate::ecs::World;
use crate::entity::wildlife::TERRITORY_RADIUS;
use crate::entity::{Archetype, Entity, MovementStyle};
use crate::reputation::validate_hunt;

/// Any hunter rests below this stamina before doing anything else
pub const REST_STAMINA: i32 = 20;
/// Scripted hunter: threats this close are fought first
pub const THREAT_RADIUS: i32 = 2;
pub const REST_HEALTH: i32 = 30;
pub const BOSS_READY_REPUTATION: u32 = 50;
pub const BOSS_READY_HEALTH: i32 = 50;
/// Hostile wildlife notices hunters this close
pub const WILDLIFE_AGGRO_RADIUS: i32 = 2;
pub const WILDLIFE_ATTACK_CHANCE: f64 = 0.3;
/// Skittish wildlife keeps this far from hunters
pub const SKITTISH_RADIUS: i32 = 2;
/// Clan rivals challenge the protagonist inside this distance
pub const RIVAL_CHALLENGE_DISTANCE: i32 = 3;

pub fn random_step<R: Rng>(rng: &mut R) -> Action {
    Direction::CARDINALS
        .choose(rng)
        .map_or(Action::Idle, |&direction| Action::Move(direction))
}

fn attack_or_approach(from: GridPos, target: &Entity) -> Action {
    if from.manhattan(&target.position) <= MELEE_RANGE {
        Action::Attack(target.id)
    } else {
        Action::Move(from.cardinal_toward(&target.position))
    }
}

/// Wildlife: flee when wounded, hostile tiers attack hunters in reach,
/// skittish ones keep away, everything else wanders.
pub fn wildlife_action<R: Rng>(world: &World, entity: &Entity, rng: &mut R) -> Action {
    let Some(wildlife) = entity.wildlife() else {
        return Action::Idle;
    };
    let here = entity.position;

    if entity.vitals.health < wildlife.flee_threshold {
        let threat = world
            .iter_living()
            .filter(|other| matches!(other.archetype(), Archetype::Learner | Archetype::Boss))
            .min_by_key(|other| here.manhattan(&other.position));
        return match threat {
            Some(threat) => Action::Move(here.cardinal_away(&threat.position)),
            None => random_step(rng),
        };
    }

    let hunter = world
        .nearest(here, Archetype::Learner, |_| true)
        .filter(|hunter| here.manhattan(&hunter.position) <= WILDLIFE_AGGRO_RADIUS);

    if wildlife.hostile {
        if let Some(hunter) = hunter {
            if here.manhattan(&hunter.position) <= MELEE_RANGE {
                return if rng.gen_bool(WILDLIFE_ATTACK_CHANCE) {
                    Action::Attack(hunter.id)
                } else {
                    wander(entity, rng)
                };
            }
            return Action::Move(here.cardinal_toward(&hunter.position));
        }
    } else if wildlife.style == MovementStyle::Fleeing {
        if let Some(hunter) = hunter.filter(|hunter| here.manhattan(&hunter.position) <= SKITTISH_RADIUS) {
            return Action::Move(here.cardinal_away(&hunter.position));
        }
    }

    wander(entity, rng)
}

fn wander<R: Rng>(entity: &Entity, rng: &mut R) -> Action {
    if let Some(wildlife) = entity.wildlife() {
        if wildlife.style == MovementStyle::Territorial
            && entity.position.manhattan(&wildlife.territory_center) > TERRITORY_RADIUS
        {
            return Action::Move(entity.position.cardinal_toward(&wildlife.territory_center));
        }
    }
    random_step(rng)
}

/// Support: talk while carried, scan while damaged, scout otherwise
pub fn support_action<R: Rng>(entity: &Entity, rng: &mut R) -> Action {
    let Some(support) = entity.support() else {
        return Action::Idle;
    };
    if support.is_carried() {
        Action::ProvideKnowledge
    } else if support.damaged {
        Action::ScanArea
    } else {
        Direction::CARDINALS
            .choose(rng)
            .map_or(Action::ScanArea, |&direction| Action::Reconnaissance(direction))
    }
}

/// Fixed-rule hunter used as the non-learning baseline.
///
/// It only stalks prey that passes the honour check.
pub fn scripted_hunter_action<R: Rng>(world: &World, entity: &Entity, rng: &mut R) -> Action {
    let Some(hunter) = entity.hunter() else {
        return Action::Idle;
    };
    let here = entity.position;
    let stamina = hunter.stamina.current;

    if stamina < REST_STAMINA {
        return Action::Rest;
    }

    let threat = world
        .iter_living()
        .filter(|other| matches!(other.archetype(), Archetype::Wildlife | Archetype::Boss))
        .filter(|other| here.manhattan(&other.position) <= THREAT_RADIUS)
        .min_by_key(|other| here.manhattan(&other.position));
    if let Some(threat) = threat {
        if stamina >= MIN_ATTACK_STAMINA && here.manhattan(&threat.position) <= MELEE_RANGE {
            return Action::Attack(threat.id);
        }
    }

    if entity.vitals.health < REST_HEALTH {
        return Action::Rest;
    }

    if hunter.reputation < BOSS_READY_REPUTATION {
        let worthy = |prey: &Entity| validate_hunt(entity, prey).honourable;
        if let Some(prey) = world.nearest(here, Archetype::Wildlife, worthy) {
            return attack_or_approach(here, prey);
        }
    } else if entity.vitals.health > BOSS_READY_HEALTH {
        if let Some(boss) = world.boss() {
            return attack_or_approach(here, boss);
        }
    }

    random_step(rng)
}

/// Clan rival: challenge the protagonist when close, otherwise roam
pub fn rival_action<R: Rng>(world: &World, entity: &Entity, protagonist: EntityId, rng: &mut R) -> Action {
    if entity.stamina().map_or(true, |stamina| stamina < REST_STAMINA) {
        return Action::Rest;
    }
    let target = world
        .get(protagonist)
        .filter(|target| target.is_alive() && target.id != entity.id);
    if let Some(target) = target {
        let distance = entity.position.manhattan(&target.position);
        if distance < RIVAL_CHALLENGE_DISTANCE {
            return Action::Challenge(target.id);
        }
    }
    random_step(rng)
}
