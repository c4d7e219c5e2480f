//! Applying one chosen action to the world
//!
//! Every precondition failure is reported as a `TickEvent::ActionFailed` and
//! leaves the world untouched; nothing here aborts a tick.

use rand::Rng;
use tracing::{debug, info};

use crate::actions::Action;
use crate::combat::constants::MELEE_RANGE;
use crate::combat::{check_attack, resolve_attack, resolve_challenge};
use crate::core::error::ActionFailure;
use crate::core::types::{Direction, EntityId, GridPos};
use crate::ecs::World;
use crate::entity::support::{ADVICE_RADIUS, BOSS_WEAKNESS, SCAN_RADIUS};
use crate::entity::{Archetype, Entity};
use crate::reputation::{ReputationChange, ReputationEconomy};
use crate::simulation::events::TickEvent;

/// Stamina a hunter pays per step, whether or not the step lands
pub const MOVE_STAMINA_COST: i32 = 2;
pub const ENCUMBERED_MOVE_COST: i32 = 5;
pub const REST_STAMINA: i32 = 15;
pub const REST_HEALTH: i32 = 5;
/// Clan challenges reach one cell further than melee
pub const CHALLENGE_RANGE: i32 = 2;

pub const CRITICAL_HEALTH_ADVICE: i32 = 40;
pub const LOW_STAMINA_ADVICE: i32 = 30;
pub const BOSS_NEARBY_ADVICE: i32 = 5;
pub const CONFRONT_REPUTATION_ADVICE: u32 = 50;
pub const LOW_REPUTATION_ADVICE: u32 = 30;

/// Shared inputs for applying actions during one tick
pub struct TurnContext<'a> {
    pub economy: &'a ReputationEconomy,
    /// The only hunter the support unit advises
    pub protagonist: EntityId,
}

/// Contextual advice for a hunter, first matching rule wins.
///
/// `None` when there is nothing worth saying.
pub fn support_advice(hunter: &Entity, boss_distance: Option<i32>) -> Option<String> {
    if hunter.vitals.health < CRITICAL_HEALTH_ADVICE {
        return Some("Warning: Your health is critical. Seek safety and rest.".to_string());
    }
    if hunter.stamina().map_or(false, |stamina| stamina < LOW_STAMINA_ADVICE) {
        return Some("Your stamina is low. Rest before engaging in combat.".to_string());
    }
    let reputation = hunter.reputation();
    if let Some(distance) = boss_distance {
        if distance < BOSS_NEARBY_ADVICE {
            return Some(format!("The adversary is nearby ({distance} units). {BOSS_WEAKNESS}"));
        }
        if reputation >= CONFRONT_REPUTATION_ADVICE {
            return Some("You have sufficient honour. Consider confronting the adversary.".to_string());
        }
    }
    if reputation < LOW_REPUTATION_ADVICE {
        return Some("Your honour is low. Hunt worthy prey to prove yourself.".to_string());
    }
    None
}

/// Apply `action` for `actor`, appending what happened to `events`
pub fn execute<R: Rng>(
    world: &mut World,
    actor: EntityId,
    action: Action,
    context: &TurnContext<'_>,
    rng: &mut R,
    events: &mut Vec<TickEvent>,
) {
    let result = match action {
        Action::Move(direction) => apply_move(world, actor, direction, events),
        Action::Rest => apply_rest(world, actor, events),
        Action::Attack(target) => apply_attack(world, actor, target, context.economy, rng, events),
        Action::Challenge(target) => {
            apply_challenge(world, actor, target, context.economy, rng, events)
        }
        Action::ProvideKnowledge => provide_knowledge(world, actor, context.protagonist, events),
        Action::ScanArea => scan_area(world, actor, events),
        Action::Reconnaissance(direction) => reconnaissance(world, actor, direction, events),
        Action::PickUp(target) => apply_pick_up(world, actor, target, events),
        Action::PutDown => apply_put_down(world, actor, events),
        Action::Idle => Ok(()),
    };

    if let Err(failure) = result {
        debug!(
            entity = %actor,
            action = action.name(),
            category = ?action.category(),
            target = ?action.target(),
            reason = failure.reason(),
            "action failed"
        );
        events.push(TickEvent::ActionFailed {
            entity: actor,
            action: action.name(),
            reason: failure.reason(),
        });
    }
}

fn entity(world: &World, id: EntityId) -> Result<&Entity, ActionFailure> {
    world.get(id).ok_or(ActionFailure::MissingTarget)
}

fn apply_move(
    world: &mut World,
    actor: EntityId,
    direction: Direction,
    events: &mut Vec<TickEvent>,
) -> Result<(), ActionFailure> {
    let mover = world.get_mut(actor).ok_or(ActionFailure::MissingTarget)?;
    let from = mover.position;
    if let Some(hunter) = mover.hunter_mut() {
        let cost = if hunter.encumbered {
            ENCUMBERED_MOVE_COST
        } else {
            MOVE_STAMINA_COST
        };
        hunter.stamina.drain(cost);
    }

    if let Some(to) = world.move_entity(actor, from.step(direction)) {
        events.push(TickEvent::Moved { entity: actor, from, to });
    }
    Ok(())
}

fn apply_rest(world: &mut World, actor: EntityId, events: &mut Vec<TickEvent>) -> Result<(), ActionFailure> {
    let resting = world.get_mut(actor).ok_or(ActionFailure::MissingTarget)?;
    if let Some(hunter) = resting.hunter_mut() {
        hunter.stamina.recover(REST_STAMINA);
        resting.vitals.heal(REST_HEALTH);
    }
    events.push(TickEvent::Rested { entity: actor });
    Ok(())
}

fn push_reputation(events: &mut Vec<TickEvent>, entity: EntityId, change: &ReputationChange) {
    events.push(TickEvent::ReputationChanged {
        entity,
        delta: change.delta,
        reputation: change.new_reputation,
    });
    if change.rank_changed() {
        events.push(TickEvent::RankChanged {
            entity,
            from: change.old_rank,
            to: change.new_rank,
        });
    }
}

fn apply_attack<R: Rng>(
    world: &mut World,
    actor: EntityId,
    target: EntityId,
    economy: &ReputationEconomy,
    rng: &mut R,
    events: &mut Vec<TickEvent>,
) -> Result<(), ActionFailure> {
    let (attacker, defender) = world.pair_mut(actor, target).ok_or(ActionFailure::MissingTarget)?;
    check_attack(attacker, defender, MELEE_RANGE)?;
    let outcome = resolve_attack(attacker, defender, economy, rng)?;

    events.push(TickEvent::Attacked {
        attacker: actor,
        defender: target,
        damage: outcome.damage,
        critical: outcome.critical,
    });
    if outcome.defeated {
        events.push(TickEvent::Defeated { attacker: actor, defender: target });
    }
    if let Some(change) = &outcome.reputation {
        push_reputation(events, actor, change);
    }
    if let Some(trophy) = outcome.trophy {
        events.push(TickEvent::TrophyCollected { entity: actor, trophy });
    }
    Ok(())
}

fn apply_challenge<R: Rng>(
    world: &mut World,
    actor: EntityId,
    target: EntityId,
    economy: &ReputationEconomy,
    rng: &mut R,
    events: &mut Vec<TickEvent>,
) -> Result<(), ActionFailure> {
    let (challenger, challenged) = world.pair_mut(actor, target).ok_or(ActionFailure::MissingTarget)?;
    if challenger.position.manhattan(&challenged.position) > CHALLENGE_RANGE {
        return Err(ActionFailure::OutOfRange);
    }
    let outcome = resolve_challenge(challenger, challenged, economy, rng)?;

    events.push(TickEvent::Challenged {
        winner: outcome.winner,
        loser: outcome.loser,
    });
    push_reputation(events, outcome.winner, &outcome.winner_change);
    push_reputation(events, outcome.loser, &outcome.loser_change);
    Ok(())
}

fn provide_knowledge(
    world: &mut World,
    actor: EntityId,
    protagonist: EntityId,
    events: &mut Vec<TickEvent>,
) -> Result<(), ActionFailure> {
    let support = entity(world, actor)?;
    if support.archetype() != Archetype::Support {
        return Err(ActionFailure::InvalidTarget);
    }
    let Some(hunter) = world.get(protagonist).filter(|hunter| hunter.is_alive()) else {
        return Ok(());
    };
    if support.position.manhattan(&hunter.position) > ADVICE_RADIUS {
        return Ok(());
    }

    let boss_distance = world.boss().map(|boss| hunter.position.manhattan(&boss.position));
    let Some(text) = support_advice(hunter, boss_distance) else {
        return Ok(());
    };
    info!(support = %support.name, hunter = %hunter.name, advice = %text, "advice");

    if let Some(state) = world.get_mut(actor).and_then(Entity::support_mut) {
        state.advice_log.push(text.clone());
    }
    events.push(TickEvent::Advice {
        support: actor,
        hunter: protagonist,
        text,
    });
    Ok(())
}

fn scan_area(world: &mut World, actor: EntityId, events: &mut Vec<TickEvent>) -> Result<(), ActionFailure> {
    let center: GridPos = entity(world, actor)?.position;
    let readings: Vec<(GridPos, bool)> = world
        .grid
        .cells_around(center, SCAN_RADIUS)
        .into_iter()
        .map(|cell| (cell, world.grid.is_obstacle(cell)))
        .collect();

    let state = world
        .get_mut(actor)
        .and_then(Entity::support_mut)
        .ok_or(ActionFailure::InvalidTarget)?;
    for &(cell, blocked) in &readings {
        state.record_scan(cell, blocked);
    }
    events.push(TickEvent::Scanned {
        support: actor,
        cells: readings.len(),
        dangers: state.danger_zones.len(),
    });
    Ok(())
}

fn reconnaissance(
    world: &mut World,
    actor: EntityId,
    direction: Direction,
    events: &mut Vec<TickEvent>,
) -> Result<(), ActionFailure> {
    let scout = entity(world, actor)?;
    if scout.support().is_none() {
        return Err(ActionFailure::InvalidTarget);
    }
    let from = scout.position;
    // Scans only after a step that actually landed
    if let Some(to) = world.move_entity(actor, from.step(direction)) {
        events.push(TickEvent::Moved { entity: actor, from, to });
        scan_area(world, actor, events)?;
    }
    Ok(())
}

fn apply_pick_up(
    world: &mut World,
    actor: EntityId,
    target: EntityId,
    events: &mut Vec<TickEvent>,
) -> Result<(), ActionFailure> {
    let carrier = entity(world, actor)?;
    let unit = entity(world, target)?;
    if carrier.hunter().is_none() || unit.support().is_none() {
        return Err(ActionFailure::InvalidTarget);
    }
    if carrier.position.manhattan(&unit.position) > MELEE_RANGE {
        return Err(ActionFailure::OutOfRange);
    }
    if !world.pick_up(actor, target) {
        return Err(ActionFailure::InvalidTarget);
    }
    info!(carrier = %actor, support = %target, "support picked up");
    events.push(TickEvent::PickedUp {
        carrier: actor,
        support: target,
    });
    Ok(())
}

fn apply_put_down(world: &mut World, actor: EntityId, events: &mut Vec<TickEvent>) -> Result<(), ActionFailure> {
    let support = world.put_down(actor)?;
    info!(carrier = %actor, support = %support, "support put down");
    events.push(TickEvent::PutDown { carrier: actor, support });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{BossState, HunterMind, HunterState, MovementStyle, Role, SupportState, WildlifeState};
    use crate::reputation::RankThresholds;
    use crate::spatial::{BoundaryMode, Grid};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn hunter_role(reputation: u32) -> Role {
        Role::Hunter(HunterState::new(100, reputation, HunterMind::Learning, &RankThresholds::default()))
    }

    fn setup() -> (World, ReputationEconomy, ChaCha8Rng) {
        (
            World::new(Grid::new(20, 20, BoundaryMode::Wrap)),
            ReputationEconomy::new(RankThresholds::default()),
            ChaCha8Rng::seed_from_u64(5),
        )
    }

    #[test]
    fn test_move_costs_stamina_even_when_blocked() {
        let (mut world, economy, mut rng) = setup();
        let dek = world.spawn("Dek", GridPos::new(5, 5), 100, hunter_role(0));
        world.grid.set_obstacle(GridPos::new(5, 4));
        let context = TurnContext { economy: &economy, protagonist: dek };
        let mut events = Vec::new();

        execute(&mut world, dek, Action::Move(Direction::North), &context, &mut rng, &mut events);
        assert!(events.is_empty());
        assert_eq!(world.get(dek).unwrap().stamina(), Some(98));
        assert_eq!(world.get(dek).unwrap().position, GridPos::new(5, 5));

        execute(&mut world, dek, Action::Move(Direction::East), &context, &mut rng, &mut events);
        assert_eq!(world.get(dek).unwrap().position, GridPos::new(6, 5));
        assert_eq!(world.get(dek).unwrap().stamina(), Some(96));
    }

    #[test]
    fn test_rest_recovers_hunter() {
        let (mut world, economy, mut rng) = setup();
        let dek = world.spawn("Dek", GridPos::new(5, 5), 100, hunter_role(0));
        {
            let hunter = world.get_mut(dek).unwrap();
            hunter.take_damage(20);
            hunter.drain_stamina(50);
        }
        let context = TurnContext { economy: &economy, protagonist: dek };
        let mut events = Vec::new();
        execute(&mut world, dek, Action::Rest, &context, &mut rng, &mut events);

        let hunter = world.get(dek).unwrap();
        assert_eq!(hunter.vitals.health, 85);
        assert_eq!(hunter.stamina(), Some(65));
        assert_eq!(events, vec![TickEvent::Rested { entity: dek }]);
    }

    #[test]
    fn test_attack_out_of_range_fails_cleanly() {
        let (mut world, economy, mut rng) = setup();
        let dek = world.spawn("Dek", GridPos::new(5, 5), 100, hunter_role(0));
        let prey = world.spawn(
            "Creature_1",
            GridPos::new(8, 5),
            30,
            Role::Wildlife(WildlifeState::new(1, GridPos::new(8, 5), MovementStyle::Wandering)),
        );
        let context = TurnContext { economy: &economy, protagonist: dek };
        let mut events = Vec::new();
        execute(&mut world, dek, Action::Attack(prey), &context, &mut rng, &mut events);

        assert_eq!(
            events,
            vec![TickEvent::ActionFailed {
                entity: dek,
                action: "attack",
                reason: "out_of_range",
            }]
        );
        assert_eq!(world.get(dek).unwrap().stamina(), Some(100));
        assert_eq!(world.get(prey).unwrap().vitals.health, 30);
    }

    #[test]
    fn test_killing_prey_emits_reputation_and_trophy() {
        let (mut world, economy, mut rng) = setup();
        let dek = world.spawn("Dek", GridPos::new(5, 5), 100, hunter_role(0));
        let prey = world.spawn(
            "Creature_1",
            GridPos::new(6, 5),
            1,
            Role::Wildlife(WildlifeState::new(2, GridPos::new(6, 5), MovementStyle::Wandering)),
        );
        let context = TurnContext { economy: &economy, protagonist: dek };
        let mut events = Vec::new();
        execute(&mut world, dek, Action::Attack(prey), &context, &mut rng, &mut events);

        assert!(events.contains(&TickEvent::Defeated { attacker: dek, defender: prey }));
        assert!(events
            .iter()
            .any(|event| matches!(event, TickEvent::ReputationChanged { entity, delta, .. } if *entity == dek && *delta > 0)));
        assert!(events.iter().any(|event| matches!(event, TickEvent::TrophyCollected { .. })));
    }

    #[test]
    fn test_challenge_range_is_two() {
        let (mut world, economy, mut rng) = setup();
        let dek = world.spawn("Dek", GridPos::new(5, 5), 100, hunter_role(20));
        let rival = world.spawn("Clan_1", GridPos::new(8, 5), 100, hunter_role(40));
        let context = TurnContext { economy: &economy, protagonist: dek };
        let mut events = Vec::new();

        execute(&mut world, rival, Action::Challenge(dek), &context, &mut rng, &mut events);
        assert!(matches!(events[0], TickEvent::ActionFailed { reason: "out_of_range", .. }));

        world.move_entity(rival, GridPos::new(7, 5));
        events.clear();
        execute(&mut world, rival, Action::Challenge(dek), &context, &mut rng, &mut events);
        assert!(matches!(events[0], TickEvent::Challenged { .. }));
        assert!(world.get(dek).unwrap().is_alive());
    }

    #[test]
    fn test_advice_reaches_nearby_protagonist() {
        let (mut world, economy, mut rng) = setup();
        let dek = world.spawn("Dek", GridPos::new(5, 5), 100, hunter_role(0));
        let thia = world.spawn("Thia", GridPos::new(6, 5), 50, Role::Support(SupportState::new(true)));
        world.spawn(
            "Beast",
            GridPos::new(8, 5),
            500,
            Role::Boss(BossState::new(GridPos::new(8, 5), 5, true)),
        );
        let context = TurnContext { economy: &economy, protagonist: dek };
        let mut events = Vec::new();
        execute(&mut world, thia, Action::ProvideKnowledge, &context, &mut rng, &mut events);

        let expected = "The adversary is nearby (3 units). Exposed cooling vents on back".to_string();
        assert_eq!(
            events,
            vec![TickEvent::Advice {
                support: thia,
                hunter: dek,
                text: expected.clone(),
            }]
        );
        assert_eq!(world.get(thia).unwrap().support().unwrap().advice_log, vec![expected]);
    }

    #[test]
    fn test_advice_priorities() {
        let mut hunter = Entity::new(EntityId(1), "Dek", GridPos::new(0, 0), 100, hunter_role(60));
        assert_eq!(
            support_advice(&hunter, Some(12)).as_deref(),
            Some("You have sufficient honour. Consider confronting the adversary.")
        );
        assert_eq!(support_advice(&hunter, None), None);

        hunter.drain_stamina(80);
        assert_eq!(
            support_advice(&hunter, Some(2)).as_deref(),
            Some("Your stamina is low. Rest before engaging in combat.")
        );
        hunter.take_damage(70);
        assert_eq!(
            support_advice(&hunter, Some(2)).as_deref(),
            Some("Warning: Your health is critical. Seek safety and rest.")
        );

        let novice = Entity::new(EntityId(2), "Novice", GridPos::new(0, 0), 100, hunter_role(10));
        assert_eq!(
            support_advice(&novice, Some(20)).as_deref(),
            Some("Your honour is low. Hunt worthy prey to prove yourself.")
        );
    }

    #[test]
    fn test_scan_records_obstacles() {
        let (mut world, economy, mut rng) = setup();
        let dek = world.spawn("Dek", GridPos::new(1, 1), 100, hunter_role(0));
        let thia = world.spawn("Thia", GridPos::new(10, 10), 50, Role::Support(SupportState::new(true)));
        world.grid.set_obstacle(GridPos::new(12, 11));
        world.grid.set_obstacle(GridPos::new(15, 15));
        let context = TurnContext { economy: &economy, protagonist: dek };
        let mut events = Vec::new();
        execute(&mut world, thia, Action::ScanArea, &context, &mut rng, &mut events);

        let state = world.get(thia).unwrap().support().unwrap();
        assert_eq!(state.scanned.len(), 49);
        assert_eq!(state.danger_zones, vec![GridPos::new(12, 11)]);
    }

    #[test]
    fn test_pick_up_requires_adjacency() {
        let (mut world, economy, mut rng) = setup();
        let dek = world.spawn("Dek", GridPos::new(5, 5), 100, hunter_role(0));
        let thia = world.spawn("Thia", GridPos::new(8, 5), 50, Role::Support(SupportState::new(true)));
        let context = TurnContext { economy: &economy, protagonist: dek };
        let mut events = Vec::new();

        execute(&mut world, dek, Action::PickUp(thia), &context, &mut rng, &mut events);
        assert!(matches!(events[0], TickEvent::ActionFailed { reason: "out_of_range", .. }));

        world.move_entity(thia, GridPos::new(6, 5));
        events.clear();
        execute(&mut world, dek, Action::PickUp(thia), &context, &mut rng, &mut events);
        assert_eq!(events, vec![TickEvent::PickedUp { carrier: dek, support: thia }]);

        events.clear();
        execute(&mut world, dek, Action::Move(Direction::South), &context, &mut rng, &mut events);
        assert_eq!(world.get(dek).unwrap().stamina(), Some(100 - ENCUMBERED_MOVE_COST));
        assert_eq!(world.get(thia).unwrap().position, GridPos::new(5, 6));

        events.clear();
        execute(&mut world, dek, Action::PutDown, &context, &mut rng, &mut events);
        assert_eq!(events, vec![TickEvent::PutDown { carrier: dek, support: thia }]);
        assert_eq!(world.get(thia).unwrap().position, GridPos::new(5, 5));
        assert_ne!(world.get(thia).unwrap().position, world.get(dek).unwrap().position);
    }
}
