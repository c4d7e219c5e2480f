//! Property tests for the reputation economy
//!
//! Any sequence of reputation actions must keep reputation non-negative and
//! the stored rank equal to the rank the ladder derives from it.

use badlands_hunt::core::types::{EntityId, GridPos};
use badlands_hunt::entity::{Archetype, Entity, HunterMind, HunterState, MovementStyle, Role, WildlifeState};
use badlands_hunt::reputation::{
    adjusted_delta, validate_hunt, Rank, RankThresholds, ReputationAction, ReputationContext,
    ReputationEconomy,
};
use proptest::prelude::*;

const ACTIONS: [ReputationAction; 13] = [
    ReputationAction::HuntWorthyPrey,
    ReputationAction::HuntUnworthyPrey,
    ReputationAction::DefeatBoss,
    ReputationAction::SuccessfulChallenge,
    ReputationAction::FailedChallenge,
    ReputationAction::Retreat,
    ReputationAction::HelpWounded,
    ReputationAction::TrophyCollected,
    ReputationAction::DishonourableKill,
    ReputationAction::WinChallenge,
    ReputationAction::LoseChallenge,
    ReputationAction::SpareWorthyOpponent,
    ReputationAction::FightAlongsideAlly,
];

fn hunter(reputation: u32) -> Entity {
    let state = HunterState::new(100, reputation, HunterMind::Learning, &RankThresholds::default());
    Entity::new(EntityId(1), "Dek", GridPos::new(0, 0), 100, Role::Hunter(state))
}

fn creature(tier: u8) -> Entity {
    Entity::new(
        EntityId(2),
        "Creature_0",
        GridPos::new(1, 0),
        30,
        Role::Wildlife(WildlifeState::new(tier, GridPos::new(1, 0), MovementStyle::Wandering)),
    )
}

fn context_strategy() -> impl Strategy<Value = ReputationContext> {
    (
        prop::option::of(0u8..=5),
        prop::option::of(0u32..200),
        prop::option::of(0.0f64..=1.0),
    )
        .prop_map(|(tier, opponent, health)| ReputationContext {
            target_archetype: tier.map(|_| Archetype::Wildlife),
            target_tier: tier,
            opponent_reputation: opponent,
            health_fraction: health,
        })
}

proptest! {
    #[test]
    fn test_rank_always_matches_reputation(
        start in 0u32..300,
        steps in prop::collection::vec((0usize..ACTIONS.len(), context_strategy()), 1..40),
    ) {
        let economy = ReputationEconomy::default();
        let ranks = RankThresholds::default();
        let mut entity = hunter(start);

        for (index, context) in steps {
            let before = entity.reputation();
            let change = economy.apply(&mut entity, ACTIONS[index], &context);
            let state = entity.hunter().unwrap();

            prop_assert_eq!(change.old_reputation, before);
            prop_assert_eq!(change.new_reputation, state.reputation);
            prop_assert_eq!(
                state.reputation as i64,
                (before as i64 + change.delta as i64).max(0)
            );
            prop_assert_eq!(state.rank, ranks.rank_for(state.reputation));
            prop_assert_eq!(change.rank_changed(), change.old_rank != change.new_rank);
        }
    }

    #[test]
    fn test_rank_for_is_monotonic(a in 0u32..500, b in 0u32..500) {
        let ranks = RankThresholds::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(ranks.rank_for(low) <= ranks.rank_for(high));
    }

    #[test]
    fn test_summary_is_consistent(reputation in 0u32..400) {
        let economy = ReputationEconomy::default();
        let summary = economy.summary(reputation);
        prop_assert_eq!(summary.rank, economy.ranks().rank_for(reputation));
        match summary.next_threshold {
            Some(next) => {
                prop_assert!(next > reputation);
                prop_assert_eq!(summary.needed, next - reputation);
            }
            None => {
                prop_assert_eq!(summary.rank, Rank::Ancient);
                prop_assert_eq!(summary.needed, 0);
            }
        }
        prop_assert_eq!(summary.clan_acceptance, reputation >= 50);
    }

    #[test]
    fn test_validation_is_pure(tier in 0u8..=5, damage in 0i32..30) {
        let hunter = hunter(0);
        let mut target = creature(tier);
        target.take_damage(damage);
        let first = validate_hunt(&hunter, &target);
        let second = validate_hunt(&hunter, &target);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.honourable, first.violations.is_empty());
    }
}

#[test]
fn test_worthy_prey_delta_scales_with_tier() {
    for tier in 1..=5u8 {
        let delta = adjusted_delta(ReputationAction::HuntWorthyPrey, &ReputationContext::target(&creature(tier)));
        assert_eq!(delta, 15 + 5 * tier as i32);
    }
    let unworthy = adjusted_delta(ReputationAction::HuntWorthyPrey, &ReputationContext::target(&creature(0)));
    assert_eq!(unworthy, -30);
}

#[test]
fn test_renowned_opponent_amplifies_challenges() {
    assert_eq!(adjusted_delta(ReputationAction::WinChallenge, &ReputationContext::opponent(71)), 22);
    assert_eq!(adjusted_delta(ReputationAction::WinChallenge, &ReputationContext::opponent(70)), 15);
    assert_eq!(adjusted_delta(ReputationAction::LoseChallenge, &ReputationContext::opponent(90)), -7);
}

#[test]
fn test_retreat_at_critical_health_costs_half() {
    assert_eq!(adjusted_delta(ReputationAction::Retreat, &ReputationContext::health(0.1)), -5);
    assert_eq!(adjusted_delta(ReputationAction::Retreat, &ReputationContext::health(0.5)), -10);
}
