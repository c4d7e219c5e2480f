//! Reputation deltas, rank recomputation and rank-change events

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entity::{Archetype, Entity};
use crate::reputation::rank::{Rank, RankThresholds};

/// Opponent reputation above which challenge deltas are amplified
pub const RENOWNED_OPPONENT: u32 = 70;
/// Health fraction below which a retreat costs half
pub const CRITICAL_HEALTH_FRACTION: f64 = 0.2;
/// Reputation needed for clan acceptance
pub const CLAN_ACCEPTANCE: u32 = 50;

/// Symbolic outcomes that move reputation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReputationAction {
    HuntWorthyPrey,
    HuntUnworthyPrey,
    DefeatBoss,
    SuccessfulChallenge,
    FailedChallenge,
    Retreat,
    HelpWounded,
    TrophyCollected,
    DishonourableKill,
    WinChallenge,
    LoseChallenge,
    SpareWorthyOpponent,
    FightAlongsideAlly,
}

impl ReputationAction {
    /// Unadjusted delta
    pub fn base_delta(&self) -> i32 {
        match self {
            ReputationAction::HuntWorthyPrey => 15,
            ReputationAction::HuntUnworthyPrey => -30,
            ReputationAction::DefeatBoss => 100,
            ReputationAction::SuccessfulChallenge => 10,
            ReputationAction::FailedChallenge => -5,
            ReputationAction::Retreat => -10,
            ReputationAction::HelpWounded => 5,
            ReputationAction::TrophyCollected => 10,
            ReputationAction::DishonourableKill => -50,
            ReputationAction::WinChallenge => 15,
            ReputationAction::LoseChallenge => -5,
            ReputationAction::SpareWorthyOpponent => 20,
            ReputationAction::FightAlongsideAlly => 5,
        }
    }

    fn is_challenge(&self) -> bool {
        matches!(
            self,
            ReputationAction::SuccessfulChallenge
                | ReputationAction::FailedChallenge
                | ReputationAction::WinChallenge
                | ReputationAction::LoseChallenge
        )
    }
}

/// Circumstances that adjust a base delta
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReputationContext {
    pub target_archetype: Option<Archetype>,
    pub target_tier: Option<u8>,
    pub opponent_reputation: Option<u32>,
    /// Acting hunter's health as a fraction of its maximum
    pub health_fraction: Option<f64>,
}

impl ReputationContext {
    /// Context describing the defeated or hunted target
    pub fn target(target: &Entity) -> Self {
        Self {
            target_archetype: Some(target.archetype()),
            target_tier: target.wildlife().map(|wildlife| wildlife.tier),
            ..Self::default()
        }
    }

    pub fn opponent(reputation: u32) -> Self {
        Self {
            opponent_reputation: Some(reputation),
            ..Self::default()
        }
    }

    pub fn health(fraction: f64) -> Self {
        Self {
            health_fraction: Some(fraction),
            ..Self::default()
        }
    }
}

/// Result of applying one reputation action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationChange {
    /// Adjusted delta before clamping at zero
    pub delta: i32,
    pub old_reputation: u32,
    pub new_reputation: u32,
    pub old_rank: Rank,
    pub new_rank: Rank,
}

impl ReputationChange {
    pub fn rank_changed(&self) -> bool {
        self.old_rank != self.new_rank
    }

    pub fn promoted(&self) -> bool {
        self.new_rank > self.old_rank
    }
}

/// Delta for `action` after context adjustments
pub fn adjusted_delta(action: ReputationAction, context: &ReputationContext) -> i32 {
    let base = action.base_delta();

    if action == ReputationAction::HuntWorthyPrey {
        return match context.target_archetype {
            Some(Archetype::Wildlife) => match context.target_tier {
                Some(tier) if tier >= 1 => 15 + 5 * tier as i32,
                _ => ReputationAction::HuntUnworthyPrey.base_delta(),
            },
            Some(Archetype::Boss) => ReputationAction::DefeatBoss.base_delta(),
            _ => base,
        };
    }

    if action.is_challenge() {
        if let Some(opponent) = context.opponent_reputation {
            if opponent > RENOWNED_OPPONENT {
                return (base as f64 * 1.5) as i32;
            }
        }
        return base;
    }

    if action == ReputationAction::Retreat {
        if let Some(fraction) = context.health_fraction {
            if fraction < CRITICAL_HEALTH_FRACTION {
                return base / 2;
            }
        }
    }

    base
}

/// Applies reputation actions against a fixed rank ladder
#[derive(Debug, Clone, Default)]
pub struct ReputationEconomy {
    ranks: RankThresholds,
}

impl ReputationEconomy {
    pub fn new(ranks: RankThresholds) -> Self {
        Self { ranks }
    }

    pub fn ranks(&self) -> &RankThresholds {
        &self.ranks
    }

    /// Apply an action to a combatant's reputation.
    ///
    /// Non-hunters carry no reputation; they get a zero change back.
    pub fn apply(
        &self,
        combatant: &mut Entity,
        action: ReputationAction,
        context: &ReputationContext,
    ) -> ReputationChange {
        let name = combatant.name.clone();
        let Some(hunter) = combatant.hunter_mut() else {
            return ReputationChange {
                delta: 0,
                old_reputation: 0,
                new_reputation: 0,
                old_rank: Rank::Unblooded,
                new_rank: Rank::Unblooded,
            };
        };

        let delta = adjusted_delta(action, context);
        let old_reputation = hunter.reputation;
        let old_rank = hunter.rank;

        let new_reputation = (old_reputation as i64 + delta as i64).max(0) as u32;
        let new_rank = self.ranks.rank_for(new_reputation);
        hunter.reputation = new_reputation;
        hunter.rank = new_rank;

        if delta != 0 {
            debug!(
                hunter = %name,
                ?action,
                delta,
                reputation = new_reputation,
                rank = %new_rank,
                "reputation changed"
            );
        }

        let change = ReputationChange {
            delta,
            old_reputation,
            new_reputation,
            old_rank,
            new_rank,
        };

        if change.rank_changed() {
            if change.promoted() {
                info!(hunter = %name, from = %old_rank, to = %new_rank, "rank up");
            } else {
                info!(hunter = %name, from = %old_rank, to = %new_rank, "rank down");
            }
        }

        change
    }

    pub fn summary(&self, reputation: u32) -> ReputationSummary {
        let rank = self.ranks.rank_for(reputation);
        let next_threshold = self.ranks.next_threshold(reputation);
        ReputationSummary {
            reputation,
            rank,
            next_threshold,
            progress: next_threshold.map(|_| reputation - self.ranks.threshold(rank)),
            needed: next_threshold.map_or(0, |threshold| threshold - reputation),
            clan_acceptance: reputation >= CLAN_ACCEPTANCE,
        }
    }
}

/// Standing of a hunter on the rank ladder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationSummary {
    pub reputation: u32,
    pub rank: Rank,
    pub next_threshold: Option<u32>,
    /// Reputation earned since reaching the current rank
    pub progress: Option<u32>,
    pub needed: u32,
    pub clan_acceptance: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{EntityId, GridPos};
    use crate::entity::{
        BossState, HunterMind, HunterState, MovementStyle, Role, WildlifeState,
    };

    fn hunter_with(reputation: u32) -> Entity {
        let state = HunterState::new(100, reputation, HunterMind::Learning, &RankThresholds::default());
        Entity::new(EntityId(1), "Dek", GridPos::new(0, 0), 100, Role::Hunter(state))
    }

    fn wildlife_with(tier: u8) -> Entity {
        Entity::new(
            EntityId(5),
            "Creature_1",
            GridPos::new(1, 0),
            30,
            Role::Wildlife(WildlifeState::new(tier, GridPos::new(1, 0), MovementStyle::Wandering)),
        )
    }

    #[test]
    fn test_worthy_prey_scales_with_tier() {
        for (tier, expected) in [(1, 20), (2, 25), (3, 30)] {
            let context = ReputationContext::target(&wildlife_with(tier));
            assert_eq!(adjusted_delta(ReputationAction::HuntWorthyPrey, &context), expected);
        }
        let tierless = ReputationContext::target(&wildlife_with(0));
        assert_eq!(adjusted_delta(ReputationAction::HuntWorthyPrey, &tierless), -30);
    }

    #[test]
    fn test_worthy_prey_boss_target() {
        let boss = Entity::new(
            EntityId(9),
            "Beast",
            GridPos::new(3, 3),
            500,
            Role::Boss(BossState::new(GridPos::new(3, 3), 5, false)),
        );
        let context = ReputationContext::target(&boss);
        assert_eq!(adjusted_delta(ReputationAction::HuntWorthyPrey, &context), 100);
    }

    #[test]
    fn test_challenge_amplified_against_renowned_opponent() {
        let weak = ReputationContext::opponent(70);
        let renowned = ReputationContext::opponent(71);
        assert_eq!(adjusted_delta(ReputationAction::WinChallenge, &weak), 15);
        assert_eq!(adjusted_delta(ReputationAction::WinChallenge, &renowned), 22);
        assert_eq!(adjusted_delta(ReputationAction::LoseChallenge, &renowned), -7);
        assert_eq!(adjusted_delta(ReputationAction::SuccessfulChallenge, &renowned), 15);
    }

    #[test]
    fn test_retreat_halved_when_critical() {
        assert_eq!(
            adjusted_delta(ReputationAction::Retreat, &ReputationContext::health(0.5)),
            -10
        );
        assert_eq!(
            adjusted_delta(ReputationAction::Retreat, &ReputationContext::health(0.19)),
            -5
        );
    }

    #[test]
    fn test_reputation_floors_at_zero() {
        let economy = ReputationEconomy::default();
        let mut hunter = hunter_with(10);
        let change = economy.apply(
            &mut hunter,
            ReputationAction::DishonourableKill,
            &ReputationContext::default(),
        );
        assert_eq!(change.delta, -50);
        assert_eq!(change.new_reputation, 0);
        assert_eq!(hunter.reputation(), 0);
    }

    #[test]
    fn test_promotion_and_demotion_reported() {
        let economy = ReputationEconomy::default();
        let mut hunter = hunter_with(25);

        let up = economy.apply(
            &mut hunter,
            ReputationAction::HuntWorthyPrey,
            &ReputationContext::target(&wildlife_with(1)),
        );
        assert!(up.rank_changed());
        assert!(up.promoted());
        assert_eq!(hunter.hunter().unwrap().rank, Rank::Blooded);

        let same = economy.apply(&mut hunter, ReputationAction::HelpWounded, &ReputationContext::default());
        assert!(!same.rank_changed());

        let down = economy.apply(
            &mut hunter,
            ReputationAction::HuntUnworthyPrey,
            &ReputationContext::default(),
        );
        assert!(down.rank_changed());
        assert!(!down.promoted());
        assert_eq!(hunter.hunter().unwrap().rank, Rank::Unblooded);
    }

    #[test]
    fn test_non_hunter_gets_neutral_change() {
        let economy = ReputationEconomy::default();
        let mut prey = wildlife_with(2);
        let change = economy.apply(&mut prey, ReputationAction::DefeatBoss, &ReputationContext::default());
        assert_eq!(change.delta, 0);
        assert!(!change.rank_changed());
    }

    #[test]
    fn test_summary() {
        let economy = ReputationEconomy::default();
        let summary = economy.summary(45);
        assert_eq!(summary.rank, Rank::Blooded);
        assert_eq!(summary.next_threshold, Some(60));
        assert_eq!(summary.needed, 15);
        assert_eq!(summary.progress, Some(15));
        assert!(!summary.clan_acceptance);

        let top = economy.summary(200);
        assert_eq!(top.next_threshold, None);
        assert_eq!(top.needed, 0);
        assert!(top.clan_acceptance);
    }
}
