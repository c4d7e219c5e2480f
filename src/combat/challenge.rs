//! Non-lethal clan challenges between hunters

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::combat::constants::*;
use crate::core::error::ActionFailure;
use crate::core::types::EntityId;
use crate::entity::{Archetype, Entity};
use crate::reputation::{ReputationAction, ReputationChange, ReputationContext, ReputationEconomy};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeOutcome {
    pub winner: EntityId,
    pub loser: EntityId,
    pub challenger_score: f64,
    pub challenged_score: f64,
    pub winner_change: ReputationChange,
    pub loser_change: ReputationChange,
}

/// Standing score before jitter: reputation plus half of current health
pub fn challenge_score(hunter: &Entity) -> f64 {
    hunter.reputation() as f64 + hunter.vitals.health as f64 / 2.0
}

/// Settle a challenge. Ties go to the challenged hunter.
///
/// The loser takes fixed damage that never kills; both sides pay stamina.
pub fn resolve_challenge<R: Rng>(
    challenger: &mut Entity,
    challenged: &mut Entity,
    economy: &ReputationEconomy,
    rng: &mut R,
) -> Result<ChallengeOutcome, ActionFailure> {
    if challenger.archetype() != Archetype::Learner || challenged.archetype() != Archetype::Learner {
        return Err(ActionFailure::InvalidTarget);
    }
    if !challenger.is_alive() {
        return Err(ActionFailure::AttackerDead);
    }
    if !challenged.is_alive() {
        return Err(ActionFailure::TargetDead);
    }

    let challenger_score =
        challenge_score(challenger) * rng.gen_range(CHALLENGE_JITTER_MIN..=CHALLENGE_JITTER_MAX);
    let challenged_score =
        challenge_score(challenged) * rng.gen_range(CHALLENGE_JITTER_MIN..=CHALLENGE_JITTER_MAX);

    let challenger_reputation = challenger.reputation();
    let challenged_reputation = challenged.reputation();

    let (winner, loser, winner_reputation, loser_reputation) = if challenger_score > challenged_score {
        (challenger, challenged, challenger_reputation, challenged_reputation)
    } else {
        (challenged, challenger, challenged_reputation, challenger_reputation)
    };

    let wound = CHALLENGE_DAMAGE.min(loser.vitals.health - 1).max(0);
    loser.take_damage(wound);

    let winner_change = economy.apply(
        winner,
        ReputationAction::WinChallenge,
        &ReputationContext::opponent(loser_reputation),
    );
    let loser_change = economy.apply(
        loser,
        ReputationAction::LoseChallenge,
        &ReputationContext::opponent(winner_reputation),
    );

    winner.drain_stamina(CHALLENGE_STAMINA_COST);
    loser.drain_stamina(CHALLENGE_STAMINA_COST);

    info!(winner = %winner.name, loser = %loser.name, "clan challenge settled");

    Ok(ChallengeOutcome {
        winner: winner.id,
        loser: loser.id,
        challenger_score,
        challenged_score,
        winner_change,
        loser_change,
    })
}
