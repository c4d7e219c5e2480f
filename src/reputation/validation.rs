//! Hunting-code checks on a prospective target

use serde::{Deserialize, Serialize};

use crate::entity::{Archetype, Entity};

pub const UNWORTHY_WILDLIFE: &str = "Wildlife has no threat level - unworthy";
pub const TOO_WOUNDED: &str = "Target is too wounded - dishonourable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HuntRecommendation {
    Hunt,
    Spare,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuntValidation {
    pub honourable: bool,
    pub violations: Vec<String>,
    pub recommended: HuntRecommendation,
}

/// Judge whether hunting `target` is honourable.
///
/// Reads only the target's current state, so repeated calls on an unchanged
/// target always agree.
pub fn validate_hunt(hunter: &Entity, target: &Entity) -> HuntValidation {
    let mut violations = Vec::new();

    if target.archetype() == Archetype::Wildlife {
        let worthy = target.wildlife().is_some_and(|wildlife| wildlife.is_worthy());
        if !worthy {
            violations.push(UNWORTHY_WILDLIFE.to_string());
        }
    }

    if target.vitals.is_critical() {
        violations.push(TOO_WOUNDED.to_string());
    }

    let honourable = violations.is_empty();
    tracing::trace!(hunter = %hunter.name, target = %target.name, honourable, "hunt validated");

    HuntValidation {
        honourable,
        violations,
        recommended: if honourable {
            HuntRecommendation::Hunt
        } else {
            HuntRecommendation::Spare
        },
    }
}
