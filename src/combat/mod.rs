//! Combat resolution: attacks and clan challenges

pub mod challenge;
pub mod constants;
pub mod resolution;

pub use challenge::{resolve_challenge, ChallengeOutcome};
pub use resolution::{
    base_damage, can_attack, check_attack, resolve_attack, resisted_damage, roll_damage,
    AttackOutcome,
};
