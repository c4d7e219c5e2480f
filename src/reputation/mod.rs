//! Reputation economy: deltas, ranks and the hunting code

pub mod economy;
pub mod rank;
pub mod validation;

pub use economy::{
    adjusted_delta, ReputationAction, ReputationChange, ReputationContext, ReputationEconomy,
    ReputationSummary,
};
pub use rank::{Rank, RankThresholds};
pub use validation::{validate_hunt, HuntRecommendation, HuntValidation};
