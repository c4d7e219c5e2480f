//! Adaptive boss intelligence
//!
//! Histories, pattern detectors, the unlock ladder and the decision state
//! machine. The boss's per-entity data lives in [`crate::entity::boss`].

pub mod abilities;
pub mod history;
pub mod memory;
pub mod pattern;
pub mod policy;

pub use abilities::{tune_chase, Abilities, Ability};
pub use history::RingBuffer;
pub use memory::{AdaptationStats, AdaptiveMemory, OutcomeRecord};
pub use pattern::Pattern;
pub use policy::{decide, AdversaryDecision, AdversaryState, BossAction, OpponentReading};
