//! Tabular reinforcement learning for the hunter
//!
//! - `state_key`: observations and their discretization
//! - `value_table`: state → action → value
//! - `exploration`: ε schedule
//! - `reward`: shaped reward and the TD rule
//! - `policy`: selection, forced overrides, updates, statistics

pub mod exploration;
pub mod policy;
pub mod reward;
pub mod state_key;
pub mod value_table;

pub use exploration::ExplorationSchedule;
pub use policy::{
    legal_actions, translate, Experience, LearnerAction, LearningPolicy, LearningStats, Selection,
    SelectionMode,
};
pub use reward::{shaped_reward, td_update};
pub use state_key::{discretize, Observation, Sighting, StateKey};
pub use value_table::ValueTable;
