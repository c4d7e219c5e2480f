pub mod config;
pub mod error;
pub mod types;

pub use config::SimulationConfig;
pub use error::{ActionFailure, BadlandsError, Result};
pub use types::{Direction, EntityId, GridPos, Tick};
