//! Turn scheduler and the systems it drives
//!
//! - `setup`: world construction from a config
//! - `behavior`: rule-based policies for everything that does not learn
//! - `execution`: applying one action to the world
//! - `hazards`: traps, terrain and weather
//! - `tick`: the `Simulation` loop itself

pub mod behavior;
pub mod events;
pub mod execution;
pub mod hazards;
pub mod setup;
pub mod tick;

pub use events::{RunState, TickEvent};
pub use execution::{execute, support_advice, TurnContext};
pub use hazards::{Hazard, HazardEffect, HazardField, TerrainKind, TrapKind, WeatherChange, WeatherKind};
pub use setup::{build_world, Cast};
pub use tick::{observe, Simulation, SimulationResult};
