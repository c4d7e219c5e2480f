pub mod grid;

pub use grid::{BoundaryMode, Grid};
