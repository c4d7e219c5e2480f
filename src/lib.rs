//! Badlands Hunt - learning hunter versus adaptive boss on a grid
//!
//! A seeded, turn-based encounter: a tabular Q-learning hunter earns
//! reputation by hunting wildlife and eventually confronts a boss that studies
//! its movement and adapts. A damaged support unit offers advice.

pub mod actions;
pub mod adversary;
pub mod combat;
pub mod core;
pub mod ecs;
pub mod entity;
pub mod evaluation;
pub mod learning;
pub mod reputation;
pub mod simulation;
pub mod spatial;
