//! Huntable wildlife

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::GridPos;

/// Wildlife at or above this tier attacks hunters that come close
pub const HOSTILE_TIER: u8 = 2;
/// Health below which wildlife stops everything and flees
pub const FLEE_THRESHOLD: i32 = 10;
/// Territorial wildlife heads home once this far from its centre
pub const TERRITORY_RADIUS: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementStyle {
    Wandering,
    Territorial,
    Fleeing,
}

impl MovementStyle {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        match rng.gen_range(0..3) {
            0 => MovementStyle::Wandering,
            1 => MovementStyle::Territorial,
            _ => MovementStyle::Fleeing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildlifeState {
    /// 1-3 in practice; 0 marks prey that is unworthy to hunt
    pub tier: u8,
    pub hostile: bool,
    pub territory_center: GridPos,
    pub style: MovementStyle,
    pub flee_threshold: i32,
}

impl WildlifeState {
    pub fn new(tier: u8, territory_center: GridPos, style: MovementStyle) -> Self {
        Self {
            tier,
            hostile: tier >= HOSTILE_TIER,
            territory_center,
            style,
            flee_threshold: FLEE_THRESHOLD,
        }
    }

    /// Worthy of a hunter's attention under the hunting code
    pub fn is_worthy(&self) -> bool {
        self.tier >= 1
    }
}
