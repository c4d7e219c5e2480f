//! Support unit state

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, GridPos};

/// Radius of a single area scan
pub const SCAN_RADIUS: i32 = 3;
/// Hunters within this distance hear the support's advice
pub const ADVICE_RADIUS: i32 = 2;

pub const BOSS_WEAKNESS: &str = "Exposed cooling vents on back";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportState {
    /// Damaged units cannot move on their own
    pub damaged: bool,
    pub carried_by: Option<EntityId>,
    pub scanned: AHashSet<GridPos>,
    /// Obstacle cells found while scanning, in discovery order
    pub danger_zones: Vec<GridPos>,
    pub advice_log: Vec<String>,
}

impl SupportState {
    pub fn new(damaged: bool) -> Self {
        Self {
            damaged,
            carried_by: None,
            scanned: AHashSet::new(),
            danger_zones: Vec::new(),
            advice_log: Vec::new(),
        }
    }

    pub fn is_carried(&self) -> bool {
        self.carried_by.is_some()
    }

    /// Mark a cell as scanned, recording it as dangerous if it is blocked
    pub fn record_scan(&mut self, cell: GridPos, blocked: bool) {
        self.scanned.insert(cell);
        if blocked && !self.danger_zones.contains(&cell) {
            self.danger_zones.push(cell);
        }
    }
}
