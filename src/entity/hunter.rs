//! Hunter (learner archetype) state

use serde::{Deserialize, Serialize};

use crate::entity::vitals::Stamina;
use crate::reputation::rank::{Rank, RankThresholds};

/// What drives a hunter's decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HunterMind {
    /// Tabular learner
    Learning,
    /// Fixed rule-based baseline
    Scripted,
    /// Clan member that challenges the protagonist when close
    ClanRival,
}

/// Stamina, reputation and trophies of a hunter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HunterState {
    pub stamina: Stamina,
    /// Never negative; rank is always derived from it
    pub reputation: u32,
    pub rank: Rank,
    pub trophies: Vec<String>,
    /// Carrying the support unit: weaker attacks, costlier moves
    pub encumbered: bool,
    pub mind: HunterMind,
}

impl HunterState {
    pub fn new(stamina: i32, reputation: u32, mind: HunterMind, ranks: &RankThresholds) -> Self {
        Self {
            stamina: Stamina::new(stamina),
            reputation,
            rank: ranks.rank_for(reputation),
            trophies: Vec::new(),
            encumbered: false,
            mind,
        }
    }

    pub fn is_learning(&self) -> bool {
        self.mind == HunterMind::Learning
    }
}
