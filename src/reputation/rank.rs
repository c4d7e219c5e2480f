//! Rank ladder derived from reputation

use serde::{Deserialize, Serialize};

use crate::core::error::{BadlandsError, Result};

/// Ranks in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Unblooded,
    Blooded,
    Honoured,
    Elite,
    Ancient,
}

impl Rank {
    pub const ALL: [Rank; 5] = [
        Rank::Unblooded,
        Rank::Blooded,
        Rank::Honoured,
        Rank::Elite,
        Rank::Ancient,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rank::Unblooded => "Unblooded",
            Rank::Blooded => "Blooded",
            Rank::Honoured => "Honoured",
            Rank::Elite => "Elite",
            Rank::Ancient => "Ancient",
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Minimum reputation for each rank above Unblooded (which always starts at 0)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankThresholds {
    pub blooded: u32,
    pub honoured: u32,
    pub elite: u32,
    pub ancient: u32,
}

impl Default for RankThresholds {
    fn default() -> Self {
        Self {
            blooded: 30,
            honoured: 60,
            elite: 100,
            ancient: 150,
        }
    }
}

impl RankThresholds {
    /// Thresholds must strictly ascend above 0 or a rank becomes unreachable
    pub fn validate(&self) -> Result<()> {
        let ladder = [0, self.blooded, self.honoured, self.elite, self.ancient];
        if ladder.windows(2).all(|pair| pair[0] < pair[1]) {
            Ok(())
        } else {
            Err(BadlandsError::Config(format!(
                "rank thresholds must strictly ascend from 0, got {:?}",
                ladder
            )))
        }
    }

    pub fn threshold(&self, rank: Rank) -> u32 {
        match rank {
            Rank::Unblooded => 0,
            Rank::Blooded => self.blooded,
            Rank::Honoured => self.honoured,
            Rank::Elite => self.elite,
            Rank::Ancient => self.ancient,
        }
    }

    /// Highest rank whose threshold is at or below `reputation`
    pub fn rank_for(&self, reputation: u32) -> Rank {
        Rank::ALL
            .iter()
            .rev()
            .copied()
            .find(|&rank| reputation >= self.threshold(rank))
            .unwrap_or(Rank::Unblooded)
    }

    /// Threshold of the first rank above `reputation`, if any remains
    pub fn next_threshold(&self, reputation: u32) -> Option<u32> {
        Rank::ALL
            .iter()
            .map(|&rank| self.threshold(rank))
            .find(|&threshold| threshold > reputation)
    }
}
