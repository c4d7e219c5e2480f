//! Archetype tags used for damage tables, target rules and scheduling

use serde::{Deserialize, Serialize};

/// What kind of actor an entity is
///
/// Every rule that differs by actor kind matches on this tag instead of
/// inspecting names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Reputation-bearing hunter, learning or scripted
    Learner,
    /// The territorial boss creature
    Boss,
    /// Huntable creatures with a threat tier
    Wildlife,
    /// Non-combatant support unit
    Support,
}

impl Archetype {
    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Learner => "learner",
            Archetype::Boss => "boss",
            Archetype::Wildlife => "wildlife",
            Archetype::Support => "support",
        }
    }

    /// Whether this kind of actor can be the target of an attack
    pub fn is_combatant(&self) -> bool {
        !matches!(self, Archetype::Support)
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
