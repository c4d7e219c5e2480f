//! Action vocabulary shared by every entity policy

use serde::{Deserialize, Serialize};

use crate::core::types::{Direction, EntityId};

/// One concrete thing an entity does on its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Move(Direction),
    Rest,
    Attack(EntityId),
    /// Non-lethal clan challenge against another hunter
    Challenge(EntityId),
    /// Support: advise hunters in earshot
    ProvideKnowledge,
    /// Support: survey the surrounding cells
    ScanArea,
    /// Support: step and survey
    Reconnaissance(Direction),
    /// Hunter: lift the support unit standing next to it
    PickUp(EntityId),
    /// Hunter: set the carried support unit down
    PutDown,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Movement,
    Survival,
    Combat,
    Support,
    Idle,
}

impl Action {
    pub fn category(&self) -> ActionCategory {
        match self {
            Action::Move(_) | Action::Reconnaissance(_) => ActionCategory::Movement,
            Action::Rest => ActionCategory::Survival,
            Action::Attack(_) | Action::Challenge(_) => ActionCategory::Combat,
            Action::ProvideKnowledge | Action::ScanArea | Action::PickUp(_) | Action::PutDown => {
                ActionCategory::Support
            }
            Action::Idle => ActionCategory::Idle,
        }
    }

    /// The entity this action is aimed at, if any
    pub fn target(&self) -> Option<EntityId> {
        match self {
            Action::Attack(target) | Action::Challenge(target) | Action::PickUp(target) => {
                Some(*target)
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Move(_) => "move",
            Action::Rest => "rest",
            Action::Attack(_) => "attack",
            Action::Challenge(_) => "challenge",
            Action::ProvideKnowledge => "provide_knowledge",
            Action::ScanArea => "scan_area",
            Action::Reconnaissance(_) => "reconnaissance",
            Action::PickUp(_) => "pick_up",
            Action::PutDown => "put_down",
            Action::Idle => "idle",
        }
    }
}
