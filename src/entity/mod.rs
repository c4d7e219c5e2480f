//! Simulated actors
//!
//! Every actor is one `Entity` record carrying its shared vitals plus the
//! role-specific state for its archetype.

pub mod archetype;
pub mod boss;
pub mod hunter;
pub mod support;
pub mod vitals;
pub mod wildlife;

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, GridPos};

pub use archetype::Archetype;
pub use boss::{BossState, MovementPattern};
pub use hunter::{HunterMind, HunterState};
pub use support::SupportState;
pub use vitals::{Stamina, Vitals};
pub use wildlife::{MovementStyle, WildlifeState};

/// Role-specific state, one variant per archetype
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Role {
    Hunter(HunterState),
    Boss(BossState),
    Wildlife(WildlifeState),
    Support(SupportState),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub position: GridPos,
    pub vitals: Vitals,
    pub role: Role,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>, position: GridPos, health: i32, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            vitals: Vitals::new(health),
            role,
        }
    }

    pub fn archetype(&self) -> Archetype {
        match self.role {
            Role::Hunter(_) => Archetype::Learner,
            Role::Boss(_) => Archetype::Boss,
            Role::Wildlife(_) => Archetype::Wildlife,
            Role::Support(_) => Archetype::Support,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.vitals.alive
    }

    pub fn hunter(&self) -> Option<&HunterState> {
        match &self.role {
            Role::Hunter(state) => Some(state),
            _ => None,
        }
    }

    pub fn hunter_mut(&mut self) -> Option<&mut HunterState> {
        match &mut self.role {
            Role::Hunter(state) => Some(state),
            _ => None,
        }
    }

    pub fn boss(&self) -> Option<&BossState> {
        match &self.role {
            Role::Boss(state) => Some(state),
            _ => None,
        }
    }

    pub fn boss_mut(&mut self) -> Option<&mut BossState> {
        match &mut self.role {
            Role::Boss(state) => Some(state),
            _ => None,
        }
    }

    pub fn wildlife(&self) -> Option<&WildlifeState> {
        match &self.role {
            Role::Wildlife(state) => Some(state),
            _ => None,
        }
    }

    pub fn support(&self) -> Option<&SupportState> {
        match &self.role {
            Role::Support(state) => Some(state),
            _ => None,
        }
    }

    pub fn support_mut(&mut self) -> Option<&mut SupportState> {
        match &mut self.role {
            Role::Support(state) => Some(state),
            _ => None,
        }
    }

    /// Current stamina; actors without a stamina pool report `None`
    pub fn stamina(&self) -> Option<i32> {
        self.hunter().map(|hunter| hunter.stamina.current)
    }

    /// Reputation, 0 for actors that carry none
    pub fn reputation(&self) -> u32 {
        self.hunter().map_or(0, |hunter| hunter.reputation)
    }

    /// Drain stamina if the actor has any; a no-op otherwise
    pub fn drain_stamina(&mut self, amount: i32) {
        if let Some(hunter) = self.hunter_mut() {
            hunter.stamina.drain(amount);
        }
    }

    /// Apply damage and run the owner's reaction to it.
    ///
    /// Returns the health actually lost, before any adaptive-armour healing.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let actual = self.vitals.take_damage(amount);
        if actual == 0 {
            return 0;
        }
        let health_after = self.vitals.health;
        let alive = self.vitals.alive;
        if let Role::Boss(boss) = &mut self.role {
            let restore = boss.on_damaged(actual, health_after, alive);
            if restore > 0 {
                self.vitals.heal(restore);
                tracing::debug!(boss = %self.name, restored = restore, "adaptive armour absorbs part of the hit");
            }
        }
        actual
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reputation::rank::RankThresholds;

    fn test_hunter() -> Entity {
        let state = HunterState::new(100, 0, HunterMind::Learning, &RankThresholds::default());
        Entity::new(EntityId(1), "Dek", GridPos::new(0, 0), 100, Role::Hunter(state))
    }

    #[test]
    fn test_archetype_follows_role() {
        let hunter = test_hunter();
        assert_eq!(hunter.archetype(), Archetype::Learner);

        let boss = Entity::new(
            EntityId(2),
            "Beast",
            GridPos::new(5, 5),
            500,
            Role::Boss(BossState::new(GridPos::new(5, 5), 5, false)),
        );
        assert_eq!(boss.archetype(), Archetype::Boss);
        assert_eq!(boss.stamina(), None);
        assert_eq!(boss.reputation(), 0);
    }

    #[test]
    fn test_boss_damage_runs_bookkeeping() {
        let mut boss = Entity::new(
            EntityId(2),
            "Beast",
            GridPos::new(5, 5),
            500,
            Role::Boss(BossState::new(GridPos::new(5, 5), 5, true)),
        );
        assert_eq!(boss.take_damage(40), 40);
        assert_eq!(boss.vitals.health, 460);
        assert_eq!(boss.boss().unwrap().times_attacked, 1);
    }

    #[test]
    fn test_adaptive_armour_heals_after_hit() {
        let mut state = BossState::new(GridPos::new(5, 5), 5, true);
        state.adaptive.as_mut().unwrap().abilities.adaptive_armour = true;
        let mut boss = Entity::new(EntityId(2), "Beast", GridPos::new(5, 5), 500, Role::Boss(state));
        boss.take_damage(50);
        assert_eq!(boss.vitals.health, 455);
    }

    #[test]
    fn test_drain_stamina_is_neutral_without_pool() {
        let mut wildlife = Entity::new(
            EntityId(3),
            "Creature_1",
            GridPos::new(1, 1),
            30,
            Role::Wildlife(WildlifeState::new(1, GridPos::new(1, 1), MovementStyle::Wandering)),
        );
        wildlife.drain_stamina(10);
        assert_eq!(wildlife.stamina(), None);

        let mut hunter = test_hunter();
        hunter.drain_stamina(10);
        assert_eq!(hunter.stamina(), Some(90));
    }
}
