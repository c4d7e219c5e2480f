//! World registry - owns every entity and the grid they stand on
//!
//! Entities are kept in insertion order. That order is the turn order, and
//! every query that has to pick one entity among several walks it, so a seeded
//! run always resolves ties the same way.

use ahash::AHashMap;

use crate::core::error::ActionFailure;
use crate::core::types::{Direction, EntityId, GridPos, Tick};
use crate::entity::{Archetype, Entity, Role};
use crate::spatial::Grid;

pub struct World {
    pub current_tick: Tick,
    pub grid: Grid,
    entities: Vec<Entity>,
    index: AHashMap<EntityId, usize>,
    next_id: u32,
}

impl World {
    pub fn new(grid: Grid) -> Self {
        Self {
            current_tick: 0,
            grid,
            entities: Vec::new(),
            index: AHashMap::new(),
            next_id: 1,
        }
    }

    /// Register an entity and put it on the grid.
    ///
    /// Ids are sequential. An entity whose cell is invalid is still registered
    /// but holds no grid cell.
    pub fn spawn(&mut self, name: impl Into<String>, position: GridPos, health: i32, role: Role) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let entity = Entity::new(id, name, position, health, role);
        if !self.grid.place(id, position) {
            tracing::warn!(entity = %entity.name, %position, "spawned off-grid");
        }
        self.index.insert(id, self.entities.len());
        self.entities.push(entity);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).map(|&i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        match self.index.get(&id) {
            Some(&i) => Some(&mut self.entities[i]),
            None => None,
        }
    }

    /// Two distinct entities borrowed mutably at once
    pub fn pair_mut(&mut self, a: EntityId, b: EntityId) -> Option<(&mut Entity, &mut Entity)> {
        let i = *self.index.get(&a)?;
        let j = *self.index.get(&b)?;
        if i == j {
            return None;
        }
        if i < j {
            let (left, right) = self.entities.split_at_mut(j);
            Some((&mut left[i], &mut right[0]))
        } else {
            let (left, right) = self.entities.split_at_mut(i);
            Some((&mut right[0], &mut left[j]))
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter_living(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|entity| entity.is_alive())
    }

    /// Ids of the living entities, in turn order
    pub fn roster(&self) -> Vec<EntityId> {
        self.iter_living().map(|entity| entity.id).collect()
    }

    /// Closest living entity of `archetype` that passes `filter`; earliest wins ties
    pub fn nearest<F>(&self, from: GridPos, archetype: Archetype, mut filter: F) -> Option<&Entity>
    where
        F: FnMut(&Entity) -> bool,
    {
        self.iter_living()
            .filter(|entity| entity.archetype() == archetype && filter(*entity))
            .min_by_key(|entity| from.manhattan(&entity.position))
    }

    /// The living boss, if any
    pub fn boss(&self) -> Option<&Entity> {
        self.iter_living().find(|entity| entity.archetype() == Archetype::Boss)
    }

    /// Move an entity on the grid; ignored moves leave it in place.
    ///
    /// A support unit carried by the mover follows it.
    pub fn move_entity(&mut self, id: EntityId, target: GridPos) -> Option<GridPos> {
        let moved = self.grid.move_entity(id, target)?;
        if let Some(entity) = self.get_mut(id) {
            entity.position = moved;
        }
        for entity in &mut self.entities {
            if entity.support().and_then(|support| support.carried_by) == Some(id) {
                entity.position = moved;
            }
        }
        Some(moved)
    }

    /// Lift a support unit off the grid; it then rides with the carrier
    pub fn pick_up(&mut self, carrier: EntityId, support: EntityId) -> bool {
        let Some((hunter, unit)) = self.pair_mut(carrier, support) else {
            return false;
        };
        let position = hunter.position;
        let (Some(hunter_state), Some(support_state)) = (hunter.hunter_mut(), unit.support_mut()) else {
            return false;
        };
        if support_state.is_carried() || hunter_state.encumbered {
            return false;
        }
        support_state.carried_by = Some(carrier);
        hunter_state.encumbered = true;
        unit.position = position;
        self.grid.remove(support);
        true
    }

    /// Set down whatever `carrier` is carrying on the first free cardinal
    /// neighbour of the carrier.
    ///
    /// Fails with `InvalidTarget` when nothing is carried and `Blocked` when
    /// every neighbouring cell is taken; the unit stays carried in both cases.
    pub fn put_down(&mut self, carrier: EntityId) -> Result<EntityId, ActionFailure> {
        let position = self.get(carrier).ok_or(ActionFailure::MissingTarget)?.position;
        let carried = self
            .entities
            .iter()
            .find(|entity| entity.support().and_then(|support| support.carried_by) == Some(carrier))
            .ok_or(ActionFailure::InvalidTarget)?
            .id;

        let cell = Direction::CARDINALS
            .iter()
            .map(|&direction| self.grid.resolve(position.step(direction)))
            .find(|&cell| cell != position && self.grid.is_free(cell))
            .ok_or(ActionFailure::Blocked)?;

        if !self.grid.place(carried, cell) {
            return Err(ActionFailure::Blocked);
        }
        if let Some(unit) = self.get_mut(carried) {
            unit.position = cell;
            if let Some(support) = unit.support_mut() {
                support.carried_by = None;
            }
        }
        if let Some(hunter) = self.get_mut(carrier).and_then(Entity::hunter_mut) {
            hunter.encumbered = false;
        }
        Ok(carried)
    }

    /// Drop dead entities from the registry and the grid; returns them
    pub fn prune_dead(&mut self) -> Vec<Entity> {
        if self.entities.iter().all(Entity::is_alive) {
            return Vec::new();
        }
        let (living, dead): (Vec<Entity>, Vec<Entity>) =
            std::mem::take(&mut self.entities).into_iter().partition(Entity::is_alive);
        self.entities = living;

        for entity in &dead {
            self.grid.remove(entity.id);
        }
        // A carrier that died drops what it was holding
        for entity in &mut self.entities {
            let position = entity.position;
            let id = entity.id;
            if let Some(support) = entity.support_mut() {
                let orphaned = support
                    .carried_by
                    .map_or(false, |carrier| dead.iter().any(|fallen| fallen.id == carrier));
                if orphaned {
                    support.carried_by = None;
                    self.grid.place(id, position);
                }
            }
        }

        self.index = self
            .entities
            .iter()
            .enumerate()
            .map(|(i, entity)| (entity.id, i))
            .collect();
        dead
    }

    pub fn tick(&mut self) {
        self.current_tick += 1;
    }
}
