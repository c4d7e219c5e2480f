//! Occupancy grid with obstacles and a fixed boundary mode

use ahash::AHashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, GridPos};

/// What happens to a position that leaves the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// Leaving one edge re-enters at the opposite edge
    #[default]
    Wrap,
    /// Positions are pinned to the nearest edge cell
    Clamp,
}

/// 2D cell grid tracking obstacles and which entities stand where
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    boundary: BoundaryMode,
    obstacles: Vec<bool>,
    cells: Vec<Vec<EntityId>>,
    positions: AHashMap<EntityId, GridPos>,
}

impl Grid {
    pub fn new(width: i32, height: i32, boundary: BoundaryMode) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            boundary,
            obstacles: vec![false; size],
            cells: vec![Vec::new(); size],
            positions: AHashMap::new(),
        }
    }

    pub fn boundary(&self) -> BoundaryMode {
        self.boundary
    }

    #[inline]
    fn index(&self, pos: GridPos) -> Option<usize> {
        if self.in_bounds(pos) {
            Some((pos.y * self.width + pos.x) as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Map any position onto the grid according to the boundary mode
    pub fn resolve(&self, pos: GridPos) -> GridPos {
        match self.boundary {
            BoundaryMode::Wrap => GridPos::new(pos.x.rem_euclid(self.width), pos.y.rem_euclid(self.height)),
            BoundaryMode::Clamp => GridPos::new(
                pos.x.clamp(0, self.width - 1),
                pos.y.clamp(0, self.height - 1),
            ),
        }
    }

    pub fn is_obstacle(&self, pos: GridPos) -> bool {
        self.index(pos).map_or(false, |i| self.obstacles[i])
    }

    pub fn set_obstacle(&mut self, pos: GridPos) {
        if let Some(i) = self.index(pos) {
            self.obstacles[i] = true;
        }
    }

    /// In bounds and not blocked by an obstacle
    pub fn is_valid_position(&self, pos: GridPos) -> bool {
        self.index(pos).map_or(false, |i| !self.obstacles[i])
    }

    /// Valid and nobody standing there
    pub fn is_free(&self, pos: GridPos) -> bool {
        self.index(pos)
            .map_or(false, |i| !self.obstacles[i] && self.cells[i].is_empty())
    }

    pub fn cell_occupants(&self, pos: GridPos) -> &[EntityId] {
        match self.index(pos) {
            Some(i) => &self.cells[i],
            None => &[],
        }
    }

    pub fn position_of(&self, id: EntityId) -> Option<GridPos> {
        self.positions.get(&id).copied()
    }

    /// Put an entity on the grid; refused for invalid cells
    pub fn place(&mut self, id: EntityId, pos: GridPos) -> bool {
        let Some(i) = self.index(pos) else {
            return false;
        };
        if self.obstacles[i] {
            return false;
        }
        self.remove(id);
        self.cells[i].push(id);
        self.positions.insert(id, pos);
        true
    }

    pub fn remove(&mut self, id: EntityId) {
        if let Some(old) = self.positions.remove(&id) {
            if let Some(i) = self.index(old) {
                self.cells[i].retain(|&other| other != id);
            }
        }
    }

    /// Move an entity toward `target` after boundary resolution.
    ///
    /// Returns the new position, or `None` when the move is ignored because the
    /// cell is blocked, occupied, or the same cell the entity already holds.
    pub fn move_entity(&mut self, id: EntityId, target: GridPos) -> Option<GridPos> {
        let current = self.position_of(id)?;
        let destination = self.resolve(target);
        if destination == current || !self.is_free(destination) {
            return None;
        }
        self.place(id, destination);
        Some(destination)
    }

    /// Entities within Manhattan `radius` of `center`, scanned row by row
    pub fn nearby_entities(&self, center: GridPos, radius: i32) -> Vec<EntityId> {
        let mut found = Vec::new();
        for dy in -radius..=radius {
            let span = radius - dy.abs();
            for dx in -span..=span {
                let pos = GridPos::new(center.x + dx, center.y + dy);
                if let Some(i) = self.index(pos) {
                    found.extend_from_slice(&self.cells[i]);
                }
            }
        }
        found
    }

    /// All in-bounds cells within Chebyshev `radius` of `center`
    pub fn cells_around(&self, center: GridPos, radius: i32) -> Vec<GridPos> {
        let mut cells = Vec::new();
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                let pos = GridPos::new(center.x + dx, center.y + dy);
                if self.in_bounds(pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }

    /// A random unoccupied valid cell, giving up after a bounded number of draws
    pub fn random_free_cell<R: Rng>(&self, rng: &mut R) -> Option<GridPos> {
        let attempts = (self.width * self.height).max(1) * 4;
        for _ in 0..attempts {
            let pos = GridPos::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height));
            if self.is_free(pos) {
                return Some(pos);
            }
        }
        None
    }

    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> GridPos {
        GridPos::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height))
    }
}
