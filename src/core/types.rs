//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for entities
///
/// Ids are handed out sequentially by the world registry, so a seeded run
/// always assigns the same ids in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Simulation tick counter
pub type Tick = u64;

/// Integer grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, the metric every range check in the game uses
    pub fn manhattan(&self, other: &Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn chebyshev(&self, other: &Self) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// One step in the given direction (no wrapping; the grid resolves that)
    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Cardinal direction toward `target`, larger axis first.
    ///
    /// Ties on the axes go vertical, matching how hunters and wildlife walk.
    pub fn cardinal_toward(&self, target: &Self) -> Direction {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        if dx.abs() > dy.abs() {
            if dx > 0 {
                Direction::East
            } else {
                Direction::West
            }
        } else if dy > 0 {
            Direction::South
        } else {
            Direction::North
        }
    }

    /// Direction toward `target` allowing diagonals when both axes are equal
    pub fn octant_toward(&self, target: &Self) -> Direction {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        if dx.abs() > dy.abs() {
            if dx > 0 {
                Direction::East
            } else {
                Direction::West
            }
        } else if dy.abs() > dx.abs() {
            if dy > 0 {
                Direction::South
            } else {
                Direction::North
            }
        } else {
            Direction::diagonal(dx, dy)
        }
    }

    /// Cardinal direction away from `threat`
    pub fn cardinal_away(&self, threat: &Self) -> Direction {
        let mirrored = GridPos::new(2 * self.x - threat.x, 2 * self.y - threat.y);
        self.cardinal_toward(&mirrored)
    }
}

impl std::ops::Add for GridPos {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for GridPos {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Compass direction for a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// (dx, dy) with north as negative y
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, -1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
        }
    }

    /// Diagonal for a non-zero (dx, dy) pair; falls back to NorthWest on zeros
    pub fn diagonal(dx: i32, dy: i32) -> Direction {
        if dx > 0 && dy > 0 {
            Direction::SouthEast
        } else if dx > 0 && dy < 0 {
            Direction::NorthEast
        } else if dx < 0 && dy > 0 {
            Direction::SouthWest
        } else {
            Direction::NorthWest
        }
    }

    pub fn is_diagonal(&self) -> bool {
        let (dx, dy) = self.offset();
        dx != 0 && dy != 0
    }
}
