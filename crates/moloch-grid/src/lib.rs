//! # Moloch Grid
//!
//! Tile grid substrate for the Moloch combat engine.
//!
//! The grid is a read-only field of tile IDs. A tile blocks movement when it
//! lies out of bounds or when its ID belongs to the map's [`CollisionSet`].
//! On top of that oracle sits a bounded A* [`Pathfinder`] that can avoid
//! temporarily [`Reservations`] held by other combatants.
//!
//! - **Coordinates**: [`TileCoord`] addresses a cell, [`Direction`] steps between cells
//! - **Collision**: [`CollisionSet`] + [`GridMap`] answer `collides(tile)`
//! - **Search**: [`Pathfinder::next_step`] returns the first step toward a goal
//! - **Hashing**: [`hash_grid`] digests a map for replay verification
//!
//! ## Quick Start
//!
//! ```
//! use moloch_grid::{GridMap, Pathfinder, Reservations, TileCoord};
//!
//! let grid = GridMap::from_ascii(
//!     "#####\n\
//!      #...#\n\
//!      #.#.#\n\
//!      #...#\n\
//!      ######",
//! )
//! .unwrap();
//!
//! let finder = Pathfinder::default();
//! let step = finder.next_step(
//!     &grid,
//!     TileCoord::new(1, 1),
//!     TileCoord::new(3, 3),
//!     &Reservations::new(),
//! );
//! assert!(step.is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod collision;
pub mod hash;
pub mod map;
pub mod path;

// Re-exports for convenience
pub use collision::{CollisionSet, TileProperties, LAB_COLLIDING_RANGES};
pub use hash::hash_grid;
pub use map::{CollisionOracle, GridConfig, GridError, GridMap};
pub use path::{Pathfinder, Reservations, DEFAULT_PATH_BUDGET};

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Integer address of a grid cell.
///
/// Tile coordinates are distinct from pixel positions. `x` grows to the right
/// and `y` grows downward, so [`Direction::Up`] decreases `y`.
///
/// Ordering compares `x` then `y`. It only exists to give sets of tiles a
/// deterministic iteration order.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl TileCoord {
    /// Creates a tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate as a glam vector.
    #[must_use]
    pub const fn as_ivec2(self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    /// Returns the neighbouring tile one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        (self.as_ivec2() + direction.delta()).into()
    }

    /// Manhattan distance between two tiles.
    #[must_use]
    pub fn manhattan(self, other: Self) -> u32 {
        (self.as_ivec2() - other.as_ivec2()).abs().element_sum().unsigned_abs()
    }

    /// Returns true if `other` is exactly one orthogonal step away.
    #[must_use]
    pub fn is_adjacent(self, other: Self) -> bool {
        self.manhattan(other) == 1
    }

    /// The four orthogonal neighbours in [`Direction::ALL`] order.
    #[must_use]
    pub fn neighbors(self) -> [Self; 4] {
        Direction::ALL.map(|direction| self.step(direction))
    }

    /// Returns the direction that leads from `self` to an adjacent `other`.
    #[must_use]
    pub fn direction_to(self, other: Self) -> Option<Direction> {
        let delta = other.as_ivec2() - self.as_ivec2();
        Direction::ALL.into_iter().find(|d| d.delta() == delta)
    }
}

impl fmt::Debug for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileCoord({}, {})", self.x, self.y)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<IVec2> for TileCoord {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<TileCoord> for IVec2 {
    fn from(tile: TileCoord) -> Self {
        tile.as_ivec2()
    }
}

impl From<(i32, i32)> for TileCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// One of the four orthogonal movement directions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward smaller `y`
    Up,
    /// Toward larger `x`
    Right,
    /// Toward larger `y`
    Down,
    /// Toward smaller `x`
    Left,
}

impl Direction {
    /// All directions in clockwise order starting from `Up`.
    ///
    /// Neighbour expansion in the pathfinder follows this order, which keeps
    /// tie-breaking between equal-cost routes deterministic.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Unit offset for this direction.
    #[must_use]
    pub const fn delta(self) -> IVec2 {
        match self {
            Self::Up => IVec2::new(0, -1),
            Self::Right => IVec2::new(1, 0),
            Self::Down => IVec2::new(0, 1),
            Self::Left => IVec2::new(-1, 0),
        }
    }

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Right => write!(f, "right"),
            Self::Down => write!(f, "down"),
            Self::Left => write!(f, "left"),
        }
    }
}
