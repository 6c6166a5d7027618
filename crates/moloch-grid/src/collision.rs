//! Collision set: which tile IDs block movement.
//!
//! A map's collision set is built once at load time from two sources:
//!
//! 1. Explicit inclusive ranges of colliding tile IDs
//! 2. Tileset properties that mark individual tile IDs with `collide = true`
//!
//! The set is the union of both. Tile IDs that appear in neither source are
//! walkable, including IDs that have a properties entry with `collide = false`.
//! Movement and pathfinding both consult the same set, so a tile that blocks a
//! step also blocks a route.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::map::GridError;

/// Colliding tile-ID ranges of the laboratory tileset.
pub const LAB_COLLIDING_RANGES: &[(u32, u32)] = &[
    (4, 25),
    (29, 50),
    (54, 75),
    (79, 100),
    (104, 125),
    (129, 182),
    (186, 188),
];

/// Per-tile metadata declared by a tileset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileProperties {
    /// Tile blocks movement
    #[serde(default)]
    pub collide: bool,
}

/// Set of tile IDs that block movement.
///
/// # Example
///
/// ```
/// use moloch_grid::{CollisionSet, TileProperties};
///
/// let set = CollisionSet::from_ranges(&[(4, 6)])
///     .unwrap()
///     .with_tile_properties([(10, TileProperties { collide: true })]);
///
/// assert!(set.contains(5));
/// assert!(set.contains(10));
/// assert!(!set.contains(7));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionSet {
    ranges: Vec<(u32, u32)>,
    ids: BTreeSet<u32>,
}

impl CollisionSet {
    /// Creates an empty set where every tile is walkable.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from inclusive `(start, end)` ranges.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvertedRange`] if any range has `start > end`.
    pub fn from_ranges(ranges: &[(u32, u32)]) -> Result<Self, GridError> {
        if let Some(&(start, end)) = ranges.iter().find(|(start, end)| start > end) {
            return Err(GridError::InvertedRange { start, end });
        }
        Ok(Self {
            ranges: ranges.to_vec(),
            ids: BTreeSet::new(),
        })
    }

    /// Adds every tile ID whose properties declare `collide = true`.
    #[must_use]
    pub fn with_tile_properties<I>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (u32, TileProperties)>,
    {
        self.ids.extend(
            properties
                .into_iter()
                .filter(|(_, props)| props.collide)
                .map(|(id, _)| id),
        );
        self
    }

    /// Marks a single tile ID as colliding.
    pub fn insert(&mut self, id: u32) {
        self.ids.insert(id);
    }

    /// Returns true if the tile ID blocks movement.
    #[must_use]
    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id) || self.ranges.iter().any(|&(start, end)| (start..=end).contains(&id))
    }

    /// Iterates the explicit ranges as inclusive ranges.
    pub fn ranges(&self) -> impl Iterator<Item = RangeInclusive<u32>> + '_ {
        self.ranges.iter().map(|&(start, end)| start..=end)
    }

    /// Iterates the individually declared IDs in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.ids.iter().copied()
    }

    /// Returns true if nothing collides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty() && self.ids.is_empty()
    }
}
