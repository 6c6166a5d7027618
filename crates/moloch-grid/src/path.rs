//! Bounded A* pathfinding over the walkable grid.
//!
//! The [`Pathfinder`] holds no per-search state. Every call searches from
//! scratch against the current collision oracle and the caller's
//! [`Reservations`], because tile occupancy changes every turn and cached
//! routes would go stale.
//!
//! # Iteration Budget
//!
//! Each search may expand at most `budget` nodes. When the budget runs out
//! the search gives up and reports no route. An unreachable goal on a large
//! map therefore costs a bounded amount of work.

use std::collections::BTreeSet;

use pathfinding::prelude::astar;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::map::CollisionOracle;
use crate::TileCoord;

/// Default node-expansion budget per search.
pub const DEFAULT_PATH_BUDGET: usize = 1000;

/// Tiles temporarily held by combatants during one resolution phase.
///
/// Reservations are owned by whoever runs the phase and are cleared when the
/// phase ends. The pathfinder never routes through a reserved tile, except
/// when that tile is the goal itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservations {
    tiles: BTreeSet<TileCoord>,
}

impl Reservations {
    /// Creates an empty reservation set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a tile. Returns false if it was already reserved.
    pub fn reserve(&mut self, tile: TileCoord) -> bool {
        self.tiles.insert(tile)
    }

    /// Releases a tile. Returns false if it was not reserved.
    pub fn release(&mut self, tile: TileCoord) -> bool {
        self.tiles.remove(&tile)
    }

    /// Returns true if the tile is reserved.
    #[must_use]
    pub fn contains(&self, tile: TileCoord) -> bool {
        self.tiles.contains(&tile)
    }

    /// Drops every reservation.
    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// Number of reserved tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns true if nothing is reserved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Reserved tiles in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.tiles.iter().copied()
    }
}

impl FromIterator<TileCoord> for Reservations {
    fn from_iter<I: IntoIterator<Item = TileCoord>>(iter: I) -> Self {
        Self {
            tiles: iter.into_iter().collect(),
        }
    }
}

impl Extend<TileCoord> for Reservations {
    fn extend<I: IntoIterator<Item = TileCoord>>(&mut self, iter: I) {
        self.tiles.extend(iter);
    }
}

/// A* search over 4-connected tiles with unit step cost.
///
/// # Example
///
/// ```
/// use moloch_grid::{GridMap, Pathfinder, Reservations, TileCoord};
///
/// let grid = GridMap::from_ascii(
///     "....\n\
///      .##.\n\
///      ....",
/// )
/// .unwrap();
///
/// let finder = Pathfinder::new(100);
/// let path = finder
///     .find_path(&grid, TileCoord::new(0, 1), TileCoord::new(3, 1), &Reservations::new())
///     .unwrap();
///
/// assert_eq!(path.first(), Some(&TileCoord::new(0, 1)));
/// assert_eq!(path.last(), Some(&TileCoord::new(3, 1)));
/// assert_eq!(path.len(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pathfinder {
    budget: usize,
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new(DEFAULT_PATH_BUDGET)
    }
}

impl Pathfinder {
    /// Creates a pathfinder that expands at most `budget` nodes per search.
    #[must_use]
    pub const fn new(budget: usize) -> Self {
        Self { budget }
    }

    /// Node-expansion budget per search.
    #[must_use]
    pub const fn budget(&self) -> usize {
        self.budget
    }

    /// Returns the first tile to step onto when travelling from `from` to `to`.
    ///
    /// Returns `None` when `from == to`, when no route exists, or when the
    /// search exhausts its budget.
    #[must_use]
    pub fn next_step<O>(
        &self,
        grid: &O,
        from: TileCoord,
        to: TileCoord,
        reserved: &Reservations,
    ) -> Option<TileCoord>
    where
        O: CollisionOracle + ?Sized,
    {
        self.find_path(grid, from, to, reserved)
            .and_then(|path| path.get(1).copied())
    }

    /// Computes a full route from `from` to `to`, both ends included.
    ///
    /// Intermediate tiles are never colliding or reserved. The goal may be
    /// reserved but must not collide. The start tile is never checked.
    #[must_use]
    pub fn find_path<O>(
        &self,
        grid: &O,
        from: TileCoord,
        to: TileCoord,
        reserved: &Reservations,
    ) -> Option<Vec<TileCoord>>
    where
        O: CollisionOracle + ?Sized,
    {
        if from == to {
            return Some(vec![from]);
        }

        let budget = self.budget;
        let mut expanded = 0usize;
        let result = astar(
            &from,
            |&tile| {
                if expanded >= budget {
                    return Vec::new();
                }
                expanded += 1;
                tile.neighbors()
                    .into_iter()
                    .filter(|&next| !grid.collides(next) && (next == to || !reserved.contains(next)))
                    .map(|next| (next, 1u32))
                    .collect()
            },
            |&tile| tile.manhattan(to),
            |&tile| tile == to,
        );

        match result {
            Some((path, cost)) => {
                trace!(%from, %to, cost, expanded, "path found");
                Some(path)
            }
            None => {
                trace!(%from, %to, expanded, budget, "no path");
                None
            }
        }
    }
}
