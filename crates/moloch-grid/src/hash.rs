//! Grid hashing for replay verification.
//!
//! Two runs can only be compared if they were played on the same map. The
//! digest covers dimensions, every tile ID and the collision set, so any
//! change that could alter a collision answer changes the hash.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::map::GridMap;

/// Compute a deterministic hash of a grid.
///
/// The value is stable for a given build of the crate. It is meant for
/// comparing two runs of the same binary, not for long-term storage.
#[must_use]
pub fn hash_grid(grid: &GridMap) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_grid_into(grid, &mut hasher);
    hasher.finish()
}

/// Feed a grid into an existing hasher.
pub fn hash_grid_into<H: Hasher>(grid: &GridMap, hasher: &mut H) {
    grid.width().hash(hasher);
    grid.height().hash(hasher);
    grid.tiles().hash(hasher);

    let collision = grid.collision_set();
    for range in collision.ranges() {
        0u8.hash(hasher); // Discriminant for range
        range.start().hash(hasher);
        range.end().hash(hasher);
    }
    for id in collision.ids() {
        1u8.hash(hasher); // Discriminant for single id
        id.hash(hasher);
    }
}
