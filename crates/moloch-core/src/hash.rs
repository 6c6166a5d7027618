//! State hashing for determinism checks.
//!
//! Two runs of the same match should reach bit-identical states. Comparing
//! whole states is noisy in logs, so runs compare a digest instead.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use moloch_grid::hash::hash_grid_into;
use moloch_grid::GridMap;

use crate::state::MatchState;

/// Compute a deterministic hash of a match state.
///
/// Covers the turn counters, terminal flags, every combatant's position and
/// stats, and the full move history. Like the grid hash, the value is stable
/// within one build of the crate.
#[must_use]
pub fn hash_state(state: &MatchState) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_state_into(state, &mut hasher);
    hasher.finish()
}

/// Hash of a state together with the map it was played on.
#[must_use]
pub fn hash_match(grid: &GridMap, state: &MatchState) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_grid_into(grid, &mut hasher);
    hash_state_into(state, &mut hasher);
    hasher.finish()
}

fn hash_state_into<H: Hasher>(state: &MatchState, hasher: &mut H) {
    state.turns_budget().hash(hasher);
    state.turns_remaining().hash(hasher);
    state.is_game_over().hash(hasher);
    state.is_victory().hash(hasher);
    state.outcome().hash(hasher);

    for c in state.roster().iter() {
        c.id().hash(hasher);
        c.faction().hash(hasher);
        c.position().hash(hasher);
        c.hp().hash(hasher);
        c.ap().hash(hasher);
        c.dp().hash(hasher);
        c.dice_sides().hash(hasher);
    }
    state.move_history().hash(hasher);
}
