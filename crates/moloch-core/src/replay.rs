//! Deterministic replay and history verification.
//!
//! A match is fully determined by its map, setup, config and the ordered list
//! of accepted intents. Replaying those inputs must reproduce the recorded
//! move history record for record; any difference means the inputs, the map
//! or the engine changed.

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::engine::{SharedGrid, TurnEngine};
use crate::error::{ReplayError, SetupError};
use crate::input::Intent;
use crate::setup::MatchSetup;
use crate::state::{MatchState, MoveRecord};

/// Re-runs a match from scratch and returns the engine in its final state.
///
/// Intents past the end of the match are ignored, as they would have been
/// live.
///
/// # Errors
///
/// Returns the [`SetupError`] if `setup` does not validate against `grid`.
pub fn replay(
    grid: SharedGrid,
    setup: &MatchSetup,
    config: EngineConfig,
    intents: &[Intent],
) -> Result<TurnEngine, SetupError> {
    let mut engine = TurnEngine::new(grid, config);
    engine.begin(setup.clone())?;
    let resolved = intents
        .iter()
        .filter(|&&intent| engine.submit_intent(intent).is_resolved())
        .count();
    debug!(offered = intents.len(), resolved, "replay finished");
    Ok(engine)
}

/// Index of the first record where two histories differ, if any.
///
/// A history that is a strict prefix of the other differs at the shorter
/// one's length.
#[must_use]
pub fn first_divergence(expected: &[MoveRecord], actual: &[MoveRecord]) -> Option<usize> {
    expected
        .iter()
        .zip(actual)
        .position(|(a, b)| a != b)
        .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())))
}

/// Compares a recorded history with a replayed one.
///
/// # Errors
///
/// [`ReplayError::Diverged`] at the first differing record, or
/// [`ReplayError::LengthMismatch`] if one is a prefix of the other.
pub fn compare_histories(expected: &[MoveRecord], actual: &[MoveRecord]) -> Result<(), ReplayError> {
    match first_divergence(expected, actual) {
        None => Ok(()),
        Some(index) => match (expected.get(index), actual.get(index)) {
            (Some(&e), Some(&a)) => Err(ReplayError::Diverged {
                index,
                expected: e,
                actual: a,
            }),
            _ => Err(ReplayError::LengthMismatch {
                expected: expected.len(),
                actual: actual.len(),
            }),
        },
    }
}

/// Replays a match and checks the result against `recorded`.
///
/// # Errors
///
/// Any [`ReplayError`]: a setup failure or the first disagreement.
pub fn verify_history(
    grid: SharedGrid,
    setup: &MatchSetup,
    config: EngineConfig,
    intents: &[Intent],
    recorded: &[MoveRecord],
) -> Result<(), ReplayError> {
    let engine = replay(grid, setup, config, intents)?;
    let replayed = engine.state().map_or(&[][..], MatchState::move_history);
    let result = compare_histories(recorded, replayed);
    if let Err(err) = &result {
        warn!(%err, "history verification failed");
    }
    result
}
