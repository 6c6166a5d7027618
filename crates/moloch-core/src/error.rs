//! Error types for match setup, outcome reporting and replay.
//!
//! Per-turn problems (ignored intents, blocked moves, missing paths) are not
//! errors. They surface as [`Submission::Ignored`](crate::engine::Submission)
//! or as resolution events. The types here cover the boundaries where the
//! engine talks to something outside a turn.

use moloch_grid::TileCoord;
use thiserror::Error;

use crate::combatant::CombatantId;
use crate::state::MoveRecord;

/// A match configuration the engine refuses to start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The turn budget is zero, so the match would end before it starts
    #[error("turn budget must be at least 1")]
    ZeroTurnBudget,
    /// No enemies to fight
    #[error("match needs at least one enemy")]
    NoEnemies,
    /// A combatant spawns on a colliding tile
    #[error("{combatant} spawns on blocked tile {at}")]
    SpawnBlocked {
        /// Offending combatant
        combatant: CombatantId,
        /// Spawn tile
        at: TileCoord,
    },
    /// Two combatants share a spawn tile
    #[error("{first} and {second} both spawn on {at}")]
    SharedSpawn {
        /// Earlier combatant in roster order
        first: CombatantId,
        /// Later combatant in roster order
        second: CombatantId,
        /// Shared tile
        at: TileCoord,
    },
    /// Dice with no faces
    #[error("{combatant} has zero dice sides")]
    ZeroDiceSides {
        /// Offending combatant
        combatant: CombatantId,
    },
    /// Setup was offered to an engine that is not awaiting one
    #[error("engine already has a match in progress")]
    AlreadyStarted,
}

/// Opaque failure from an outcome reporter.
///
/// The engine logs these and never retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// The receiving side has gone away
    #[error("outcome receiver disconnected")]
    Disconnected,
    /// The receiver refused the report
    #[error("outcome rejected: {0}")]
    Rejected(String),
}

/// Replayed history disagrees with a recorded one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    /// Setup of the replayed match failed
    #[error(transparent)]
    Setup(#[from] SetupError),
    /// Histories have different lengths but agree on their common prefix
    #[error("history length mismatch: recorded {expected}, replayed {actual}")]
    LengthMismatch {
        /// Recorded length
        expected: usize,
        /// Replayed length
        actual: usize,
    },
    /// First record where the two histories differ
    #[error("history diverges at record {index}: recorded {expected:?}, replayed {actual:?}")]
    Diverged {
        /// Index into the history
        index: usize,
        /// Recorded value
        expected: MoveRecord,
        /// Replayed value
        actual: MoveRecord,
    },
}
