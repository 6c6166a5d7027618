//! # Moloch Core
//!
//! Turn-based combat rules engine for Moloch.
//!
//! The engine is a deterministic state machine. Given a collision oracle, a
//! seeded dice source and a stream of player intents, it resolves movement,
//! pathfinding, damage and termination and produces the same match every
//! time. Rendering, input devices and external setup live outside; they talk
//! to the engine through narrow seams.
//!
//! ## Architecture
//!
//! - **Data**: [`Combatant`], [`MatchState`], [`MoveRecord`]
//! - **Rules**: movement and damage on [`Combatant`], behaviour per faction in
//!   [`policy`]
//! - **Orchestration**: [`TurnEngine`] owns the match and resolves one turn per
//!   accepted [`Intent`]
//! - **Seams**: [`RandomSource`], [`SetupSource`], [`OutcomeReporter`] and the
//!   grid's `CollisionOracle`
//! - **Audit**: [`replay`](replay::replay), [`verify_history`] and
//!   [`hash_state`]
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use moloch_core::{EngineConfig, Intent, MatchSetup, TurnEngine};
//! use moloch_grid::{Direction, GridMap};
//!
//! let grid = GridMap::open(24, 12).unwrap();
//! let mut engine = TurnEngine::new(Arc::new(grid), EngineConfig::default());
//! engine.begin(MatchSetup::offline()).unwrap();
//!
//! while !engine.snapshot().game_over {
//!     engine.submit_intent(Intent::Move(Direction::Right));
//! }
//! assert!(engine.snapshot().move_history.len() >= 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod autopilot;
pub mod batch;
pub mod combatant;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod hash;
pub mod input;
pub mod policy;
pub mod random;
pub mod replay;
pub mod setup;
pub mod state;

// Re-exports for convenience
pub use autopilot::Autopilot;
pub use batch::{play_autopilot, run_batch, BatchResult};
pub use combatant::{Combatant, CombatantId, CombatantStats, DamageRoll, Faction};
pub use config::EngineConfig;
pub use engine::{
    CombatantView, EnginePhase, IgnoreReason, SharedGrid, Snapshot, Submission, TurnEngine, TurnReport,
};
pub use error::{ReplayError, ReportError, SetupError};
pub use event::{EventLog, ResolutionEvent};
pub use hash::{hash_match, hash_state};
pub use input::{Buttons, InputGate, Intent};
pub use policy::{PlannedAction, PolicyTable, TurnPolicy};
pub use random::{ChaChaDice, RandomSource, ScriptedRolls};
pub use replay::verify_history;
pub use setup::{CombatantSpawn, MatchSetup, OutcomeReport, OutcomeReporter, SetupPoll, SetupSource};
pub use state::{MatchState, MoveRecord, Outcome, Roster};

#[cfg(test)]
mod tests;
