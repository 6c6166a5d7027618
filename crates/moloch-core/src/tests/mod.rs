//! Determinism and integration tests for the turn engine.
//!
//! - `determinism.rs`: same inputs give the same match; replay and hashing
//! - `integration.rs`: end-to-end turn scenarios through [`TurnEngine`](crate::engine::TurnEngine)
//! - `helpers.rs`: map, setup and engine factories

mod determinism;
mod helpers;

pub use helpers::*;
