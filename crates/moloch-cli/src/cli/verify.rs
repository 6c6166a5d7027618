//! Verify command implementation.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use moloch_core::replay::{compare_histories, replay};
use serde::Serialize;
use tracing::info;

use super::{print_json, shared, Recording, Scenario};

/// Result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Verified {
    pub seed: u64,
    pub turns: usize,
    pub records: usize,
}

/// Execute the verify command.
///
/// # Errors
///
/// Returns an error if either file cannot be loaded, or if the replayed
/// match disagrees with the recording.
pub(crate) fn execute(scenario: &Path, recording: &Path) -> Result<()> {
    let scenario = Scenario::load(scenario)?;
    let recording = Recording::load(recording)?;
    print_json(&check(&scenario, &recording)?)
}

/// Replays the recorded intents and checks the move history and final state.
pub(crate) fn check(scenario: &Scenario, recording: &Recording) -> Result<Verified> {
    let map = scenario.build_grid()?;
    let setup = scenario.setup_with_seed(Some(recording.seed));
    let engine = replay(shared(&map), &setup, scenario.config, &recording.intents)
        .context("scenario setup rejected")?;
    let state = engine.state().context("engine has no match")?;

    compare_histories(&recording.snapshot.move_history, state.move_history())
        .context("recorded move history does not match the replay")?;

    let replayed = engine.snapshot();
    ensure!(
        replayed == recording.snapshot,
        "final state mismatch: recorded {:?} with {} turns left, replayed {:?} with {} turns left",
        recording.snapshot.outcome,
        recording.snapshot.turns_remaining,
        replayed.outcome,
        replayed.turns_remaining
    );

    info!(seed = recording.seed, records = state.move_history().len(), "recording verified");
    Ok(Verified {
        seed: recording.seed,
        turns: recording.intents.len(),
        records: state.move_history().len(),
    })
}
