//! Play command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use moloch_core::replay::replay;
use moloch_core::play_autopilot;
use tracing::info;

use super::{print_json, shared, Recording, Scenario};

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the scenario cannot be loaded or its setup does not
/// fit the map, or if the recording cannot be written.
pub(crate) fn execute(
    scenario: &Path,
    autopilot: bool,
    seed: Option<u64>,
    events: bool,
    save: Option<&Path>,
) -> Result<()> {
    let scenario = Scenario::load(scenario)?;
    let recording = run(&scenario, autopilot, seed, events)?;

    if let Some(path) = save {
        let json = serde_json::to_string_pretty(&recording)?;
        fs::write(path, json).with_context(|| format!("failed to write recording {}", path.display()))?;
        info!(path = %path.display(), "recording saved");
    }
    print_json(&recording)
}

/// Plays `scenario` to completion (or until the script runs out).
pub(crate) fn run(scenario: &Scenario, autopilot: bool, seed: Option<u64>, events: bool) -> Result<Recording> {
    let map = scenario.build_grid()?;
    let setup = scenario.setup_with_seed(seed);

    let mut engine = if autopilot {
        play_autopilot(shared(&map), &setup, scenario.config)
    } else {
        replay(shared(&map), &setup, scenario.config, &scenario.intents)
    }
    .context("scenario setup rejected")?;

    let snapshot = engine.snapshot();
    info!(
        seed = setup.seed,
        outcome = ?snapshot.outcome,
        turns_left = snapshot.turns_remaining,
        "match played"
    );

    Ok(Recording {
        seed: setup.seed,
        intents: engine.accepted_intents().to_vec(),
        snapshot,
        events: if events { engine.take_events() } else { Vec::new() },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::lab;
    use moloch_core::{EnginePhase, Outcome};

    #[test]
    fn scripted_play_follows_the_script() {
        let recording = run(&lab(), false, None, false).unwrap();
        let played = recording.intents.len();
        assert_eq!(recording.seed, 50);
        assert!(played >= 1 && played <= 8);
        assert_eq!(recording.intents[..], lab().intents[..played]);
        assert_eq!(recording.snapshot.turns_remaining as usize, 50 - played);
        // Spawn records plus one record per combatant per turn
        assert_eq!(recording.snapshot.move_history.len(), 4 + played * 4);
        assert!(recording.events.is_empty());
    }

    #[test]
    fn autopilot_play_finishes() {
        let recording = run(&lab(), true, Some(3), true).unwrap();
        assert_eq!(recording.seed, 3);
        assert_eq!(recording.snapshot.phase, EnginePhase::Terminal);
        assert!(recording.snapshot.outcome.is_some());
        assert!(!recording.events.is_empty());
    }

    #[test]
    fn seeds_are_reproducible() {
        let a = run(&lab(), true, Some(11), false).unwrap();
        let b = run(&lab(), true, Some(11), false).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn recording_serializes_outcome() {
        let recording = run(&lab(), true, Some(5), false).unwrap();
        let json = serde_json::to_value(&recording).unwrap();
        assert!(json.get("events").is_none());
        let outcome = json["snapshot"]["outcome"].as_str().unwrap();
        let expected = match recording.snapshot.outcome.unwrap() {
            Outcome::Victory => "victory",
            Outcome::Defeat => "defeat",
            Outcome::Attrition => "attrition",
        };
        assert_eq!(outcome, expected);
    }
}
