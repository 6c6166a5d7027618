//! Batch command implementation.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use moloch_core::{run_batch, BatchResult, Outcome};
use serde::Serialize;
use tracing::{info, warn};

use super::{print_json, shared, Scenario};

/// Aggregate statistics over a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct BatchSummary {
    pub matches: usize,
    pub victories: usize,
    pub defeats: usize,
    pub attrition: usize,
    pub win_rate: f64,
    pub mean_turns: f64,
    pub mean_player_hp: f64,
}

impl BatchSummary {
    pub(crate) fn from_results(results: &[BatchResult]) -> Self {
        let count = |outcome| results.iter().filter(|r| r.outcome == Some(outcome)).count();
        let victories = count(Outcome::Victory);
        let matches = results.len();
        #[allow(clippy::cast_precision_loss)]
        let mean = |total: i64| {
            if matches == 0 {
                0.0
            } else {
                total as f64 / matches as f64
            }
        };

        Self {
            matches,
            victories,
            defeats: count(Outcome::Defeat),
            attrition: count(Outcome::Attrition),
            win_rate: mean(i64::try_from(victories).unwrap_or(i64::MAX)),
            mean_turns: mean(results.iter().map(|r| i64::from(r.turns_used)).sum()),
            mean_player_hp: mean(results.iter().map(|r| i64::from(r.player_hp.max(0))).sum()),
        }
    }
}

#[derive(Debug, Serialize)]
struct BatchOutput<'a> {
    summary: BatchSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<&'a [BatchResult]>,
}

/// Execute the batch command.
///
/// # Errors
///
/// Returns an error if the scenario cannot be loaded or its setup does not
/// fit the map.
pub(crate) fn execute(
    scenario: &Path,
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    verbose: bool,
) -> Result<()> {
    let scenario = Scenario::load(scenario)?;

    if let Some(num_threads) = threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(num_threads).build_global() {
            warn!(%e, "thread pool already initialized");
        }
    }

    let start = Instant::now();
    let results = run(&scenario, games, seed)?;
    let summary = BatchSummary::from_results(&results);
    info!(
        matches = summary.matches,
        win_rate = summary.win_rate,
        elapsed = ?start.elapsed(),
        "batch complete"
    );

    print_json(&BatchOutput {
        summary,
        results: verbose.then_some(results.as_slice()),
    })
}

/// Runs `games` autopilot matches with consecutive seeds.
pub(crate) fn run(scenario: &Scenario, games: u64, seed: Option<u64>) -> Result<Vec<BatchResult>> {
    let base = seed.unwrap_or(scenario.setup.seed);
    let seeds: Vec<u64> = (0..games).map(|i| base.wrapping_add(i)).collect();
    let map = scenario.build_grid()?;
    run_batch(&shared(&map), &scenario.setup, scenario.config, &seeds).context("scenario setup rejected")
}
