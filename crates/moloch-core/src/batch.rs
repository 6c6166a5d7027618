//! Parallel autopilot matches for balance sweeps.
//!
//! Every seed plays an independent match on its own engine, so the sweep
//! parallelises with `rayon` without sharing mutable state. Results come back
//! in the order of the input seeds regardless of scheduling.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::autopilot::Autopilot;
use crate::config::EngineConfig;
use crate::engine::{EnginePhase, SharedGrid, TurnEngine};
use crate::error::SetupError;
use crate::setup::MatchSetup;
use crate::state::Outcome;

/// Result of one autopilot match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Dice seed of the match
    pub seed: u64,
    /// Final outcome; `None` only if the match stalled
    pub outcome: Option<Outcome>,
    /// Turns resolved
    pub turns_used: u32,
    /// Player health at the end
    pub player_hp: i32,
    /// Enemies still standing at the end
    pub enemies_alive: usize,
}

/// Plays one match with the [`Autopilot`] at the wheel until it ends.
///
/// # Errors
///
/// Returns the [`SetupError`] if `setup` is invalid for `grid`.
pub fn play_autopilot(grid: SharedGrid, setup: &MatchSetup, config: EngineConfig) -> Result<TurnEngine, SetupError> {
    let bot = Autopilot::new(config.pathfinder());
    let mut engine = TurnEngine::new(grid, config);
    engine.begin(setup.clone())?;

    // Every resolved intent spends a turn, so the budget bounds the loop. The
    // extra slack covers intents ignored as blocked.
    let max_offers = (setup.turns_budget as usize + 1) * 2;
    for _ in 0..max_offers {
        if engine.phase() == EnginePhase::Terminal {
            break;
        }
        let Some(state) = engine.state() else {
            break;
        };
        let intent = bot.choose(state, engine.grid().as_ref());
        engine.submit_intent(intent);
    }
    Ok(engine)
}

/// Plays one autopilot match per seed in parallel.
///
/// # Errors
///
/// Returns the [`SetupError`] if `setup` is invalid for `grid`. The seed in
/// `setup` is ignored.
pub fn run_batch(
    grid: &SharedGrid,
    setup: &MatchSetup,
    config: EngineConfig,
    seeds: &[u64],
) -> Result<Vec<BatchResult>, SetupError> {
    setup.validate(grid.as_ref(), config.default_dice_sides)?;
    info!(matches = seeds.len(), "batch started");

    let results: Vec<BatchResult> = seeds
        .par_iter()
        .map(|&seed| {
            let seeded = MatchSetup {
                seed,
                ..setup.clone()
            };
            play_autopilot(grid.clone(), &seeded, config).map(|engine| summarize(seed, &engine))
        })
        .collect::<Result<_, _>>()?;

    let victories = results
        .iter()
        .filter(|r| r.outcome == Some(Outcome::Victory))
        .count();
    info!(matches = results.len(), victories, "batch finished");
    Ok(results)
}

fn summarize(seed: u64, engine: &TurnEngine) -> BatchResult {
    let result = match engine.state() {
        Some(state) => BatchResult {
            seed,
            outcome: state.outcome(),
            turns_used: state.turns_used(),
            player_hp: state.player().hp(),
            enemies_alive: state.roster().living_enemies().count(),
        },
        None => BatchResult {
            seed,
            outcome: None,
            turns_used: 0,
            player_hp: 0,
            enemies_alive: 0,
        },
    };
    debug!(seed, outcome = ?result.outcome, turns = result.turns_used, "batch match done");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::CombatantSpawn;
    use moloch_grid::{GridMap, TileCoord};
    use std::sync::Arc;

    fn arena() -> (SharedGrid, MatchSetup) {
        let grid: SharedGrid = Arc::new(GridMap::open(10, 10).unwrap());
        let setup = MatchSetup {
            player: CombatantSpawn::new(TileCoord::new(0, 0), 6, 2, 0),
            enemies: vec![
                CombatantSpawn::new(TileCoord::new(9, 9), 2, 1, 0),
                CombatantSpawn::new(TileCoord::new(9, 0), 2, 1, 0),
            ],
            turns_budget: 40,
            seed: 0,
        };
        (grid, setup)
    }

    #[test]
    fn results_follow_seed_order() {
        let (grid, setup) = arena();
        let seeds = [9, 3, 27, 1, 14];
        let results = run_batch(&grid, &setup, EngineConfig::default(), &seeds).unwrap();
        let returned: Vec<u64> = results.iter().map(|r| r.seed).collect();
        assert_eq!(returned, seeds);
    }

    #[test]
    fn every_match_terminates() {
        let (grid, setup) = arena();
        let results = run_batch(&grid, &setup, EngineConfig::default(), &[1, 2, 3, 4]).unwrap();
        assert!(results.iter().all(|r| r.outcome.is_some()));
        assert!(results.iter().all(|r| r.turns_used <= 40));
    }

    #[test]
    fn batch_matches_sequential_play() {
        let (grid, setup) = arena();
        let batch = run_batch(&grid, &setup, EngineConfig::default(), &[5]).unwrap();
        let engine = play_autopilot(grid, &MatchSetup { seed: 5, ..setup }, EngineConfig::default()).unwrap();
        assert_eq!(batch[0], summarize(5, &engine));
    }

    #[test]
    fn invalid_setup_fails_fast() {
        let (grid, setup) = arena();
        let broken = MatchSetup {
            enemies: Vec::new(),
            ..setup
        };
        assert_eq!(
            run_batch(&grid, &broken, EngineConfig::default(), &[1]),
            Err(SetupError::NoEnemies)
        );
    }
}
