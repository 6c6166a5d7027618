//! A simple player bot for headless runs and balance sweeps.

use moloch_grid::{CollisionOracle, Pathfinder, Reservations};

use crate::combatant::Combatant;
use crate::input::Intent;
use crate::state::MatchState;

/// Walks toward the nearest living enemy and bump-attacks it.
///
/// Distance is Manhattan; ties go to the earlier enemy in roster order. When
/// no route exists the bot attacks in place, which holds and still spends the
/// turn.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use moloch_core::autopilot::Autopilot;
/// use moloch_core::config::EngineConfig;
/// use moloch_core::engine::TurnEngine;
/// use moloch_core::input::Intent;
/// use moloch_core::setup::{CombatantSpawn, MatchSetup};
/// use moloch_grid::{Direction, GridMap, TileCoord};
///
/// let grid = Arc::new(GridMap::open(5, 1).unwrap());
/// let mut engine = TurnEngine::new(grid.clone(), EngineConfig::default());
/// engine
///     .begin(MatchSetup {
///         player: CombatantSpawn::new(TileCoord::new(0, 0), 5, 1, 0),
///         enemies: vec![CombatantSpawn::new(TileCoord::new(4, 0), 1, 1, 0)],
///         turns_budget: 10,
///         seed: 1,
///     })
///     .unwrap();
///
/// let bot = Autopilot::default();
/// let intent = bot.choose(engine.state().unwrap(), grid.as_ref());
/// assert_eq!(intent, Intent::Move(Direction::Right));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot {
    pathfinder: Pathfinder,
}

impl Autopilot {
    /// Creates a bot with its own route budget.
    #[must_use]
    pub fn new(pathfinder: Pathfinder) -> Self {
        Self { pathfinder }
    }

    /// Picks the player's next intent. Returns [`Intent::None`] once the
    /// match is over.
    #[must_use]
    pub fn choose<O>(&self, state: &MatchState, grid: &O) -> Intent
    where
        O: CollisionOracle + ?Sized,
    {
        if state.is_game_over() {
            return Intent::None;
        }
        let here = state.player().position();
        let Some(target) = state
            .roster()
            .living_enemies()
            .min_by_key(|enemy| enemy.position().manhattan(here))
            .map(Combatant::position)
        else {
            return Intent::None;
        };

        self.pathfinder
            .next_step(grid, here, target, &Reservations::new())
            .and_then(|step| here.direction_to(step))
            .map_or(Intent::Attack, Intent::Move)
    }
}
