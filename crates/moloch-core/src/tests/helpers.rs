//! Factories for maps, setups and engines used across the test suites.

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use moloch_grid::{GridMap, TileCoord};

use crate::config::EngineConfig;
use crate::engine::{SharedGrid, Submission, TurnEngine, TurnReport};
use crate::input::Intent;
use crate::random::ScriptedRolls;
use crate::setup::{ChannelReporter, CombatantSpawn, MatchSetup, OutcomeReport};

// =============================================================================
// Maps
// =============================================================================

/// An open `width` x `height` map with no walls.
pub fn open_grid(width: u32, height: u32) -> SharedGrid {
    Arc::new(GridMap::open(width, height).unwrap())
}

/// A map from ASCII art: `#` is a wall, `.` is floor.
pub fn ascii_grid(art: &str) -> SharedGrid {
    Arc::new(GridMap::from_ascii(art).unwrap())
}

/// A 12x8 room with a pillar block in the middle.
pub fn pillar_room() -> SharedGrid {
    ascii_grid(
        "############\n\
         #..........#\n\
         #..........#\n\
         #....##....#\n\
         #....##....#\n\
         #..........#\n\
         #..........#\n\
         ############",
    )
}

// =============================================================================
// Setups
// =============================================================================

/// Spawn at `(x, y)` with the given stats and the default die.
pub fn spawn(x: i32, y: i32, hp: i32, ap: u32, dp: u32) -> CombatantSpawn {
    CombatantSpawn::new(TileCoord::new(x, y), hp, ap, dp)
}

/// Player plus enemies with a turn budget and seed.
pub fn setup(player: CombatantSpawn, enemies: Vec<CombatantSpawn>, turns: u32, seed: u64) -> MatchSetup {
    MatchSetup {
        player,
        enemies,
        turns_budget: turns,
        seed,
    }
}

/// Three enemies spread around [`pillar_room`].
pub fn skirmish(seed: u64) -> MatchSetup {
    setup(
        spawn(1, 1, 8, 2, 1),
        vec![spawn(10, 1, 3, 1, 0), spawn(10, 6, 3, 1, 0), spawn(1, 6, 3, 1, 0)],
        30,
        seed,
    )
}

// =============================================================================
// Engines
// =============================================================================

/// Engine that has already begun `setup` with default config.
pub fn started(grid: SharedGrid, setup: MatchSetup) -> TurnEngine {
    started_with(grid, setup, EngineConfig::default())
}

/// Engine that has already begun `setup` with `config`.
pub fn started_with(grid: SharedGrid, setup: MatchSetup, config: EngineConfig) -> TurnEngine {
    let mut engine = TurnEngine::new(grid, config);
    engine.begin(setup).unwrap();
    engine
}

/// Engine whose dice replay `rolls`.
pub fn scripted(grid: SharedGrid, setup: MatchSetup, rolls: Vec<u32>) -> TurnEngine {
    let mut engine = TurnEngine::new(grid, EngineConfig::default())
        .with_random_source(Box::new(ScriptedRolls::new(rolls)));
    engine.begin(setup).unwrap();
    engine
}

/// Attaches a channel reporter and returns the receiving end.
pub fn with_channel_reporter(engine: TurnEngine) -> (TurnEngine, Receiver<OutcomeReport>) {
    let (tx, rx) = mpsc::channel();
    (engine.with_reporter(Box::new(ChannelReporter(tx))), rx)
}

/// Submits `intent` and returns the turn report, panicking if ignored.
pub fn resolve(engine: &mut TurnEngine, intent: Intent) -> TurnReport {
    match engine.submit_intent(intent) {
        Submission::Resolved(report) => report,
        Submission::Ignored(reason) => panic!("intent {intent:?} ignored: {reason:?}"),
    }
}

/// Current tile of the combatant at roster position `index` (player is 0).
pub fn position_of(engine: &TurnEngine, index: usize) -> TileCoord {
    engine.snapshot().combatants[index].position
}
