//! Match setup and the two asynchronous edges of a match.
//!
//! A match needs stats, a turn budget and a seed before the first turn, and
//! it produces one outcome report after the last. Both may come from slow
//! external systems (a chain query, a server), so the engine only ever
//! *polls* for setup and *fires* reports without waiting:
//!
//! - [`SetupSource`] answers `Pending` until a [`MatchSetup`] is available
//! - [`OutcomeReporter`] receives exactly one [`OutcomeReport`] per match
//!
//! [`MatchSetup::offline`] gives the fixed defaults used when no external
//! source is configured.

use std::collections::BTreeMap;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};

use moloch_grid::{CollisionOracle, TileCoord};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::combatant::{Combatant, CombatantId, CombatantStats, Faction};
use crate::error::{ReportError, SetupError};
use crate::state::{MoveRecord, Outcome, Roster};

/// Turn budget of an offline match.
pub const OFFLINE_TURNS: u32 = 50;

/// Player spawn tile of an offline match.
pub const OFFLINE_PLAYER_SPAWN: TileCoord = TileCoord::new(2, 5);

/// Enemy spawn tiles of an offline match.
pub const OFFLINE_ENEMY_SPAWNS: [TileCoord; 3] = [
    TileCoord::new(7, 4),
    TileCoord::new(15, 1),
    TileCoord::new(20, 10),
];

/// Where a combatant starts and what it fights with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantSpawn {
    /// Spawn tile
    pub position: TileCoord,
    /// Starting health
    pub hp: i32,
    /// Number of damage dice
    pub ap: u32,
    /// Flat damage reduction
    pub dp: u32,
    /// Faces per damage die; falls back to the engine default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dice_sides: Option<u32>,
}

impl CombatantSpawn {
    /// Creates a spawn using the engine's default die.
    #[must_use]
    pub const fn new(position: TileCoord, hp: i32, ap: u32, dp: u32) -> Self {
        Self {
            position,
            hp,
            ap,
            dp,
            dice_sides: None,
        }
    }

    /// Sets an explicit die size.
    #[must_use]
    pub const fn with_dice_sides(mut self, sides: u32) -> Self {
        self.dice_sides = Some(sides);
        self
    }

    /// Resolves the stats, filling in `default_sides` when no die was named.
    #[must_use]
    pub fn stats(&self, default_sides: u32) -> CombatantStats {
        CombatantStats::new(self.hp, self.ap, self.dp)
            .with_dice_sides(self.dice_sides.unwrap_or(default_sides))
    }
}

/// Everything needed to start a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    /// The player
    pub player: CombatantSpawn,
    /// Enemies in resolution order
    pub enemies: Vec<CombatantSpawn>,
    /// Turns before attrition
    pub turns_budget: u32,
    /// Seed for the match's dice
    pub seed: u64,
}

impl MatchSetup {
    /// Fixed defaults for a match with no external setup source.
    ///
    /// # Example
    ///
    /// ```
    /// use moloch_core::setup::MatchSetup;
    ///
    /// let setup = MatchSetup::offline();
    /// assert_eq!(setup.enemies.len(), 3);
    /// assert_eq!(setup.turns_budget, 50);
    /// assert_eq!(setup.seed, 50);
    /// assert_eq!(setup.player.hp, 3);
    /// ```
    #[must_use]
    pub fn offline() -> Self {
        Self {
            player: CombatantSpawn::new(OFFLINE_PLAYER_SPAWN, 3, 1, 0),
            enemies: OFFLINE_ENEMY_SPAWNS
                .iter()
                .map(|&tile| CombatantSpawn::new(tile, 2, 1, 0))
                .collect(),
            turns_budget: OFFLINE_TURNS,
            seed: u64::from(OFFLINE_TURNS),
        }
    }

    /// Spawns in roster order with their ids.
    pub fn spawns(&self) -> impl Iterator<Item = (CombatantId, &CombatantSpawn)> {
        std::iter::once((CombatantId::PLAYER, &self.player)).chain(
            self.enemies
                .iter()
                .enumerate()
                .map(|(index, spawn)| (CombatantId::enemy(index), spawn)),
        )
    }

    /// Checks the setup against a map.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, checking in this order: turn budget,
    /// enemy count, then each combatant in roster order for dice, spawn
    /// collision and a shared spawn tile.
    pub fn validate<O>(&self, grid: &O, default_sides: u32) -> Result<(), SetupError>
    where
        O: CollisionOracle + ?Sized,
    {
        if self.turns_budget == 0 {
            return Err(SetupError::ZeroTurnBudget);
        }
        if self.enemies.is_empty() {
            return Err(SetupError::NoEnemies);
        }

        let mut occupied: BTreeMap<TileCoord, CombatantId> = BTreeMap::new();
        for (id, spawn) in self.spawns() {
            if spawn.stats(default_sides).dice_sides == 0 {
                return Err(SetupError::ZeroDiceSides { combatant: id });
            }
            if grid.collides(spawn.position) {
                return Err(SetupError::SpawnBlocked {
                    combatant: id,
                    at: spawn.position,
                });
            }
            if let Some(&first) = occupied.get(&spawn.position) {
                return Err(SetupError::SharedSpawn {
                    first,
                    second: id,
                    at: spawn.position,
                });
            }
            occupied.insert(spawn.position, id);
        }
        Ok(())
    }

    /// Builds the starting roster.
    #[must_use]
    pub fn roster(&self, default_sides: u32) -> Roster {
        let player = Combatant::spawn(
            CombatantId::PLAYER,
            Faction::Player,
            self.player.position,
            self.player.stats(default_sides),
        );
        let enemies = self
            .enemies
            .iter()
            .enumerate()
            .map(|(index, spawn)| {
                Combatant::spawn(
                    CombatantId::enemy(index),
                    Faction::Enemy,
                    spawn.position,
                    spawn.stats(default_sides),
                )
            })
            .collect();
        Roster::new(player, enemies)
    }
}

/// Answer from a [`SetupSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupPoll {
    /// Not available yet; poll again later
    Pending,
    /// Setup is ready
    Ready(MatchSetup),
}

/// Provider of match setup.
pub trait SetupSource {
    /// Returns the setup if it is available now. Must not block.
    fn poll_setup(&mut self) -> SetupPoll;
}

impl SetupSource for MatchSetup {
    fn poll_setup(&mut self) -> SetupPoll {
        SetupPoll::Ready(self.clone())
    }
}

impl<F> SetupSource for F
where
    F: FnMut() -> SetupPoll,
{
    fn poll_setup(&mut self) -> SetupPoll {
        self()
    }
}

/// Setup delivered over a channel, typically by another thread.
#[derive(Debug)]
pub struct ChannelSetup(pub Receiver<MatchSetup>);

impl SetupSource for ChannelSetup {
    fn poll_setup(&mut self) -> SetupPoll {
        match self.0.try_recv() {
            Ok(setup) => SetupPoll::Ready(setup),
            Err(TryRecvError::Empty) => SetupPoll::Pending,
            Err(TryRecvError::Disconnected) => {
                warn!("setup sender disconnected; match cannot start");
                SetupPoll::Pending
            }
        }
    }
}

/// Final result of a match, handed to the reporter once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeReport {
    /// How the match ended
    pub outcome: Outcome,
    /// All enemies died
    pub victory: bool,
    /// The turn budget ran out
    pub attrition: bool,
    /// Turns resolved
    pub turns_used: u32,
    /// Full move history, spawn records included
    pub move_history: Vec<MoveRecord>,
}

/// Receiver of the final outcome.
///
/// Failures are opaque to the engine. It logs them and moves on.
pub trait OutcomeReporter {
    /// Delivers the report.
    ///
    /// # Errors
    ///
    /// Any [`ReportError`]; the engine never retries.
    fn report_outcome(&mut self, report: &OutcomeReport) -> Result<(), ReportError>;
}

/// Reporter that discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl OutcomeReporter for NullReporter {
    fn report_outcome(&mut self, _report: &OutcomeReport) -> Result<(), ReportError> {
        Ok(())
    }
}

/// Reporter that forwards reports over a channel.
#[derive(Debug, Clone)]
pub struct ChannelReporter(pub Sender<OutcomeReport>);

impl OutcomeReporter for ChannelReporter {
    fn report_outcome(&mut self, report: &OutcomeReport) -> Result<(), ReportError> {
        self.0
            .send(report.clone())
            .map_err(|_| ReportError::Disconnected)
    }
}

impl<F> OutcomeReporter for F
where
    F: FnMut(&OutcomeReport) -> Result<(), ReportError>,
{
    fn report_outcome(&mut self, report: &OutcomeReport) -> Result<(), ReportError> {
        self(report)
    }
}
