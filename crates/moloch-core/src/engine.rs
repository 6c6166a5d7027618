//! The turn engine: setup, input, resolution and termination.
//!
//! [`TurnEngine`] is a small state machine:
//!
//! ```text
//! AwaitingSetup ──begin──▶ AwaitingInput ──intent──▶ ResolvingTurn
//!       ▲                        ▲                        │
//!       │                        └────────────────────────┤
//!     reset                                               ▼
//!       └────────────────────────────────────────────  Terminal
//! ```
//!
//! # Turn Resolution
//!
//! One accepted intent resolves one full turn, synchronously:
//!
//! 1. **Player**: the player policy turns the intent into a move, attack or
//!    hold, and the action is applied.
//! 2. **Clock**: `turns_remaining` drops by one.
//! 3. **Enemies**: each living enemy in roster order plans against the
//!    current state and acts. Tiles of living enemies are reserved for the
//!    whole phase, and every tile an enemy steps onto is added, so no two
//!    enemies ever share a tile.
//! 4. **History**: one record per combatant, player first.
//! 5. **Termination**: victory, then defeat, then attrition. On entering
//!    `Terminal` the outcome reporter is called exactly once.
//!
//! Nothing in a turn is fatal. Intents that cannot be taken return
//! [`Submission::Ignored`] with the reason.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use moloch_core::config::EngineConfig;
//! use moloch_core::engine::{Submission, TurnEngine};
//! use moloch_core::input::Intent;
//! use moloch_core::setup::{CombatantSpawn, MatchSetup};
//! use moloch_grid::{Direction, GridMap, TileCoord};
//!
//! let grid = GridMap::open(8, 3).unwrap();
//! let mut engine = TurnEngine::new(Arc::new(grid), EngineConfig::default());
//!
//! engine
//!     .begin(MatchSetup {
//!         player: CombatantSpawn::new(TileCoord::new(0, 1), 10, 1, 0),
//!         enemies: vec![CombatantSpawn::new(TileCoord::new(7, 1), 2, 1, 0)],
//!         turns_budget: 20,
//!         seed: 7,
//!     })
//!     .unwrap();
//!
//! let Submission::Resolved(report) = engine.submit_intent(Intent::Move(Direction::Right)) else {
//!     panic!("intent should resolve");
//! };
//! assert_eq!(report.turns_remaining, 19);
//!
//! let snapshot = engine.snapshot();
//! assert_eq!(snapshot.combatants[0].position, TileCoord::new(1, 1));
//! assert_eq!(snapshot.combatants[1].position, TileCoord::new(6, 1));
//! ```

use std::fmt;
use std::sync::Arc;

use moloch_grid::{CollisionOracle, Pathfinder, Reservations, TileCoord};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::combatant::{CombatantId, Faction, MoveOutcome};
use crate::config::EngineConfig;
use crate::error::SetupError;
use crate::event::{EventLog, ResolutionEvent};
use crate::input::{Buttons, InputGate, Intent};
use crate::policy::{PlanContext, PlannedAction, PolicyTable};
use crate::random::{ChaChaDice, RandomSource};
use crate::setup::{MatchSetup, NullReporter, OutcomeReport, OutcomeReporter, SetupPoll, SetupSource};
use crate::state::{MatchState, MoveRecord, Outcome};

/// Shared, thread-safe collision oracle.
pub type SharedGrid = Arc<dyn CollisionOracle + Send + Sync>;

// =============================================================================
// Public result types
// =============================================================================

/// Engine state-machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnginePhase {
    /// No match yet; waiting for setup
    AwaitingSetup,
    /// Match running; waiting for the next intent
    AwaitingInput,
    /// A turn is being resolved
    ResolvingTurn,
    /// Match over; nothing changes any more
    Terminal,
}

/// Why an intent did not resolve a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// No match has been set up
    SetupPending,
    /// The match is over
    GameOver,
    /// The intent was [`Intent::None`] or no key was held
    NoIntent,
    /// The input gate dropped a repeat or too-early press
    Debounced,
    /// The player walked into a wall and blocked moves do not spend turns
    Blocked,
}

/// Everything that happened in one resolved turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// 1-based turn number
    pub turn: u32,
    /// The intent that drove the turn
    pub intent: Intent,
    /// Events in resolution order
    pub events: Vec<ResolutionEvent>,
    /// Turns left after this one
    pub turns_remaining: u32,
    /// Set if this turn ended the match
    pub outcome: Option<Outcome>,
}

/// Result of offering an intent to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// A turn was resolved
    Resolved(TurnReport),
    /// Nothing happened
    Ignored(IgnoreReason),
}

impl Submission {
    /// The report, if a turn resolved.
    #[must_use]
    pub fn report(&self) -> Option<&TurnReport> {
        match self {
            Self::Resolved(report) => Some(report),
            Self::Ignored(_) => None,
        }
    }

    /// Returns true if a turn resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Public view of one combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantView {
    /// Id
    pub id: CombatantId,
    /// Faction
    pub faction: Faction,
    /// Current tile
    pub position: TileCoord,
    /// Current health
    pub hp: i32,
    /// `hp > 0`
    pub alive: bool,
}

/// Read-only copy of the engine's visible state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Engine phase
    pub phase: EnginePhase,
    /// Turns left
    pub turns_remaining: u32,
    /// Match has ended
    pub game_over: bool,
    /// Match ended in victory
    pub victory: bool,
    /// Final outcome, once terminal
    pub outcome: Option<Outcome>,
    /// Player first, then enemies in roster order
    pub combatants: Vec<CombatantView>,
    /// Full move history
    pub move_history: Vec<MoveRecord>,
}

// =============================================================================
// TurnEngine
// =============================================================================

/// Owner of a match and the only thing that mutates it.
pub struct TurnEngine {
    grid: SharedGrid,
    pathfinder: Pathfinder,
    config: EngineConfig,
    policies: PolicyTable,
    rng: Box<dyn RandomSource>,
    reporter: Box<dyn OutcomeReporter>,
    gate: InputGate,
    phase: EnginePhase,
    setup: Option<MatchSetup>,
    state: Option<MatchState>,
    events: EventLog,
    intents: Vec<Intent>,
    reserved: Reservations,
}

impl fmt::Debug for TurnEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurnEngine")
            .field("pathfinder", &self.pathfinder)
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("pending_events", &self.events.len())
            .field("intents", &self.intents.len())
            .finish_non_exhaustive()
    }
}

impl TurnEngine {
    /// Creates an engine awaiting setup.
    ///
    /// Dice default to [`ChaChaDice`], reseeded from each match's setup.
    /// Outcome reports go nowhere until a reporter is attached.
    #[must_use]
    pub fn new(grid: SharedGrid, config: EngineConfig) -> Self {
        Self {
            grid,
            pathfinder: config.pathfinder(),
            config,
            policies: PolicyTable::default(),
            rng: Box::new(ChaChaDice::default()),
            reporter: Box::new(NullReporter),
            gate: InputGate::new(config.min_input_spacing_ms),
            phase: EnginePhase::AwaitingSetup,
            setup: None,
            state: None,
            events: EventLog::new(),
            intents: Vec::new(),
            reserved: Reservations::new(),
        }
    }

    /// Replaces the dice.
    #[must_use]
    pub fn with_random_source(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    /// Attaches an outcome reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Box<dyn OutcomeReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replaces the faction behaviour table.
    #[must_use]
    pub fn with_policies(mut self, policies: PolicyTable) -> Self {
        self.policies = policies;
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Collision oracle the engine plays on.
    #[must_use]
    pub fn grid(&self) -> &SharedGrid {
        &self.grid
    }

    /// Setup of the current match.
    #[must_use]
    pub fn setup(&self) -> Option<&MatchSetup> {
        self.setup.as_ref()
    }

    /// State of the current match.
    #[must_use]
    pub fn state(&self) -> Option<&MatchState> {
        self.state.as_ref()
    }

    /// Intents that resolved a turn, in order.
    #[must_use]
    pub fn accepted_intents(&self) -> &[Intent] {
        &self.intents
    }

    /// Drains pending resolution events.
    pub fn take_events(&mut self) -> Vec<ResolutionEvent> {
        self.events.take_events()
    }

    /// Builds a read-only snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let Some(state) = &self.state else {
            return Snapshot {
                phase: self.phase,
                turns_remaining: 0,
                game_over: false,
                victory: false,
                outcome: None,
                combatants: Vec::new(),
                move_history: Vec::new(),
            };
        };
        Snapshot {
            phase: self.phase,
            turns_remaining: state.turns_remaining(),
            game_over: state.is_game_over(),
            victory: state.is_victory(),
            outcome: state.outcome(),
            combatants: state
                .roster()
                .iter()
                .map(|c| CombatantView {
                    id: c.id(),
                    faction: c.faction(),
                    position: c.position(),
                    hp: c.hp(),
                    alive: c.is_alive(),
                })
                .collect(),
            move_history: state.move_history().to_vec(),
        }
    }

    // -------------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------------

    /// Polls `source` once and starts the match if setup is ready.
    ///
    /// Returns `Ok(false)` while the source is pending.
    ///
    /// # Errors
    ///
    /// [`SetupError::AlreadyStarted`] outside `AwaitingSetup`, or any
    /// validation error from [`TurnEngine::begin`]. The engine stays in
    /// `AwaitingSetup` on error.
    pub fn poll_setup(&mut self, source: &mut dyn SetupSource) -> Result<bool, SetupError> {
        if self.phase != EnginePhase::AwaitingSetup {
            return Err(SetupError::AlreadyStarted);
        }
        match source.poll_setup() {
            SetupPoll::Pending => Ok(false),
            SetupPoll::Ready(setup) => self.begin(setup).map(|()| true),
        }
    }

    /// Validates `setup` and starts the match.
    ///
    /// Seeds the dice, spawns the roster and writes the spawn records to the
    /// move history.
    ///
    /// # Errors
    ///
    /// [`SetupError::AlreadyStarted`] outside `AwaitingSetup`, otherwise any
    /// error from [`MatchSetup::validate`].
    pub fn begin(&mut self, setup: MatchSetup) -> Result<(), SetupError> {
        if self.phase != EnginePhase::AwaitingSetup {
            return Err(SetupError::AlreadyStarted);
        }
        let default_sides = self.config.default_dice_sides;
        if let Err(err) = setup.validate(self.grid.as_ref(), default_sides) {
            warn!(%err, "match setup rejected");
            return Err(err);
        }

        self.rng.set_seed(setup.seed);
        self.state = Some(MatchState::new(setup.roster(default_sides), setup.turns_budget));
        self.events.clear();
        self.intents.clear();
        self.reserved.clear();
        self.gate.reset();
        self.phase = EnginePhase::AwaitingInput;
        info!(
            enemies = setup.enemies.len(),
            turns = setup.turns_budget,
            seed = setup.seed,
            "match started"
        );
        self.setup = Some(setup);
        Ok(())
    }

    /// Drops the current match and waits for a new setup.
    pub fn reset(&mut self) {
        self.state = None;
        self.setup = None;
        self.events.clear();
        self.intents.clear();
        self.reserved.clear();
        self.gate.reset();
        self.phase = EnginePhase::AwaitingSetup;
        info!("engine reset");
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Feeds raw key state through the input gate and resolves a turn on a
    /// fresh press.
    pub fn poll_input(&mut self, now_ms: u64, held: Buttons) -> Submission {
        match self.gate.poll(now_ms, held) {
            Some(intent) => self.submit_intent(intent),
            None if held.is_empty() => Submission::Ignored(IgnoreReason::NoIntent),
            None => Submission::Ignored(IgnoreReason::Debounced),
        }
    }

    /// Resolves one turn driven by `intent`.
    pub fn submit_intent(&mut self, intent: Intent) -> Submission {
        match self.phase {
            EnginePhase::AwaitingSetup => return Submission::Ignored(IgnoreReason::SetupPending),
            EnginePhase::Terminal => return Submission::Ignored(IgnoreReason::GameOver),
            EnginePhase::AwaitingInput | EnginePhase::ResolvingTurn => {}
        }
        if intent.is_none() {
            return Submission::Ignored(IgnoreReason::NoIntent);
        }
        self.resolve_turn(intent)
    }

    fn resolve_turn(&mut self, intent: Intent) -> Submission {
        let Some(state) = self.state.as_mut() else {
            return Submission::Ignored(IgnoreReason::SetupPending);
        };
        self.phase = EnginePhase::ResolvingTurn;

        let mut resolution = Resolution {
            grid: self.grid.as_ref(),
            pathfinder: &self.pathfinder,
            policies: &self.policies,
            rng: self.rng.as_mut(),
            reserved: &mut self.reserved,
            state,
            events: Vec::new(),
            attacked: Vec::new(),
        };

        if !resolution.player_phase(intent, self.config.blocked_move_consumes_turn) {
            self.phase = EnginePhase::AwaitingInput;
            debug!(?intent, "blocked move rejected without spending a turn");
            return Submission::Ignored(IgnoreReason::Blocked);
        }
        resolution.state.decrement_turns();
        resolution.enemy_phase();
        resolution.reserved.clear();

        let Resolution {
            state,
            events,
            attacked,
            ..
        } = resolution;
        state.record_turn(&attacked);
        self.intents.push(intent);
        self.events.extend(events.iter().copied());

        let outcome = state.evaluate_termination();
        let report = TurnReport {
            turn: state.turns_used(),
            intent,
            events,
            turns_remaining: state.turns_remaining(),
            outcome,
        };
        debug!(turn = report.turn, remaining = report.turns_remaining, "turn resolved");

        match outcome {
            Some(outcome) => {
                state.finish(outcome);
                self.phase = EnginePhase::Terminal;
                info!(?outcome, turns_used = state.turns_used(), "match over");
                let final_report = OutcomeReport {
                    outcome,
                    victory: outcome.is_victory(),
                    attrition: outcome == Outcome::Attrition,
                    turns_used: state.turns_used(),
                    move_history: state.move_history().to_vec(),
                };
                if let Err(err) = self.reporter.report_outcome(&final_report) {
                    warn!(%err, "outcome report failed");
                }
            }
            None => self.phase = EnginePhase::AwaitingInput,
        }
        Submission::Resolved(report)
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Disjoint borrows of the engine for the duration of one turn.
struct Resolution<'a> {
    grid: &'a dyn CollisionOracle,
    pathfinder: &'a Pathfinder,
    policies: &'a PolicyTable,
    rng: &'a mut dyn RandomSource,
    reserved: &'a mut Reservations,
    state: &'a mut MatchState,
    events: Vec<ResolutionEvent>,
    attacked: Vec<CombatantId>,
}

impl Resolution<'_> {
    /// Applies the player's action. Returns false if the turn must be
    /// abandoned because a blocked move does not spend it.
    fn player_phase(&mut self, intent: Intent, blocked_consumes_turn: bool) -> bool {
        let action = {
            let roster = self.state.roster();
            let ctx = PlanContext {
                roster,
                grid: self.grid,
                pathfinder: self.pathfinder,
                reserved: &*self.reserved,
                intent: Some(intent),
            };
            self.policies
                .for_faction(Faction::Player)
                .plan(&roster.player, &ctx)
        };

        if let PlannedAction::Move(target) = action {
            if !blocked_consumes_turn && self.grid.collides(target) {
                return false;
            }
        }
        self.apply(CombatantId::PLAYER, action);
        true
    }

    fn enemy_phase(&mut self) {
        self.reserved.clear();
        self.reserved.extend(
            self.state
                .roster()
                .living_enemies()
                .map(|enemy| enemy.position()),
        );

        for index in 0..self.state.enemies().len() {
            let action = {
                let roster = self.state.roster();
                let actor = &roster.enemies[index];
                if actor.is_dead() {
                    continue;
                }
                let ctx = PlanContext {
                    roster,
                    grid: self.grid,
                    pathfinder: self.pathfinder,
                    reserved: &*self.reserved,
                    intent: None,
                };
                self.policies.for_faction(actor.faction()).plan(actor, &ctx)
            };
            self.apply(CombatantId::enemy(index), action);
        }
    }

    fn apply(&mut self, id: CombatantId, action: PlannedAction) {
        match action {
            PlannedAction::Move(target) => self.step(id, target),
            PlannedAction::Attack(target) => {
                if !self.strike(id, target) {
                    self.hold(id);
                }
            }
            PlannedAction::Hold => self.hold(id),
            PlannedAction::Stuck => {
                debug!(%id, "no path");
                self.events.push(ResolutionEvent::NoPath { id });
            }
        }
    }

    fn step(&mut self, id: CombatantId, target: TileCoord) {
        let grid = self.grid;
        let Some(mover) = self.state.roster_mut().get_mut(id) else {
            return;
        };
        match mover.move_to(target, grid) {
            MoveOutcome::Moved { from, to } => {
                debug!(%id, %from, %to, "moved");
                if !id.is_player() {
                    self.reserved.reserve(to);
                }
                self.events.push(ResolutionEvent::Moved { id, from, to });
            }
            MoveOutcome::Blocked { at } => {
                debug!(%id, %at, "blocked");
                self.events.push(ResolutionEvent::Blocked { id, at });
            }
            MoveOutcome::Inert => {}
        }
    }

    fn hold(&mut self, id: CombatantId) {
        if let Some(holder) = self.state.roster().get(id) {
            let at = holder.position();
            self.events.push(ResolutionEvent::Held { id, at });
        }
    }

    /// Returns true if an attack landed.
    fn strike(&mut self, attacker: CombatantId, target: CombatantId) -> bool {
        let Some((striker, defender)) = self.state.roster_mut().pair_mut(attacker, target) else {
            return false;
        };
        if striker.faction() == defender.faction() {
            return false;
        }
        let Some(outcome) = striker.attack(defender, &mut *self.rng) else {
            return false;
        };
        let corpse_tile = defender.position();

        debug!(
            %attacker,
            %target,
            dealt = outcome.taken.dealt,
            received = outcome.taken.received,
            "attacked"
        );
        self.attacked.push(attacker);
        self.events.push(ResolutionEvent::Attacked {
            attacker,
            target,
            dealt: outcome.taken.dealt,
            received: outcome.taken.received,
        });
        if outcome.roll.is_critical() {
            self.events.push(ResolutionEvent::CriticalRoll {
                attacker,
                natural_maxes: outcome.roll.natural_maxes,
            });
        }
        if outcome.taken.killed {
            debug!(%target, at = %corpse_tile, "died");
            self.events.push(ResolutionEvent::Died {
                id: target,
                at: corpse_tile,
            });
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRolls;
    use crate::setup::CombatantSpawn;
    use moloch_grid::{Direction, GridMap};

    fn engine(grid: GridMap) -> TurnEngine {
        TurnEngine::new(Arc::new(grid), EngineConfig::default())
    }

    fn duel(turns: u32) -> MatchSetup {
        MatchSetup {
            player: CombatantSpawn::new(TileCoord::new(0, 0), 10, 2, 1),
            enemies: vec![CombatantSpawn::new(TileCoord::new(3, 0), 1, 1, 0)],
            turns_budget: turns,
            seed: 3,
        }
    }

    mod phase_tests {
        use super::*;

        #[test]
        fn intents_before_setup_are_ignored() {
            let mut e = engine(GridMap::open(4, 1).unwrap());
            assert_eq!(
                e.submit_intent(Intent::Move(Direction::Right)),
                Submission::Ignored(IgnoreReason::SetupPending)
            );
            assert_eq!(e.phase(), EnginePhase::AwaitingSetup);
        }

        #[test]
        fn none_intent_is_ignored() {
            let mut e = engine(GridMap::open(4, 1).unwrap());
            e.begin(duel(5)).unwrap();
            assert_eq!(
                e.submit_intent(Intent::None),
                Submission::Ignored(IgnoreReason::NoIntent)
            );
            assert_eq!(e.state().unwrap().turns_remaining(), 5);
        }

        #[test]
        fn begin_twice_is_rejected() {
            let mut e = engine(GridMap::open(4, 1).unwrap());
            e.begin(duel(5)).unwrap();
            assert_eq!(e.begin(duel(5)), Err(SetupError::AlreadyStarted));
        }

        #[test]
        fn invalid_setup_keeps_awaiting() {
            let mut e = engine(GridMap::open(4, 1).unwrap());
            assert_eq!(e.begin(duel(0)), Err(SetupError::ZeroTurnBudget));
            assert_eq!(e.phase(), EnginePhase::AwaitingSetup);
            assert!(e.state().is_none());
        }

        #[test]
        fn reset_returns_to_setup() {
            let mut e = engine(GridMap::open(4, 1).unwrap());
            e.begin(duel(5)).unwrap();
            e.submit_intent(Intent::Attack);
            e.reset();
            assert_eq!(e.phase(), EnginePhase::AwaitingSetup);
            assert!(e.accepted_intents().is_empty());
            assert!(e.take_events().is_empty());
            assert!(e.snapshot().combatants.is_empty());
            e.begin(duel(5)).unwrap();
            assert_eq!(e.state().unwrap().turns_remaining(), 5);
        }
    }

    mod resolution_tests {
        use super::*;

        #[test]
        fn enemy_closes_distance_after_player_moves() {
            let mut e = engine(GridMap::open(6, 1).unwrap());
            e.begin(MatchSetup {
                enemies: vec![CombatantSpawn::new(TileCoord::new(5, 0), 1, 1, 0)],
                ..duel(5)
            })
            .unwrap();
            e.submit_intent(Intent::Move(Direction::Right));
            let snap = e.snapshot();
            assert_eq!(snap.combatants[0].position, TileCoord::new(1, 0));
            assert_eq!(snap.combatants[1].position, TileCoord::new(4, 0));
        }

        #[test]
        fn player_bump_attack_kills_weak_enemy() {
            let mut e = engine(GridMap::open(4, 1).unwrap())
                .with_random_source(Box::new(ScriptedRolls::new(vec![6, 6])));
            e.begin(MatchSetup {
                enemies: vec![CombatantSpawn::new(TileCoord::new(1, 0), 1, 1, 0)],
                ..duel(5)
            })
            .unwrap();
            let report = e
                .submit_intent(Intent::Move(Direction::Right))
                .report()
                .cloned()
                .unwrap();
            assert_eq!(report.outcome, Some(Outcome::Victory));
            assert!(report.events.contains(&ResolutionEvent::Attacked {
                attacker: CombatantId::PLAYER,
                target: CombatantId::enemy(0),
                dealt: 7,
                received: 7,
            }));
            assert!(report.events.contains(&ResolutionEvent::Died {
                id: CombatantId::enemy(0),
                at: TileCoord::new(1, 0),
            }));
            assert_eq!(e.snapshot().combatants[1].hp, -6);
        }

        #[test]
        fn events_are_drained_once() {
            let mut e = engine(GridMap::open(6, 1).unwrap());
            e.begin(duel(5)).unwrap();
            e.submit_intent(Intent::Attack);
            assert!(!e.take_events().is_empty());
            assert!(e.take_events().is_empty());
        }

        #[test]
        fn terminal_ignores_further_intents() {
            let mut e = engine(GridMap::open(6, 1).unwrap());
            e.begin(duel(1)).unwrap();
            assert!(e.submit_intent(Intent::Attack).is_resolved());
            assert_eq!(e.phase(), EnginePhase::Terminal);
            assert_eq!(
                e.submit_intent(Intent::Attack),
                Submission::Ignored(IgnoreReason::GameOver)
            );
        }
    }

    mod input_tests {
        use super::*;

        #[test]
        fn held_key_resolves_once() {
            let mut e = engine(GridMap::open(6, 1).unwrap());
            e.begin(duel(10)).unwrap();
            assert!(e.poll_input(100, Buttons::ATTACK).is_resolved());
            assert_eq!(
                e.poll_input(500, Buttons::ATTACK),
                Submission::Ignored(IgnoreReason::Debounced)
            );
            assert_eq!(
                e.poll_input(510, Buttons::empty()),
                Submission::Ignored(IgnoreReason::NoIntent)
            );
            assert!(e.poll_input(520, Buttons::ATTACK).is_resolved());
            assert_eq!(e.accepted_intents().len(), 2);
        }
    }
}
