//! Faction behaviour table.
//!
//! Combatants are plain data. What each one tries to do on its turn is
//! decided by a [`TurnPolicy`] looked up by [`Faction`] in a [`PolicyTable`].
//!
//! Policies only *plan*. They read the roster, the map and the current
//! reservations and return a [`PlannedAction`]; the engine applies it. This
//! keeps planning free of side effects and lets tests check a plan without
//! resolving a turn.
//!
//! # Default Policies
//!
//! | faction | policy          | behaviour |
//! |---------|-----------------|-----------|
//! | Player  | [`PlayerPolicy`] | follow the submitted intent; bump-attack enemies |
//! | Enemy   | [`EnemyPolicy`]  | path toward the player; attack when the next step is the player |

use std::fmt;

use moloch_grid::{CollisionOracle, Pathfinder, Reservations, TileCoord};

use crate::combatant::{Combatant, CombatantId, Faction};
use crate::input::Intent;
use crate::state::Roster;

/// What a combatant intends to do this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedAction {
    /// Step onto this tile
    Move(TileCoord),
    /// Strike this combatant
    Attack(CombatantId),
    /// Stay put on purpose
    Hold,
    /// Wanted to act but found no way
    Stuck,
}

/// Read-only inputs for planning one combatant's action.
#[derive(Clone, Copy)]
pub struct PlanContext<'a> {
    /// Every combatant as of this point in the turn
    pub roster: &'a Roster,
    /// Collision oracle
    pub grid: &'a dyn CollisionOracle,
    /// Route search
    pub pathfinder: &'a Pathfinder,
    /// Tiles held by other movers this phase
    pub reserved: &'a Reservations,
    /// The player's intent for this turn, if any
    pub intent: Option<Intent>,
}

impl fmt::Debug for PlanContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanContext")
            .field("roster", self.roster)
            .field("pathfinder", self.pathfinder)
            .field("reserved", self.reserved)
            .field("intent", &self.intent)
            .finish_non_exhaustive()
    }
}

/// Decides a combatant's action.
pub trait TurnPolicy: Send + Sync {
    /// Plans `actor`'s action. Must not assume `actor` is alive.
    fn plan(&self, actor: &Combatant, ctx: &PlanContext<'_>) -> PlannedAction;
}

/// Turns the player's intent into an action.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerPolicy;

impl TurnPolicy for PlayerPolicy {
    fn plan(&self, actor: &Combatant, ctx: &PlanContext<'_>) -> PlannedAction {
        match ctx.intent {
            Some(Intent::Move(direction)) => {
                let target = actor.position().step(direction);
                match ctx.roster.living_enemy_at(target) {
                    Some(enemy) => PlannedAction::Attack(enemy.id()),
                    None => PlannedAction::Move(target),
                }
            }
            Some(Intent::Attack) => ctx
                .roster
                .living_enemies()
                .find(|enemy| enemy.position().is_adjacent(actor.position()))
                .map_or(PlannedAction::Hold, |enemy| PlannedAction::Attack(enemy.id())),
            Some(Intent::None) | None => PlannedAction::Hold,
        }
    }
}

/// Chases the player one step at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnemyPolicy;

impl TurnPolicy for EnemyPolicy {
    fn plan(&self, actor: &Combatant, ctx: &PlanContext<'_>) -> PlannedAction {
        let goal = ctx.roster.player.position();
        match ctx
            .pathfinder
            .next_step(ctx.grid, actor.position(), goal, ctx.reserved)
        {
            Some(step) if step == goal => PlannedAction::Attack(CombatantId::PLAYER),
            Some(step) => PlannedAction::Move(step),
            None => PlannedAction::Stuck,
        }
    }
}

/// Policy per faction.
pub struct PolicyTable {
    player: Box<dyn TurnPolicy>,
    enemy: Box<dyn TurnPolicy>,
}

impl PolicyTable {
    /// Creates a table from explicit policies.
    #[must_use]
    pub fn new(player: Box<dyn TurnPolicy>, enemy: Box<dyn TurnPolicy>) -> Self {
        Self { player, enemy }
    }

    /// Policy for `faction`.
    #[must_use]
    pub fn for_faction(&self, faction: Faction) -> &dyn TurnPolicy {
        match faction {
            Faction::Player => self.player.as_ref(),
            Faction::Enemy => self.enemy.as_ref(),
        }
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::new(Box::new(PlayerPolicy), Box::new(EnemyPolicy))
    }
}

impl fmt::Debug for PolicyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyTable").finish_non_exhaustive()
    }
}
