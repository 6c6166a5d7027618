//! Match state: roster, turn counter, move history and terminal flags.
//!
//! [`MatchState`] is owned by the [`TurnEngine`](crate::engine::TurnEngine).
//! Outside the crate it is read-only; every mutation goes through the turn
//! resolution path so the invariants below always hold:
//!
//! - `turns_remaining` never increases and never underflows
//! - `move_history` is append-only and grows by one record per combatant per
//!   resolved turn, player first then roster order
//! - once `game_over` is set, neither it nor `victory` changes again

use moloch_grid::TileCoord;
use serde::{Deserialize, Serialize};

use crate::combatant::{Combatant, CombatantId};

/// One entry of the move history.
///
/// # Example
///
/// ```
/// use moloch_core::state::MoveRecord;
/// use moloch_grid::TileCoord;
///
/// let record = MoveRecord::at(TileCoord::new(3, 4), true);
/// assert_eq!(record.tile(), TileCoord::new(3, 4));
/// assert!(record.attacked);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Tile column after the turn
    pub x: i32,
    /// Tile row after the turn
    pub y: i32,
    /// The combatant landed an attack this turn
    pub attacked: bool,
}

impl MoveRecord {
    /// Creates a record for `tile`.
    #[must_use]
    pub const fn at(tile: TileCoord, attacked: bool) -> Self {
        Self {
            x: tile.x,
            y: tile.y,
            attacked,
        }
    }

    /// Tile of this record.
    #[must_use]
    pub const fn tile(self) -> TileCoord {
        TileCoord::new(self.x, self.y)
    }
}

/// How a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every enemy is dead
    Victory,
    /// The player died
    Defeat,
    /// The turn budget ran out
    Attrition,
}

impl Outcome {
    /// Returns true only for [`Outcome::Victory`].
    #[must_use]
    pub const fn is_victory(self) -> bool {
        matches!(self, Self::Victory)
    }
}

/// Where a combatant lives inside a [`Roster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// The player
    Player,
    /// Enemy at this roster index
    Enemy(usize),
}

/// The player and the ordered list of enemies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    /// The player's combatant
    pub player: Combatant,
    /// Enemies in resolution order
    pub enemies: Vec<Combatant>,
}

impl Roster {
    /// Creates a roster.
    #[must_use]
    pub fn new(player: Combatant, enemies: Vec<Combatant>) -> Self {
        Self { player, enemies }
    }

    /// Locates `id`, or `None` for an id not in this roster.
    #[must_use]
    pub fn slot(&self, id: CombatantId) -> Option<Slot> {
        match id.enemy_index() {
            None => Some(Slot::Player),
            Some(index) if index < self.enemies.len() => Some(Slot::Enemy(index)),
            Some(_) => None,
        }
    }

    /// Looks up a combatant by id.
    #[must_use]
    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        match self.slot(id)? {
            Slot::Player => Some(&self.player),
            Slot::Enemy(index) => self.enemies.get(index),
        }
    }

    /// Looks up a combatant by id, mutably.
    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        match self.slot(id)? {
            Slot::Player => Some(&mut self.player),
            Slot::Enemy(index) => self.enemies.get_mut(index),
        }
    }

    /// Borrows two distinct combatants mutably at once.
    ///
    /// Returns `None` if `a == b` or either id is unknown.
    pub fn pair_mut(&mut self, a: CombatantId, b: CombatantId) -> Option<(&mut Combatant, &mut Combatant)> {
        match (self.slot(a)?, self.slot(b)?) {
            (Slot::Player, Slot::Enemy(j)) => Some((&mut self.player, &mut self.enemies[j])),
            (Slot::Enemy(i), Slot::Player) => Some((&mut self.enemies[i], &mut self.player)),
            (Slot::Enemy(i), Slot::Enemy(j)) if i < j => {
                let (head, tail) = self.enemies.split_at_mut(j);
                Some((&mut head[i], &mut tail[0]))
            }
            (Slot::Enemy(i), Slot::Enemy(j)) if i > j => {
                let (head, tail) = self.enemies.split_at_mut(i);
                Some((&mut tail[0], &mut head[j]))
            }
            _ => None,
        }
    }

    /// The first living enemy standing on `tile`, in roster order.
    #[must_use]
    pub fn living_enemy_at(&self, tile: TileCoord) -> Option<&Combatant> {
        self.enemies
            .iter()
            .find(|enemy| enemy.is_alive() && enemy.position() == tile)
    }

    /// Player first, then enemies in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        std::iter::once(&self.player).chain(self.enemies.iter())
    }

    /// Living enemies in roster order.
    pub fn living_enemies(&self) -> impl Iterator<Item = &Combatant> {
        self.enemies.iter().filter(|enemy| enemy.is_alive())
    }

    /// Returns true when no enemy is alive.
    #[must_use]
    pub fn all_enemies_dead(&self) -> bool {
        self.enemies.iter().all(Combatant::is_dead)
    }

    /// Number of combatants, player included.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.enemies.len()
    }

    /// Always false: a roster has a player.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Aggregate state of one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    roster: Roster,
    turns_budget: u32,
    turns_remaining: u32,
    move_history: Vec<MoveRecord>,
    game_over: bool,
    victory: bool,
    outcome: Option<Outcome>,
}

impl MatchState {
    /// Starts a match and records every spawn tile as the first history
    /// entries.
    #[must_use]
    pub fn new(roster: Roster, turns_budget: u32) -> Self {
        let move_history = roster
            .iter()
            .map(|c| MoveRecord::at(c.position(), false))
            .collect();
        Self {
            roster,
            turns_budget,
            turns_remaining: turns_budget,
            move_history,
            game_over: false,
            victory: false,
            outcome: None,
        }
    }

    /// All combatants.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> &Combatant {
        &self.roster.player
    }

    /// Enemies in roster order.
    #[must_use]
    pub fn enemies(&self) -> &[Combatant] {
        &self.roster.enemies
    }

    /// Turn budget the match started with.
    #[must_use]
    pub fn turns_budget(&self) -> u32 {
        self.turns_budget
    }

    /// Turns left before attrition.
    #[must_use]
    pub fn turns_remaining(&self) -> u32 {
        self.turns_remaining
    }

    /// Turns resolved so far.
    #[must_use]
    pub fn turns_used(&self) -> u32 {
        self.turns_budget - self.turns_remaining
    }

    /// Full move history, spawn records included.
    #[must_use]
    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    /// Returns true once the match has ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Returns true if the match ended in victory.
    #[must_use]
    pub fn is_victory(&self) -> bool {
        self.victory
    }

    /// Final outcome, once terminal.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub(crate) fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub(crate) fn decrement_turns(&mut self) {
        self.turns_remaining = self.turns_remaining.saturating_sub(1);
    }

    /// Appends one record per combatant in roster order.
    pub(crate) fn record_turn(&mut self, attacked: &[CombatantId]) {
        let records: Vec<MoveRecord> = self
            .roster
            .iter()
            .map(|c| MoveRecord::at(c.position(), attacked.contains(&c.id())))
            .collect();
        self.move_history.extend(records);
    }

    /// Checks the end conditions in priority order: victory, defeat, attrition.
    #[must_use]
    pub fn evaluate_termination(&self) -> Option<Outcome> {
        if self.roster.all_enemies_dead() {
            Some(Outcome::Victory)
        } else if self.roster.player.is_dead() {
            Some(Outcome::Defeat)
        } else if self.turns_remaining == 0 {
            Some(Outcome::Attrition)
        } else {
            None
        }
    }

    /// Marks the match terminal. Returns false if it already was.
    pub(crate) fn finish(&mut self, outcome: Outcome) -> bool {
        if self.game_over {
            return false;
        }
        self.game_over = true;
        self.victory = outcome.is_victory();
        self.outcome = Some(outcome);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{CombatantStats, Faction};

    fn roster(enemy_hp: &[i32]) -> Roster {
        let player = Combatant::spawn(
            CombatantId::PLAYER,
            Faction::Player,
            TileCoord::new(0, 0),
            CombatantStats::new(3, 1, 0),
        );
        let enemies = enemy_hp
            .iter()
            .enumerate()
            .map(|(i, &hp)| {
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let x = i as i32 + 1;
                Combatant::spawn(
                    CombatantId::enemy(i),
                    Faction::Enemy,
                    TileCoord::new(x, 0),
                    CombatantStats::new(hp, 1, 0),
                )
            })
            .collect();
        Roster::new(player, enemies)
    }

    mod roster_tests {
        use super::*;

        #[test]
        fn slots_resolve_ids() {
            let r = roster(&[2, 2]);
            assert_eq!(r.slot(CombatantId::PLAYER), Some(Slot::Player));
            assert_eq!(r.slot(CombatantId::enemy(1)), Some(Slot::Enemy(1)));
            assert_eq!(r.slot(CombatantId::enemy(2)), None);
        }

        #[test]
        fn pair_mut_rejects_same_id() {
            let mut r = roster(&[2]);
            assert!(r.pair_mut(CombatantId::PLAYER, CombatantId::PLAYER).is_none());
        }

        #[test]
        fn pair_mut_orders_enemies() {
            let mut r = roster(&[2, 2, 2]);
            let (a, b) = r.pair_mut(CombatantId::enemy(2), CombatantId::enemy(0)).unwrap();
            assert_eq!(a.id(), CombatantId::enemy(2));
            assert_eq!(b.id(), CombatantId::enemy(0));
        }

        #[test]
        fn corpses_are_not_found_on_tiles() {
            let r = roster(&[0, 2]);
            assert!(r.living_enemy_at(TileCoord::new(1, 0)).is_none());
            assert!(r.living_enemy_at(TileCoord::new(2, 0)).is_some());
        }

        #[test]
        fn iter_puts_player_first() {
            let r = roster(&[2, 2]);
            let ids: Vec<_> = r.iter().map(Combatant::id).collect();
            assert_eq!(ids, vec![CombatantId::PLAYER, CombatantId::enemy(0), CombatantId::enemy(1)]);
        }
    }

    mod match_state_tests {
        use super::*;

        #[test]
        fn spawn_records_seed_history() {
            let state = MatchState::new(roster(&[2, 2]), 10);
            assert_eq!(
                state.move_history(),
                &[
                    MoveRecord::at(TileCoord::new(0, 0), false),
                    MoveRecord::at(TileCoord::new(1, 0), false),
                    MoveRecord::at(TileCoord::new(2, 0), false),
                ]
            );
        }

        #[test]
        fn record_turn_grows_by_roster_len() {
            let mut state = MatchState::new(roster(&[2, 2]), 10);
            state.record_turn(&[CombatantId::enemy(1)]);
            let tail = &state.move_history()[3..];
            assert_eq!(tail.len(), 3);
            assert!(!tail[0].attacked);
            assert!(!tail[1].attacked);
            assert!(tail[2].attacked);
        }

        #[test]
        fn turns_never_underflow() {
            let mut state = MatchState::new(roster(&[2]), 1);
            state.decrement_turns();
            state.decrement_turns();
            assert_eq!(state.turns_remaining(), 0);
            assert_eq!(state.turns_used(), 1);
        }

        #[test]
        fn victory_beats_defeat_and_attrition() {
            let mut state = MatchState::new(roster(&[0]), 1);
            state.decrement_turns();
            state.roster_mut().player.take_damage(10);
            assert_eq!(state.evaluate_termination(), Some(Outcome::Victory));
        }

        #[test]
        fn defeat_beats_attrition() {
            let mut state = MatchState::new(roster(&[2]), 1);
            state.decrement_turns();
            state.roster_mut().player.take_damage(10);
            assert_eq!(state.evaluate_termination(), Some(Outcome::Defeat));
        }

        #[test]
        fn finish_is_sticky() {
            let mut state = MatchState::new(roster(&[2]), 5);
            assert!(state.finish(Outcome::Attrition));
            assert!(!state.finish(Outcome::Victory));
            assert!(state.is_game_over());
            assert!(!state.is_victory());
            assert_eq!(state.outcome(), Some(Outcome::Attrition));
        }
    }
}
