//! Combatants and their movement and damage rules.
//!
//! A [`Combatant`] is plain data plus the rules every faction shares:
//! stepping onto a tile, rolling damage dice and absorbing a hit. What a
//! combatant *decides* to do each turn lives in [`crate::policy`], keyed by
//! its [`Faction`].
//!
//! # Damage Dice
//!
//! An attacker rolls `ap` dice with `dice_sides` faces. The damage is the
//! highest single die plus one for every later die that landed on its top
//! face without raising the maximum:
//!
//! | rolls (d6) | max | natural maxes | damage |
//! |------------|-----|---------------|--------|
//! | 3, 5       | 5   | 0             | 5      |
//! | 6, 6       | 6   | 1             | 7      |
//! | 6, 6, 6    | 6   | 2             | 8      |
//! | 4, 6, 2    | 6   | 0             | 6      |
//!
//! The defender subtracts `dp`, flooring at zero.

use std::fmt;

use moloch_grid::{CollisionOracle, TileCoord};
use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

/// Default faces on a damage die.
pub const DEFAULT_DICE_SIDES: u32 = 6;

fn default_dice_sides() -> u32 {
    DEFAULT_DICE_SIDES
}

/// Stable identifier of a combatant within one match.
///
/// The player is always [`CombatantId::PLAYER`]. Enemies are numbered from 1
/// in roster order, so sorting ids gives the resolution order.
///
/// # Example
///
/// ```
/// use moloch_core::combatant::CombatantId;
///
/// let first = CombatantId::enemy(0);
/// assert_eq!(first.as_u32(), 1);
/// assert_eq!(first.enemy_index(), Some(0));
/// assert!(CombatantId::PLAYER < first);
/// assert_eq!(CombatantId::PLAYER.enemy_index(), None);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId(u32);

impl CombatantId {
    /// The player's id.
    pub const PLAYER: Self = Self(0);

    /// Creates an id from its raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Id of the enemy at `index` in the roster.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn enemy(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// Raw value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns true for the player's id.
    #[must_use]
    pub const fn is_player(self) -> bool {
        self.0 == 0
    }

    /// Roster index for an enemy id, `None` for the player.
    #[must_use]
    pub const fn enemy_index(self) -> Option<usize> {
        match self.0 {
            0 => None,
            n => Some(n as usize - 1),
        }
    }
}

impl fmt::Debug for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CombatantId({})", self.0)
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_player() {
            write!(f, "player")
        } else {
            write!(f, "enemy#{}", self.0)
        }
    }
}

/// Side a combatant fights on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    /// The human-controlled avatar
    Player,
    /// Computer-controlled opponents
    Enemy,
}

/// Stats supplied at match setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantStats {
    /// Starting health
    pub hp: i32,
    /// Number of damage dice
    pub ap: u32,
    /// Flat damage reduction
    pub dp: u32,
    /// Faces per damage die
    #[serde(default = "default_dice_sides")]
    pub dice_sides: u32,
}

impl CombatantStats {
    /// Creates stats with the default d6.
    #[must_use]
    pub const fn new(hp: i32, ap: u32, dp: u32) -> Self {
        Self {
            hp,
            ap,
            dp,
            dice_sides: DEFAULT_DICE_SIDES,
        }
    }

    /// Replaces the die size.
    #[must_use]
    pub const fn with_dice_sides(mut self, dice_sides: u32) -> Self {
        self.dice_sides = dice_sides;
        self
    }
}

/// Result of [`Combatant::move_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Position changed
    Moved {
        /// Previous tile
        from: TileCoord,
        /// New tile
        to: TileCoord,
    },
    /// Target tile collides; position unchanged
    Blocked {
        /// Rejected tile
        at: TileCoord,
    },
    /// Dead combatants do not move
    Inert,
}

/// One damage roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DamageRoll {
    /// Highest single die
    pub max_roll: u32,
    /// Later dice that hit the top face without raising the maximum
    pub natural_maxes: u32,
}

impl DamageRoll {
    /// Total damage dealt before reduction.
    #[must_use]
    pub const fn damage(self) -> u32 {
        self.max_roll.saturating_add(self.natural_maxes)
    }

    /// Returns true if any bonus die landed.
    #[must_use]
    pub const fn is_critical(self) -> bool {
        self.natural_maxes > 0
    }
}

/// Result of [`Combatant::take_damage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageTaken {
    /// Incoming damage before reduction
    pub dealt: u32,
    /// Damage actually removed from hp
    pub received: u32,
    /// Damage absorbed by `dp`
    pub blocked: u32,
    /// This hit took the combatant from alive to dead
    pub killed: bool,
}

/// A resolved attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    /// Attacker's roll
    pub roll: DamageRoll,
    /// Defender's side of the exchange
    pub taken: DamageTaken,
}

/// A fighter on the grid.
///
/// Combatants are never removed from a match. When `hp` drops to zero or
/// below the combatant becomes a corpse: it keeps its tile but no longer
/// moves, attacks, blocks or can be attacked.
///
/// # Example
///
/// ```
/// use moloch_core::combatant::{Combatant, CombatantId, CombatantStats, Faction};
/// use moloch_core::random::ScriptedRolls;
/// use moloch_grid::TileCoord;
///
/// let player = Combatant::spawn(
///     CombatantId::PLAYER,
///     Faction::Player,
///     TileCoord::new(0, 0),
///     CombatantStats::new(10, 2, 1),
/// );
/// let mut enemy = Combatant::spawn(
///     CombatantId::enemy(0),
///     Faction::Enemy,
///     TileCoord::new(1, 0),
///     CombatantStats::new(1, 1, 0),
/// );
///
/// let mut dice = ScriptedRolls::new(vec![6, 6]);
/// let outcome = player.attack(&mut enemy, &mut dice).unwrap();
///
/// assert_eq!(outcome.roll.damage(), 7);
/// assert_eq!(enemy.hp(), -6);
/// assert!(enemy.is_dead());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    id: CombatantId,
    faction: Faction,
    position: TileCoord,
    hp: i32,
    ap: u32,
    dp: u32,
    dice_sides: u32,
}

impl Combatant {
    /// Creates a combatant at `position` with the given stats.
    #[must_use]
    pub fn spawn(id: CombatantId, faction: Faction, position: TileCoord, stats: CombatantStats) -> Self {
        Self {
            id,
            faction,
            position,
            hp: stats.hp,
            ap: stats.ap,
            dp: stats.dp,
            dice_sides: stats.dice_sides,
        }
    }

    /// Combatant id.
    #[must_use]
    pub fn id(&self) -> CombatantId {
        self.id
    }

    /// Faction.
    #[must_use]
    pub fn faction(&self) -> Faction {
        self.faction
    }

    /// Current tile.
    #[must_use]
    pub fn position(&self) -> TileCoord {
        self.position
    }

    /// Current health. May be negative.
    #[must_use]
    pub fn hp(&self) -> i32 {
        self.hp
    }

    /// Number of damage dice.
    #[must_use]
    pub fn ap(&self) -> u32 {
        self.ap
    }

    /// Flat damage reduction.
    #[must_use]
    pub fn dp(&self) -> u32 {
        self.dp
    }

    /// Faces per damage die.
    #[must_use]
    pub fn dice_sides(&self) -> u32 {
        self.dice_sides
    }

    /// Returns true once `hp <= 0`.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Returns true while `hp > 0`.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.is_dead()
    }

    /// Steps onto `target` unless it collides.
    ///
    /// Adjacency is the caller's concern; this only checks collision.
    pub fn move_to<O>(&mut self, target: TileCoord, grid: &O) -> MoveOutcome
    where
        O: CollisionOracle + ?Sized,
    {
        if self.is_dead() {
            return MoveOutcome::Inert;
        }
        if grid.collides(target) {
            return MoveOutcome::Blocked { at: target };
        }
        let from = self.position;
        self.position = target;
        MoveOutcome::Moved { from, to: target }
    }

    /// Rolls `ap` damage dice.
    ///
    /// `ap == 0` rolls nothing and deals zero damage.
    pub fn roll_damage(&self, rng: &mut dyn RandomSource) -> DamageRoll {
        let mut roll = DamageRoll::default();
        for _ in 0..self.ap {
            let die = rng.roll(self.dice_sides);
            if die > roll.max_roll {
                roll.max_roll = die;
            } else if die == self.dice_sides {
                roll.natural_maxes += 1;
            }
        }
        roll
    }

    /// Absorbs `dealt` damage after subtracting `dp`.
    pub fn take_damage(&mut self, dealt: u32) -> DamageTaken {
        let was_alive = self.is_alive();
        let received = dealt.saturating_sub(self.dp);
        self.hp = self
            .hp
            .saturating_sub(i32::try_from(received).unwrap_or(i32::MAX));
        DamageTaken {
            dealt,
            received,
            blocked: dealt - received,
            killed: was_alive && self.is_dead(),
        }
    }

    /// Rolls damage against `target`.
    ///
    /// Returns `None` without rolling when either side is already dead.
    pub fn attack(&self, target: &mut Combatant, rng: &mut dyn RandomSource) -> Option<AttackOutcome> {
        if self.is_dead() || target.is_dead() {
            return None;
        }
        let roll = self.roll_damage(rng);
        let taken = target.take_damage(roll.damage());
        Some(AttackOutcome { roll, taken })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRolls;
    use moloch_grid::GridMap;

    fn fighter(id: CombatantId, hp: i32, ap: u32, dp: u32) -> Combatant {
        let faction = if id.is_player() { Faction::Player } else { Faction::Enemy };
        Combatant::spawn(id, faction, TileCoord::new(1, 1), CombatantStats::new(hp, ap, dp))
    }

    mod id_tests {
        use super::*;

        #[test]
        fn display_names_role() {
            assert_eq!(CombatantId::PLAYER.to_string(), "player");
            assert_eq!(CombatantId::enemy(2).to_string(), "enemy#3");
        }

        #[test]
        fn enemy_index_roundtrip() {
            for index in 0..5 {
                assert_eq!(CombatantId::enemy(index).enemy_index(), Some(index));
            }
        }
    }

    mod movement_tests {
        use super::*;

        #[test]
        fn moves_onto_walkable_tile() {
            let grid = GridMap::open(3, 3).unwrap();
            let mut c = fighter(CombatantId::PLAYER, 3, 1, 0);
            let outcome = c.move_to(TileCoord::new(2, 1), &grid);
            assert_eq!(
                outcome,
                MoveOutcome::Moved {
                    from: TileCoord::new(1, 1),
                    to: TileCoord::new(2, 1)
                }
            );
            assert_eq!(c.position(), TileCoord::new(2, 1));
        }

        #[test]
        fn wall_blocks_and_keeps_position() {
            let grid = GridMap::from_ascii("...\n..#\n...").unwrap();
            let mut c = fighter(CombatantId::PLAYER, 3, 1, 0);
            let outcome = c.move_to(TileCoord::new(2, 1), &grid);
            assert_eq!(outcome, MoveOutcome::Blocked { at: TileCoord::new(2, 1) });
            assert_eq!(c.position(), TileCoord::new(1, 1));
        }

        #[test]
        fn out_of_bounds_blocks() {
            let grid = GridMap::open(2, 2).unwrap();
            let mut c = fighter(CombatantId::PLAYER, 3, 1, 0);
            assert!(matches!(
                c.move_to(TileCoord::new(1, 2), &grid),
                MoveOutcome::Blocked { .. }
            ));
        }

        #[test]
        fn corpse_does_not_move() {
            let grid = GridMap::open(3, 3).unwrap();
            let mut c = fighter(CombatantId::enemy(0), 0, 1, 0);
            assert_eq!(c.move_to(TileCoord::new(0, 1), &grid), MoveOutcome::Inert);
            assert_eq!(c.position(), TileCoord::new(1, 1));
        }
    }

    mod damage_tests {
        use super::*;

        fn roll_with(ap: u32, rolls: Vec<u32>) -> DamageRoll {
            let c = fighter(CombatantId::PLAYER, 3, ap, 0);
            c.roll_damage(&mut ScriptedRolls::new(rolls))
        }

        #[test]
        fn zero_ap_deals_nothing() {
            let roll = roll_with(0, vec![6]);
            assert_eq!(roll.damage(), 0);
            assert!(!roll.is_critical());
        }

        #[test]
        fn double_six_is_seven() {
            let roll = roll_with(2, vec![6, 6]);
            assert_eq!(roll, DamageRoll { max_roll: 6, natural_maxes: 1 });
            assert_eq!(roll.damage(), 7);
            assert!(roll.is_critical());
        }

        #[test]
        fn six_raising_max_is_not_a_bonus() {
            assert_eq!(roll_with(3, vec![4, 6, 2]).damage(), 6);
        }

        #[test]
        fn takes_highest_die() {
            assert_eq!(roll_with(2, vec![3, 5]).damage(), 5);
        }

        #[test]
        fn triple_six_is_eight() {
            assert_eq!(roll_with(3, vec![6, 6, 6]).damage(), 8);
        }

        #[test]
        fn huge_die_saturates_instead_of_overflowing() {
            let c = Combatant::spawn(
                CombatantId::PLAYER,
                Faction::Player,
                TileCoord::new(0, 0),
                CombatantStats::new(1, 2, 0).with_dice_sides(u32::MAX),
            );
            let roll = c.roll_damage(&mut ScriptedRolls::new(vec![u32::MAX, u32::MAX]));
            assert_eq!(roll, DamageRoll { max_roll: u32::MAX, natural_maxes: 1 });
            assert_eq!(roll.damage(), u32::MAX);
        }

        #[test]
        fn defense_floors_at_zero() {
            let mut c = fighter(CombatantId::enemy(0), 5, 1, 4);
            let taken = c.take_damage(3);
            assert_eq!(taken.received, 0);
            assert_eq!(taken.blocked, 3);
            assert_eq!(c.hp(), 5);
        }

        #[test]
        fn killing_blow_reported_once() {
            let mut c = fighter(CombatantId::enemy(0), 2, 1, 0);
            assert!(c.take_damage(5).killed);
            assert_eq!(c.hp(), -3);
            assert!(!c.take_damage(1).killed);
        }

        #[test]
        fn attack_on_corpse_is_noop() {
            let attacker = fighter(CombatantId::PLAYER, 3, 2, 0);
            let mut corpse = fighter(CombatantId::enemy(0), 0, 1, 0);
            let mut dice = ScriptedRolls::new(vec![6]);
            assert!(attacker.attack(&mut corpse, &mut dice).is_none());
            assert_eq!(corpse.hp(), 0);
            assert_eq!(dice.drawn(), 0);
        }
    }

    mod property_tests {
        use super::*;
        use crate::random::ChaChaDice;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn damage_bounded_by_dice(ap in 0u32..8, sides in 1u32..20, seed in any::<u64>()) {
                let c = Combatant::spawn(
                    CombatantId::PLAYER,
                    Faction::Player,
                    TileCoord::new(0, 0),
                    CombatantStats::new(1, ap, 0).with_dice_sides(sides),
                );
                let roll = c.roll_damage(&mut ChaChaDice::new(seed));
                if ap == 0 {
                    prop_assert_eq!(roll.damage(), 0);
                } else {
                    prop_assert!(roll.max_roll >= 1 && roll.max_roll <= sides);
                    prop_assert!(roll.natural_maxes < ap);
                }
            }

            #[test]
            fn take_damage_never_heals(hp in -20i32..50, dp in 0u32..10, dealt in 0u32..40) {
                let mut c = Combatant::spawn(
                    CombatantId::enemy(0),
                    Faction::Enemy,
                    TileCoord::new(0, 0),
                    CombatantStats::new(hp, 1, dp),
                );
                let taken = c.take_damage(dealt);
                prop_assert!(c.hp() <= hp);
                prop_assert!(i64::from(hp) - i64::from(c.hp()) <= i64::from(dealt));
                prop_assert_eq!(taken.received, dealt.saturating_sub(dp));
                prop_assert_eq!(i64::from(hp) - i64::from(c.hp()), i64::from(taken.received));
            }
        }
    }
}
