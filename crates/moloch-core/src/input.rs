//! Player intents and the edge-triggered input gate.
//!
//! The game advances only when the player acts, so raw key state has to be
//! turned into at most one discrete [`Intent`] per press. [`InputGate`] does
//! that: a key must be released and pressed again, and presses closer together
//! than the minimum spacing are dropped.

use bitflags::bitflags;
use moloch_grid::Direction;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Keys held during one poll.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Buttons: u8 {
        /// Step up
        const UP = 1 << 0;
        /// Step right
        const RIGHT = 1 << 1;
        /// Step down
        const DOWN = 1 << 2;
        /// Step left
        const LEFT = 1 << 3;
        /// Attack in place
        const ATTACK = 1 << 4;
    }
}

/// One discrete player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Step one tile, attacking if a living enemy stands there
    Move(Direction),
    /// Stay put and strike the first adjacent enemy
    Attack,
    /// No action; always ignored
    None,
}

impl Intent {
    /// Picks an intent from held keys.
    ///
    /// When several keys are held the priority is Left, Right, Up, Down,
    /// Attack.
    ///
    /// # Example
    ///
    /// ```
    /// use moloch_core::input::{Buttons, Intent};
    /// use moloch_grid::Direction;
    ///
    /// assert_eq!(Intent::from_buttons(Buttons::UP | Buttons::LEFT), Intent::Move(Direction::Left));
    /// assert_eq!(Intent::from_buttons(Buttons::ATTACK), Intent::Attack);
    /// assert_eq!(Intent::from_buttons(Buttons::empty()), Intent::None);
    /// ```
    #[must_use]
    pub fn from_buttons(held: Buttons) -> Self {
        if held.contains(Buttons::LEFT) {
            Self::Move(Direction::Left)
        } else if held.contains(Buttons::RIGHT) {
            Self::Move(Direction::Right)
        } else if held.contains(Buttons::UP) {
            Self::Move(Direction::Up)
        } else if held.contains(Buttons::DOWN) {
            Self::Move(Direction::Down)
        } else if held.contains(Buttons::ATTACK) {
            Self::Attack
        } else {
            Self::None
        }
    }

    /// Returns true for [`Intent::None`].
    #[must_use]
    pub fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

impl From<Direction> for Intent {
    fn from(direction: Direction) -> Self {
        Self::Move(direction)
    }
}

/// Edge-triggered debounce for held keys.
///
/// A poll yields an intent only if:
///
/// 1. more than `min_spacing_ms` have passed since the last accepted press,
/// 2. at least one key is held, and
/// 3. no key was held on the previous poll.
///
/// The "held last poll" flag updates on every poll, including polls inside
/// the spacing window.
///
/// # Example
///
/// ```
/// use moloch_core::input::{Buttons, InputGate, Intent};
/// use moloch_grid::Direction;
///
/// let mut gate = InputGate::new(50);
/// assert_eq!(gate.poll(100, Buttons::RIGHT), Some(Intent::Move(Direction::Right)));
/// // Still held: nothing new
/// assert_eq!(gate.poll(200, Buttons::RIGHT), None);
/// // Released, then pressed again
/// assert_eq!(gate.poll(210, Buttons::empty()), None);
/// assert_eq!(gate.poll(220, Buttons::RIGHT), Some(Intent::Move(Direction::Right)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputGate {
    min_spacing_ms: u64,
    last_accept_ms: u64,
    held_last_poll: bool,
}

impl InputGate {
    /// Creates a gate requiring `min_spacing_ms` between accepted presses.
    #[must_use]
    pub fn new(min_spacing_ms: u64) -> Self {
        Self {
            min_spacing_ms,
            last_accept_ms: 0,
            held_last_poll: false,
        }
    }

    /// Minimum spacing between accepted presses.
    #[must_use]
    pub fn min_spacing_ms(&self) -> u64 {
        self.min_spacing_ms
    }

    /// Feeds one frame of key state and returns a fresh intent, if any.
    pub fn poll(&mut self, now_ms: u64, held: Buttons) -> Option<Intent> {
        let any_held = !held.is_empty();
        let spaced = now_ms > self.last_accept_ms.saturating_add(self.min_spacing_ms);
        let intent = if spaced && any_held && !self.held_last_poll {
            self.last_accept_ms = now_ms;
            Some(Intent::from_buttons(held))
        } else {
            None
        };
        self.held_last_poll = any_held;
        intent
    }

    /// Forgets all history.
    pub fn reset(&mut self) {
        self.last_accept_ms = 0;
        self.held_last_poll = false;
    }
}

impl Default for InputGate {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MIN_INPUT_SPACING_MS)
    }
}
