//! Resolution events for presentation and telemetry.
//!
//! The engine does not animate, talk or play sounds. Instead every resolved
//! action appends a [`ResolutionEvent`] to an [`EventLog`]. A presentation
//! layer drains the log with `take_events()` after each turn and decides what
//! to show.
//!
//! Events are recorded in resolution order: player action first, then each
//! enemy in roster order, then deaths caused by those actions as they happen.

use moloch_grid::TileCoord;
use serde::{Deserialize, Serialize};

use crate::combatant::CombatantId;

/// Something that happened during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionEvent {
    /// A combatant stepped onto a new tile
    Moved {
        /// Mover
        id: CombatantId,
        /// Previous tile
        from: TileCoord,
        /// New tile
        to: TileCoord,
    },
    /// A step was rejected by collision
    Blocked {
        /// Mover
        id: CombatantId,
        /// Rejected tile
        at: TileCoord,
    },
    /// An attack landed
    Attacked {
        /// Attacker
        attacker: CombatantId,
        /// Defender
        target: CombatantId,
        /// Damage rolled
        dealt: u32,
        /// Damage after reduction
        received: u32,
    },
    /// A damage roll included at least one bonus die
    CriticalRoll {
        /// Attacker
        attacker: CombatantId,
        /// Number of bonus dice
        natural_maxes: u32,
    },
    /// A combatant dropped to zero hp or below
    Died {
        /// The fallen combatant
        id: CombatantId,
        /// Where the corpse lies
        at: TileCoord,
    },
    /// An enemy found no route to the player
    NoPath {
        /// Stuck enemy
        id: CombatantId,
    },
    /// A combatant stayed in place on purpose
    Held {
        /// Holder
        id: CombatantId,
        /// Tile held
        at: TileCoord,
    },
}

impl ResolutionEvent {
    /// The combatant that caused this event.
    #[must_use]
    pub fn actor(&self) -> CombatantId {
        match *self {
            Self::Moved { id, .. }
            | Self::Blocked { id, .. }
            | Self::Died { id, .. }
            | Self::NoPath { id }
            | Self::Held { id, .. } => id,
            Self::Attacked { attacker, .. } | Self::CriticalRoll { attacker, .. } => attacker,
        }
    }
}

/// Ordered, drainable log of [`ResolutionEvent`]s.
///
/// # Example
///
/// ```
/// use moloch_core::combatant::CombatantId;
/// use moloch_core::event::{EventLog, ResolutionEvent};
///
/// let mut log = EventLog::new();
/// log.push(ResolutionEvent::NoPath { id: CombatantId::enemy(0) });
/// assert_eq!(log.len(), 1);
///
/// let events = log.take_events();
/// assert_eq!(events.len(), 1);
/// assert!(log.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<ResolutionEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn push(&mut self, event: ResolutionEvent) {
        self.events.push(event);
    }

    /// Drains and returns every recorded event in order.
    pub fn take_events(&mut self) -> Vec<ResolutionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events recorded so far, without draining.
    #[must_use]
    pub fn events(&self) -> &[ResolutionEvent] {
        &self.events
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Discards every pending event.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Extend<ResolutionEvent> for EventLog {
    fn extend<I: IntoIterator<Item = ResolutionEvent>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}
