//! Engine tuning knobs.

use moloch_grid::{Pathfinder, DEFAULT_PATH_BUDGET};
use serde::{Deserialize, Serialize};

use crate::combatant::DEFAULT_DICE_SIDES;

/// Default minimum spacing between accepted key presses.
pub const DEFAULT_MIN_INPUT_SPACING_MS: u64 = 50;

/// Rules and limits that are not part of a match's setup.
///
/// Every field has a default, so a partial JSON object is valid:
///
/// ```
/// use moloch_core::config::EngineConfig;
///
/// let config: EngineConfig =
///     serde_json::from_str(r#"{ "blocked_move_consumes_turn": false }"#).unwrap();
/// assert!(!config.blocked_move_consumes_turn);
/// assert_eq!(config.path_budget, 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// A move into a colliding tile still spends the turn and lets enemies act
    pub blocked_move_consumes_turn: bool,
    /// Minimum spacing between accepted key presses
    pub min_input_spacing_ms: u64,
    /// Node-expansion budget per enemy route search
    pub path_budget: usize,
    /// Die size for stats that do not name one
    pub default_dice_sides: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            blocked_move_consumes_turn: true,
            min_input_spacing_ms: DEFAULT_MIN_INPUT_SPACING_MS,
            path_budget: DEFAULT_PATH_BUDGET,
            default_dice_sides: DEFAULT_DICE_SIDES,
        }
    }
}

impl EngineConfig {
    /// Pathfinder with this config's budget.
    #[must_use]
    pub fn pathfinder(&self) -> Pathfinder {
        Pathfinder::new(self.path_budget)
    }
}
