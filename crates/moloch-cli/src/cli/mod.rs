//! CLI command implementations for Moloch.

pub(crate) mod batch;
pub(crate) mod play;
pub(crate) mod verify;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use moloch_core::{EngineConfig, Intent, MatchSetup, ResolutionEvent, SharedGrid, Snapshot};
use moloch_grid::{GridConfig, GridMap};
use serde::{Deserialize, Serialize};

/// A match description as read from disk.
///
/// Only `grid` is required. A missing `setup` falls back to the offline
/// defaults and a missing `config` to [`EngineConfig::default`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Scenario {
    pub grid: GridConfig,
    #[serde(default = "MatchSetup::offline")]
    pub setup: MatchSetup,
    #[serde(default)]
    pub config: EngineConfig,
    /// Scripted player intents, used when the autopilot is off
    #[serde(default)]
    pub intents: Vec<Intent>,
}

impl Scenario {
    /// Reads and parses a scenario file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid scenario {}", path.display()))
    }

    pub(crate) fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Builds the map described by the scenario.
    pub(crate) fn build_grid(&self) -> Result<GridMap> {
        self.grid.build().context("scenario grid is malformed")
    }

    /// Setup with the seed optionally overridden.
    pub(crate) fn setup_with_seed(&self, seed: Option<u64>) -> MatchSetup {
        MatchSetup {
            seed: seed.unwrap_or(self.setup.seed),
            ..self.setup.clone()
        }
    }
}

/// Everything needed to audit a finished match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Recording {
    /// Dice seed the match was played with
    pub seed: u64,
    /// Accepted intents in order
    pub intents: Vec<Intent>,
    /// Final engine state; verification compares it field by field
    pub snapshot: Snapshot,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<ResolutionEvent>,
}

impl Recording {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read recording {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("invalid recording {}", path.display()))
    }
}

pub(crate) fn shared(grid: &GridMap) -> SharedGrid {
    Arc::new(grid.clone())
}

/// Pretty-prints `value` to stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
