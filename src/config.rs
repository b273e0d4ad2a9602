// Session configuration for DotMerge Core
//
// Three built-in levels plus custom sessions. Every config is validated
// before a session touches any state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{DotMergeError, Result};

/// Smallest grid that keeps the 30-60% grey rule meaningful (2x2)
pub const MIN_GRID_CELLS: usize = 4;

/// Largest dot pattern a tile may carry (10x10)
pub const MAX_GRID_CELLS: usize = 100;

/// Most pairs one board may hold
pub const MAX_PAIRS: usize = 64;

/// Built-in difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Easy, Level::Medium, Level::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Level::Easy => "easy",
            Level::Medium => "medium",
            Level::Hard => "hard",
        }
    }

    /// Preset for this level. All levels use a 4x4 dot pattern.
    pub fn config(self) -> SessionConfig {
        let (pair_count, time_limit_secs) = match self {
            Level::Easy => (6, 100),
            Level::Medium => (6, 75),
            Level::Hard => (7, 60),
        };
        SessionConfig {
            pair_count,
            rows: 4,
            cols: 4,
            time_limit_secs,
            level: Some(self),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = DotMergeError;

    fn from_str(s: &str) -> Result<Self> {
        Level::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DotMergeError::InvalidConfig(format!("Unknown level: {}", s)))
    }
}

/// Everything needed to start a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub pair_count: usize,
    pub rows: usize,
    pub cols: usize,
    pub time_limit_secs: u32,
    /// Set for presets, `None` for custom sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
}

impl SessionConfig {
    /// Explicit config, validated
    pub fn new(pair_count: usize, rows: usize, cols: usize, time_limit_secs: u32) -> Result<Self> {
        let config = SessionConfig {
            pair_count,
            rows,
            cols,
            time_limit_secs,
            level: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn preset(level: Level) -> Self {
        level.config()
    }

    /// Custom session from an even container (tile) count and a time limit
    pub fn custom(containers: usize, time_limit_secs: u32) -> Result<Self> {
        if containers < 2 {
            return Err(DotMergeError::InvalidConfig(format!(
                "Need at least 2 containers, got {}",
                containers
            )));
        }
        if containers % 2 != 0 {
            return Err(DotMergeError::InvalidConfig(format!(
                "Container count must be even, got {}",
                containers
            )));
        }
        let pair_count = containers / 2;
        if pair_count > MAX_PAIRS {
            return Err(DotMergeError::InvalidConfig(format!(
                "At most {} containers allowed, got {}",
                MAX_PAIRS * 2,
                containers
            )));
        }
        let side = grid_side_for(pair_count);
        Self::new(pair_count, side, side, time_limit_secs)
    }

    /// Parse and validate a JSON config (`{"pairCount":4,"rows":4,...}`)
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SessionConfig = serde_json::from_str(json)
            .map_err(|e| DotMergeError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pair_count == 0 {
            return Err(DotMergeError::InvalidConfig("Pair count must be positive".to_string()));
        }
        if self.pair_count > MAX_PAIRS {
            return Err(DotMergeError::InvalidConfig(format!(
                "Pair count {} exceeds the maximum of {}",
                self.pair_count, MAX_PAIRS
            )));
        }
        if self.rows == 0 || self.cols == 0 {
            return Err(DotMergeError::InvalidConfig(format!(
                "Grid must have rows and columns, got {}x{}",
                self.rows, self.cols
            )));
        }
        let cells = self.cell_count().ok_or_else(|| {
            DotMergeError::InvalidConfig(format!("Grid {}x{} is too large", self.rows, self.cols))
        })?;
        if cells < MIN_GRID_CELLS {
            return Err(DotMergeError::InvalidConfig(format!(
                "Grid {}x{} has fewer than {} cells",
                self.rows, self.cols, MIN_GRID_CELLS
            )));
        }
        if cells > MAX_GRID_CELLS {
            return Err(DotMergeError::InvalidConfig(format!(
                "Grid {}x{} has more than {} cells",
                self.rows, self.cols, MAX_GRID_CELLS
            )));
        }
        if self.time_limit_secs == 0 {
            return Err(DotMergeError::InvalidConfig("Time limit must be positive".to_string()));
        }
        Ok(())
    }

    /// Cells per tile, `None` if rows x cols overflows
    pub fn cell_count(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    /// Tiles on the board (two per pair)
    pub fn container_count(&self) -> usize {
        self.pair_count.saturating_mul(2)
    }

    /// Display label: the level name or "custom"
    pub fn label(&self) -> &'static str {
        self.level.map_or("custom", Level::name)
    }
}

/// Square grid side for a custom session. Bigger boards get bigger
/// patterns so accidental complementary pairs stay negligible.
pub fn grid_side_for(pair_count: usize) -> usize {
    match pair_count {
        0..=8 => 4,
        9..=16 => 5,
        _ => 6,
    }
}
