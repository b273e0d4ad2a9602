// Type definitions for DotMerge Core

use serde::{Deserialize, Serialize};
use std::fmt;
use wasm_bindgen::prelude::*;

/// Timestamp in milliseconds since epoch
pub type Timestamp = i64;

/// Result type for DotMerge operations
pub type Result<T> = std::result::Result<T, DotMergeError>;

/// Error types for DotMerge operations
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DotMergeError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Tile not found: {0}")]
    TileNotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// Convert Rust errors to JsValue for WASM boundary
impl From<DotMergeError> for JsValue {
    fn from(err: DotMergeError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<serde_json::Error> for DotMergeError {
    fn from(err: serde_json::Error) -> Self {
        DotMergeError::SerializationError(err.to_string())
    }
}

/// Session phase
///
/// `Won`, `Lost` and `TimedOut` end an attempt; from there the session
/// either restarts with the same config or goes back to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Idle,
    Playing,
    Won,
    Lost,
    TimedOut,
}

impl Phase {
    /// True for the phases that end an attempt
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Won | Phase::Lost | Phase::TimedOut)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Playing => "playing",
            Phase::Won => "won",
            Phase::Lost => "lost",
            Phase::TimedOut => "timedOut",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context attached to a terminal phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseContext {
    /// Seconds taken to clear the board (only set on `Won`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<u32>,
    pub time_remaining: u32,
}
