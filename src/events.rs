// Outbound notifications from the rule engine
//
// The presentation layer (rendering, audio, haptics) implements
// `GameObserver`. Every method is fire-and-forget with a no-op default.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::{Level, SessionConfig};
use crate::grid::Grid;
use crate::ids::TileId;
use crate::tile::Tile;
use crate::types::{Phase, PhaseContext};

/// Remaining seconds at or below which the countdown is styled as a warning
pub const LOW_TIME_THRESHOLD: u32 = 10;

pub trait GameObserver {
    /// A new board is ready to render
    fn on_board_ready(&mut self, _board: &Board, _config: &SessionConfig) {}

    /// `survivor` now shows `grid`; `absorbed` should leave the display
    fn on_tiles_merged(&mut self, _survivor: TileId, _absorbed: TileId, _grid: &Grid) {}

    fn on_pair_resolved(&mut self, _remaining_pairs: usize) {}

    /// Terminal phase reached (Won, Lost or TimedOut)
    fn on_phase_changed(&mut self, _phase: Phase, _context: &PhaseContext) {}

    fn on_time_tick(&mut self, _time_remaining: u32, _low_time: bool) {}

    fn on_mute_changed(&mut self, _muted: bool) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl GameObserver for NullObserver {}

/// Serializable form of every notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    #[serde(rename = "board:ready", rename_all = "camelCase")]
    BoardReady {
        tiles: Vec<Tile>,
        total_pairs: usize,
        time_limit: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<Level>,
    },

    #[serde(rename = "tiles:merged", rename_all = "camelCase")]
    TilesMerged {
        survivor: TileId,
        absorbed: TileId,
        grid: Grid,
    },

    #[serde(rename = "pairs:remaining", rename_all = "camelCase")]
    PairResolved { remaining_pairs: usize },

    #[serde(rename = "phase:changed", rename_all = "camelCase")]
    PhaseChanged {
        phase: Phase,
        #[serde(flatten)]
        context: PhaseContext,
    },

    #[serde(rename = "time:tick", rename_all = "camelCase")]
    TimeTick { time_remaining: u32, low_time: bool },

    #[serde(rename = "audio:mute", rename_all = "camelCase")]
    MuteChanged { muted: bool },
}

impl GameEvent {
    pub fn board_ready(board: &Board, config: &SessionConfig) -> Self {
        GameEvent::BoardReady {
            tiles: board.tiles().to_vec(),
            total_pairs: config.pair_count,
            time_limit: config.time_limit_secs,
            level: config.level,
        }
    }
}

/// Observer that records events in order (tests, replays)
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&GameEvent> {
        self.events.last()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Phases announced so far
    pub fn phases(&self) -> Vec<Phase> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GameEvent::PhaseChanged { phase, .. } => Some(*phase),
                _ => None,
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.events)
    }
}

impl GameObserver for EventLog {
    fn on_board_ready(&mut self, board: &Board, config: &SessionConfig) {
        self.events.push(GameEvent::board_ready(board, config));
    }

    fn on_tiles_merged(&mut self, survivor: TileId, absorbed: TileId, grid: &Grid) {
        self.events.push(GameEvent::TilesMerged {
            survivor,
            absorbed,
            grid: grid.clone(),
        });
    }

    fn on_pair_resolved(&mut self, remaining_pairs: usize) {
        self.events.push(GameEvent::PairResolved { remaining_pairs });
    }

    fn on_phase_changed(&mut self, phase: Phase, context: &PhaseContext) {
        self.events.push(GameEvent::PhaseChanged {
            phase,
            context: *context,
        });
    }

    fn on_time_tick(&mut self, time_remaining: u32, low_time: bool) {
        self.events.push(GameEvent::TimeTick {
            time_remaining,
            low_time,
        });
    }

    fn on_mute_changed(&mut self, muted: bool) {
        self.events.push(GameEvent::MuteChanged { muted });
    }
}
