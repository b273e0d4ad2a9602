// DotMerge Core - Rust/WASM Implementation
// Copyright 2025 DotMerge Contributors
// Licensed under the Apache License, Version 2.0

//! # DotMerge Core (Rust/WASM)
//!
//! Rule engine for DotMerge, a tile-matching puzzle: every tile shows a
//! grid of coloured and grey dots, and two tiles form a pair when each
//! grey dot of one sits over a coloured dot of the other. Dragging a tile
//! onto its partner merges them into one fully coloured pattern; a wrong
//! drop ends the attempt.
//!
//! ## Architecture
//!
//! - **Grid / Tile**: dot patterns and the complementarity rule
//! - **Generator**: random complementary pairs and shuffled boards
//! - **Board**: tiles of one session and pair resolution
//! - **Session**: Idle / Playing / Won / Lost / TimedOut state machine
//! - **Clock**: cancellable countdown (browser interval or manual)
//! - **Events**: outbound notifications for rendering and audio
//! - **Dispatcher**: the JavaScript-facing API
//!
//! The engine never touches the DOM. Rendering, animation, sound and
//! haptics live in the host page and react to events.

use wasm_bindgen::prelude::*;

// Module declarations
mod board;
mod clock;
mod config;
mod dispatcher;
mod events;
mod generator;
mod grid;
mod ids;
mod log;
mod session;
mod tile;
mod types;
mod utils;

// Re-exports
pub use board::Board;
pub use clock::{Clock, IntervalClock, ManualClock, TICK_PERIOD_MS};
pub use config::{grid_side_for, Level, SessionConfig, MAX_GRID_CELLS, MAX_PAIRS, MIN_GRID_CELLS};
pub use dispatcher::{format_time_js, level_config, GameDispatcher, JsEventSink};
pub use events::{EventLog, GameEvent, GameObserver, NullObserver, LOW_TIME_THRESHOLD};
pub use generator::{generate_board, generate_pair, grey_count_range};
pub use grid::{Cell, Color, Grid, PALETTE};
pub use ids::{IdSource, PairKey, TileId};
pub use session::{PairingOutcome, Session, SessionSnapshot};
pub use tile::{merge_grids, tiles_match, Tile};
pub use types::{DotMergeError, Phase, PhaseContext, Result, Timestamp};
pub use utils::{format_time, seeded_rng};

// WASM initialization
#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// Version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Health check for WASM module
#[wasm_bindgen(js_name = healthCheck)]
pub fn health_check() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_health_check() {
        assert!(health_check());
    }

    #[test]
    fn test_public_api_plays_a_level() {
        let mut session = Session::with_seed(EventLog::new(), ManualClock::new(), "api");
        session.start_level(Level::Easy).unwrap();

        while session.phase() == Phase::Playing {
            let tiles = session.board().tiles();
            let first = tiles.iter().find(|t| !t.matched).unwrap();
            let partner = tiles
                .iter()
                .find(|t| t.pair_key == first.pair_key && t.id != first.id)
                .unwrap();
            let (a, b) = (first.id, partner.id);
            session.submit_pairing(a, b).unwrap();
        }

        assert_eq!(session.phase(), Phase::Won);
        assert_eq!(session.observer().phases(), vec![Phase::Won]);
    }
}
