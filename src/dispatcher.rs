// JavaScript entry point for DotMerge Core

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::board::Board;
use crate::clock::IntervalClock;
use crate::config::{Level, SessionConfig};
use crate::events::{GameEvent, GameObserver};
use crate::grid::Grid;
use crate::ids::TileId;
use crate::log;
use crate::session::Session;
use crate::types::{DotMergeError, Phase, PhaseContext, Result};
use crate::utils::format_time;

type JsSession = Session<JsEventSink, IntervalClock>;

/// Forwards every notification to a JS callback as a plain object
pub struct JsEventSink {
    callback: js_sys::Function,
    muted: bool,
}

impl JsEventSink {
    pub fn new(callback: js_sys::Function) -> Self {
        JsEventSink {
            callback,
            muted: false,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.on_mute_changed(muted);
    }

    fn emit(&self, event: GameEvent) {
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let value = match event.serialize(&serializer) {
            Ok(value) => value,
            Err(e) => {
                log::error("event", &format!("cannot serialize event: {}", e));
                return;
            }
        };
        if let Err(e) = self.callback.call1(&JsValue::NULL, &value) {
            log::warn("event", &format!("event handler threw: {:?}", e));
        }
    }
}

impl GameObserver for JsEventSink {
    fn on_board_ready(&mut self, board: &Board, config: &SessionConfig) {
        self.emit(GameEvent::board_ready(board, config));
    }

    fn on_tiles_merged(&mut self, survivor: TileId, absorbed: TileId, grid: &Grid) {
        self.emit(GameEvent::TilesMerged {
            survivor,
            absorbed,
            grid: grid.clone(),
        });
    }

    fn on_pair_resolved(&mut self, remaining_pairs: usize) {
        self.emit(GameEvent::PairResolved { remaining_pairs });
    }

    fn on_phase_changed(&mut self, phase: Phase, context: &PhaseContext) {
        self.emit(GameEvent::PhaseChanged {
            phase,
            context: *context,
        });
    }

    fn on_time_tick(&mut self, time_remaining: u32, low_time: bool) {
        self.emit(GameEvent::TimeTick {
            time_remaining,
            low_time,
        });
    }

    fn on_mute_changed(&mut self, muted: bool) {
        self.emit(GameEvent::MuteChanged { muted });
    }
}

/// One game session driven from JavaScript
///
/// Input events and timer ticks both go through the same `RefCell`, so a
/// tick can never interleave with a pairing. Events are delivered while
/// the session is still borrowed: any dispatcher call made synchronously
/// from the event callback fails with "Session is busy". Handlers that
/// want to react (read `getState()`, `restart()` after a loss) must defer
/// the call, e.g. with `queueMicrotask` or `setTimeout`.
#[wasm_bindgen]
pub struct GameDispatcher {
    session: Rc<RefCell<JsSession>>,
}

#[wasm_bindgen]
impl GameDispatcher {
    /// Create a dispatcher that reports events to `on_event`.
    /// With a `seed`, every board is reproducible.
    #[wasm_bindgen(constructor)]
    pub fn new(on_event: js_sys::Function, seed: Option<String>) -> GameDispatcher {
        let session = Rc::new_cyclic(|weak: &Weak<RefCell<JsSession>>| {
            let weak = weak.clone();
            let clock = IntervalClock::new(move || tick_session(&weak));
            let sink = JsEventSink::new(on_event);
            let session = match seed.as_deref() {
                Some(seed) => Session::with_seed(sink, clock, seed),
                None => Session::new(sink, clock),
            };
            RefCell::new(session)
        });
        GameDispatcher { session }
    }

    //━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // SESSION CONTROL
    //━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Start a built-in level ("easy", "medium", "hard")
    #[wasm_bindgen(js_name = startLevel)]
    pub fn start_level(&self, level: &str) -> Result<()> {
        let level: Level = level.parse()?;
        self.with_session(|s| s.start_level(level))
    }

    /// Start a custom session from an even tile count and a time limit
    #[wasm_bindgen(js_name = startCustom)]
    pub fn start_custom(&self, containers: usize, time_limit_secs: u32) -> Result<()> {
        let config = SessionConfig::custom(containers, time_limit_secs)?;
        self.with_session(|s| s.start(config))
    }

    /// Start from a JSON config (`{"pairCount":..,"rows":..,"cols":..,"timeLimitSecs":..}`)
    pub fn start(&self, config_json: &str) -> Result<()> {
        let config = SessionConfig::from_json(config_json)?;
        self.with_session(|s| s.start(config))
    }

    /// Drop tile `dragged` onto tile `target`; returns the outcome as JSON
    #[wasm_bindgen(js_name = submitPairing)]
    pub fn submit_pairing(&self, dragged: &str, target: &str) -> Result<String> {
        let dragged: TileId = dragged.parse()?;
        let target: TileId = target.parse()?;
        let outcome = self.with_session(|s| s.submit_pairing(dragged, target))?;
        Ok(serde_json::to_string(&outcome)?)
    }

    /// Advance the countdown by one second by hand; returns the phase name
    pub fn tick(&self) -> Result<String> {
        let phase = self.with_session(|s| s.tick())?;
        Ok(phase.as_str().to_string())
    }

    pub fn restart(&self) -> Result<()> {
        self.with_session(|s| s.restart())
    }

    pub fn reset(&self) -> Result<()> {
        self.with_session(|s| {
            s.reset();
            Ok(())
        })
    }

    //━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // AUDIO
    //━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Flip the mute flag; returns the new value
    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&self) -> Result<bool> {
        self.with_session(|s| {
            let sink = s.observer_mut();
            let muted = !sink.is_muted();
            sink.set_muted(muted);
            Ok(muted)
        })
    }

    #[wasm_bindgen(js_name = isMuted)]
    pub fn is_muted(&self) -> Result<bool> {
        self.read_session(|s| Ok(s.observer().is_muted()))
    }

    //━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // QUERIES
    //━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Session snapshot as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<String> {
        self.read_session(|s| Ok(serde_json::to_string(&s.snapshot())?))
    }

    /// Board tiles as JSON, in presentation order
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> Result<String> {
        self.read_session(|s| Ok(serde_json::to_string(s.board().tiles())?))
    }

    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> Result<String> {
        self.read_session(|s| Ok(s.phase().as_str().to_string()))
    }

    #[wasm_bindgen(getter, js_name = timeRemaining)]
    pub fn time_remaining(&self) -> Result<u32> {
        self.read_session(|s| Ok(s.time_remaining()))
    }
}

impl GameDispatcher {
    fn with_session<T>(&self, f: impl FnOnce(&mut JsSession) -> Result<T>) -> Result<T> {
        let mut session = self.session.try_borrow_mut().map_err(|_| busy())?;
        f(&mut session).map_err(|e| {
            log::warn("dispatch", &format!("rejected: {}", e));
            e
        })
    }

    fn read_session<T>(&self, f: impl FnOnce(&JsSession) -> Result<T>) -> Result<T> {
        let session = self.session.try_borrow().map_err(|_| busy())?;
        f(&session)
    }
}

fn busy() -> DotMergeError {
    DotMergeError::InvalidOperation("Session is busy handling another event".to_string())
}

/// Interval callback. Holds only a weak handle so a dropped dispatcher
/// takes its timer down with it.
fn tick_session(weak: &Weak<RefCell<JsSession>>) {
    let Some(session) = weak.upgrade() else {
        return;
    };
    let Ok(mut session) = session.try_borrow_mut() else {
        log::warn("tick", "session busy, tick skipped");
        return;
    };
    if let Err(e) = session.tick() {
        log::warn("tick", &e.to_string());
    }
}

/// Format seconds as `m:ss` for the countdown display
#[wasm_bindgen(js_name = formatTime)]
pub fn format_time_js(seconds: u32) -> String {
    format_time(seconds)
}

/// Preset for a named level, as JSON
#[wasm_bindgen(js_name = levelConfig)]
pub fn level_config(name: &str) -> Result<String> {
    let level: Level = name.parse()?;
    Ok(serde_json::to_string(&level.config())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_config_json() {
        let json = level_config("medium").unwrap();
        let config = SessionConfig::from_json(&json).unwrap();
        assert_eq!(config, Level::Medium.config());
    }

    #[test]
    fn test_format_time_export() {
        assert_eq!(format_time_js(75), "1:15");
    }
}
