// Game session: the match/timer state machine
//
// Idle -> Playing -> Won | Lost | TimedOut, then restart (Playing) or
// reset (Idle). Every operation is one atomic `&mut self` step; the driver
// serializes input events and clock ticks.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::clock::{Clock, TICK_PERIOD_MS};
use crate::config::{Level, SessionConfig};
use crate::events::{GameObserver, LOW_TIME_THRESHOLD};
use crate::generator::generate_board;
use crate::ids::TileId;
use crate::log;
use crate::tile::tiles_match;
use crate::types::{DotMergeError, Phase, PhaseContext, Result, Timestamp};
use crate::utils::{entropy_rng, now, seeded_rng};

/// What a `submit_pairing` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum PairingOutcome {
    /// Same tile twice, or a tile that is already matched
    Ignored,
    #[serde(rename_all = "camelCase")]
    Merged { remaining_pairs: usize },
    Won { elapsed: u32 },
    Lost,
}

/// Serializable view of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: Phase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    pub matched_pairs: usize,
    pub total_pairs: usize,
    pub remaining_pairs: usize,
    pub time_remaining: u32,
    pub time_limit: u32,
    pub low_time: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Timestamp>,
}

/// One player's game
pub struct Session<O: GameObserver, C: Clock> {
    config: Option<SessionConfig>,
    board: Board,
    phase: Phase,
    matched_pairs: usize,
    total_pairs: usize,
    time_remaining: u32,
    started_at: Option<Timestamp>,
    rng: ChaCha8Rng,
    observer: O,
    clock: C,
}

impl<O: GameObserver, C: Clock> Session<O, C> {
    /// Session with boards drawn from platform entropy
    pub fn new(observer: O, clock: C) -> Self {
        Self::with_rng(observer, clock, entropy_rng())
    }

    /// Reproducible session: the same seed yields the same boards
    pub fn with_seed(observer: O, clock: C, seed: &str) -> Self {
        Self::with_rng(observer, clock, seeded_rng(seed))
    }

    pub fn with_rng(observer: O, clock: C, rng: ChaCha8Rng) -> Self {
        Session {
            config: None,
            board: Board::default(),
            phase: Phase::Idle,
            matched_pairs: 0,
            total_pairs: 0,
            time_remaining: 0,
            started_at: None,
            rng,
            observer,
            clock,
        }
    }

    //━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // COMMANDS
    //━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Start a new attempt from `Idle` or a terminal phase
    pub fn start(&mut self, config: SessionConfig) -> Result<()> {
        config.validate()?;
        if self.phase == Phase::Playing {
            return Err(DotMergeError::InvalidOperation(
                "Session already playing; reset or finish it first".to_string(),
            ));
        }

        let board = generate_board(&mut self.rng, config.pair_count, config.rows, config.cols)?;

        self.clock.stop();
        self.board = board;
        self.phase = Phase::Playing;
        self.matched_pairs = 0;
        self.total_pairs = config.pair_count;
        self.time_remaining = config.time_limit_secs;
        self.started_at = Some(now());

        log::info(
            "start",
            &format!(
                "{} session: {} pairs, {}x{} grid, {}s",
                config.label(),
                config.pair_count,
                config.rows,
                config.cols,
                config.time_limit_secs
            ),
        );

        self.observer.on_board_ready(&self.board, &config);
        self.config = Some(config);
        self.clock.start(TICK_PERIOD_MS);
        Ok(())
    }

    /// Start a built-in level
    pub fn start_level(&mut self, level: Level) -> Result<()> {
        self.start(level.config())
    }

    /// Try to merge tile `a` (the dragged tile, which survives) with `b`
    pub fn submit_pairing(&mut self, a: TileId, b: TileId) -> Result<PairingOutcome> {
        self.require_playing("submit_pairing")?;

        let tile_a = self
            .board
            .tile(a)
            .ok_or_else(|| DotMergeError::TileNotFound(a.to_string()))?;
        let tile_b = self
            .board
            .tile(b)
            .ok_or_else(|| DotMergeError::TileNotFound(b.to_string()))?;

        if a == b || tile_a.matched || tile_b.matched {
            log::debug("submit_pairing", &format!("ignored {} -> {}", a, b));
            return Ok(PairingOutcome::Ignored);
        }

        if !tiles_match(tile_a, tile_b) {
            self.finish(Phase::Lost, None);
            return Ok(PairingOutcome::Lost);
        }

        let merged = self.board.resolve_pair(a, b)?;
        self.matched_pairs += 1;
        let remaining = self.remaining_pairs();

        self.observer.on_tiles_merged(a, b, &merged);
        self.observer.on_pair_resolved(remaining);

        if remaining == 0 {
            let elapsed = self.elapsed();
            self.finish(Phase::Won, Some(elapsed));
            return Ok(PairingOutcome::Won { elapsed });
        }

        log::debug("submit_pairing", &format!("merged, {} pairs left", remaining));
        Ok(PairingOutcome::Merged {
            remaining_pairs: remaining,
        })
    }

    /// One second of the countdown. Returns the phase after the tick.
    pub fn tick(&mut self) -> Result<Phase> {
        self.require_playing("tick")?;

        self.time_remaining = self.time_remaining.saturating_sub(1);
        self.observer
            .on_time_tick(self.time_remaining, self.time_remaining <= LOW_TIME_THRESHOLD);

        if self.time_remaining == 0 && self.remaining_pairs() > 0 {
            self.finish(Phase::TimedOut, None);
        }
        Ok(self.phase)
    }

    /// Replay the last config after an attempt has ended
    pub fn restart(&mut self) -> Result<()> {
        if !self.phase.is_terminal() {
            return Err(DotMergeError::InvalidOperation(format!(
                "Cannot restart while {}",
                self.phase
            )));
        }
        let config = self.config.clone().ok_or_else(|| {
            DotMergeError::InvalidOperation("No previous session to restart".to_string())
        })?;
        self.start(config)
    }

    /// Abandon any attempt and go back to `Idle` (menu / level select)
    pub fn reset(&mut self) {
        self.clock.stop();
        self.board = Board::default();
        self.phase = Phase::Idle;
        self.matched_pairs = 0;
        self.total_pairs = 0;
        self.time_remaining = 0;
        self.started_at = None;
        log::debug("reset", "session idle");
    }

    //━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // QUERIES
    //━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Config of the current or last attempt
    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn total_pairs(&self) -> usize {
        self.total_pairs
    }

    pub fn remaining_pairs(&self) -> usize {
        self.total_pairs - self.matched_pairs
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn time_limit(&self) -> u32 {
        self.config.as_ref().map_or(0, |c| c.time_limit_secs)
    }

    /// Seconds spent in the current attempt
    pub fn elapsed(&self) -> u32 {
        self.time_limit().saturating_sub(self.time_remaining)
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let active = self.phase != Phase::Idle;
        SessionSnapshot {
            phase: self.phase,
            level: self.config.as_ref().and_then(|c| c.level),
            matched_pairs: self.matched_pairs,
            total_pairs: self.total_pairs,
            remaining_pairs: self.remaining_pairs(),
            time_remaining: self.time_remaining,
            time_limit: if active { self.time_limit() } else { 0 },
            low_time: active && self.time_remaining <= LOW_TIME_THRESHOLD,
            started_at: self.started_at,
        }
    }

    //━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // INTERNALS
    //━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    fn require_playing(&self, op: &str) -> Result<()> {
        if self.phase != Phase::Playing {
            return Err(DotMergeError::InvalidOperation(format!(
                "{} requires a playing session (phase: {})",
                op, self.phase
            )));
        }
        Ok(())
    }

    /// Leave `Playing` for a terminal phase. The clock is cancelled first.
    fn finish(&mut self, phase: Phase, elapsed: Option<u32>) {
        debug_assert!(phase.is_terminal());
        self.clock.stop();
        self.phase = phase;

        let context = PhaseContext {
            elapsed,
            time_remaining: self.time_remaining,
        };
        log::info(
            "phase",
            &format!(
                "{} with {}/{} pairs, {}s left",
                phase, self.matched_pairs, self.total_pairs, self.time_remaining
            ),
        );
        self.observer.on_phase_changed(phase, &context);
    }
}
